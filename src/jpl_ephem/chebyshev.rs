//! Chebyshev evaluation of DE coefficient blocks.
//!
//! A slot block in a DATA RECORD holds `niv` consecutive sub-intervals, each
//! made of `ncm` components of `ncf` coefficients:
//!
//! ```text
//! sub-interval 0: [comp 0: c0..c(ncf-1)] [comp 1: ...] [comp ncm-1: ...]
//! sub-interval 1: [comp 0: ...] ...
//! ```
//!
//! Evaluation selects the sub-interval from the fractional record time,
//! maps it to the canonical argument `x ∈ [-1, 1]` and sums the series
//! `Σ T_p(x)·c_p` (position) and `Σ T'_p(x)·c_p·scale` (velocity). The
//! summation runs in ascending order of `p` so results are reproducible
//! bit for bit against the classic recurrence.
use nalgebra::Vector3;

use crate::constants::SECONDS_PER_DAY;

/// Largest number of coefficients per component accepted from a file header.
pub const MAX_COEFFS: usize = 24;

/// Largest number of components per slot.
pub const MAX_COMPONENTS: usize = 3;

/// Sub-interval selected inside a record, with the canonical Chebyshev argument.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubInterval {
    pub index: usize,
    pub x: f64,
}

/// Locate the sub-interval containing the fractional record time `t0`.
///
/// Arguments
/// ---------
/// * `t0` : position inside the record, in `[0, 1]`
/// * `niv` : number of sub-intervals of the slot
///
/// Return
/// ------
/// * The sub-interval index `floor(t0·niv)` and `x = 2·frac(t0·niv) - 1`.
///   A time exactly at the end of the record (`t0 = 1`) falls in the last
///   sub-interval with `x = 1`.
pub fn sub_interval(t0: f64, niv: usize) -> SubInterval {
    let t = t0 * niv as f64;
    let index = t as usize;

    if index >= niv {
        return SubInterval {
            index: niv.saturating_sub(1),
            x: 1.0,
        };
    }

    SubInterval {
        index,
        x: 2.0 * (t % 1.0) - 1.0,
    }
}

/// Derivative scale from `d/dx` to per-second rates for a record spanning `t1` days.
pub fn velocity_scale(niv: usize, t1: f64) -> f64 {
    (niv * 2) as f64 / t1 / SECONDS_PER_DAY
}

/// Evaluate the coefficients of one sub-interval.
///
/// Arguments
/// ---------
/// * `coef` : `ncm * ncf` coefficients, component-major
/// * `ncm` : number of components (at most [`MAX_COMPONENTS`])
/// * `ncf` : number of coefficients per component (at most [`MAX_COEFFS`])
/// * `x` : canonical Chebyshev argument in `[-1, 1]`
/// * `c` : velocity scale, see [`velocity_scale`]
///
/// Return
/// ------
/// * Position and velocity; components above `ncm` are zero.
pub fn evaluate_block(
    coef: &[f64],
    ncm: usize,
    ncf: usize,
    x: f64,
    c: f64,
) -> (Vector3<f64>, Vector3<f64>) {
    debug_assert!(ncm <= MAX_COMPONENTS && ncf <= MAX_COEFFS);
    debug_assert!(coef.len() >= ncm * ncf);

    let mut tcheb = [0.0; MAX_COEFFS];
    let mut tderiv = [0.0; MAX_COEFFS];

    tcheb[0] = 1.0;
    tcheb[1] = x;
    tderiv[0] = 0.0;
    tderiv[1] = 1.0;

    for p in 2..ncf {
        tcheb[p] = 2.0 * x * tcheb[p - 1] - tcheb[p - 2];
        tderiv[p] = 2.0 * x * tderiv[p - 1] + 2.0 * tcheb[p - 1] - tderiv[p - 2];
    }

    let mut position = Vector3::zeros();
    let mut velocity = Vector3::zeros();

    for m in 0..ncm {
        let n = ncf * m;
        let mut u = 0.0;
        let mut v = 0.0;

        for p in 0..ncf {
            u += tcheb[p] * coef[n + p];
            v += tderiv[p] * coef[n + p] * c;
        }

        position[m] = u;
        velocity[m] = v;
    }

    (position, velocity)
}

/// Evaluate a full slot block at the fractional record time `t0`.
///
/// Arguments
/// ---------
/// * `coef` : the slot block, `niv * ncm * ncf` coefficients
/// * `ncm` : number of components
/// * `ncf` : number of coefficients per component
/// * `niv` : number of sub-intervals
/// * `t0` : position inside the record, in `[0, 1]`
/// * `t1` : record span in days, used for the velocity scale
///
/// Return
/// ------
/// * Position (file units) and velocity (file units per second), or `None`
///   if `coef` is too short for the requested layout.
pub fn evaluate(
    coef: &[f64],
    ncm: usize,
    ncf: usize,
    niv: usize,
    t0: f64,
    t1: f64,
) -> Option<(Vector3<f64>, Vector3<f64>)> {
    if ncm > MAX_COMPONENTS || ncf > MAX_COEFFS || niv == 0 {
        return None;
    }

    let sub = sub_interval(t0, niv);
    let start = ncf * ncm * sub.index;
    let block = coef.get(start..start + ncf * ncm)?;

    Some(evaluate_block(
        block,
        ncm,
        ncf,
        sub.x,
        velocity_scale(niv, t1),
    ))
}
