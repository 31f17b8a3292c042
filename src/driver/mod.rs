//! Thin driver around a Gauss-Radau host: read initial conditions,
//! integrate with dense sampling, write the trajectory.
use camino::Utf8Path;
use log::info;

use crate::ephem_errors::EphemError;

pub mod initial_conditions;
pub mod integration;
pub mod trajectory_output;

use initial_conditions::InitialConditions;
use integration::{integrate, RadauHost};
use trajectory_output::save_trajectory;

/// Run a full integration from an initial-conditions file to a trajectory file.
///
/// Arguments
/// ---------
/// * `host` : the integrator, with its force models attached
/// * `ic_path` : initial-conditions file
/// * `output_path` : trajectory file, overwritten
/// * `n_ephem` : number of ephemeris perturbers to enable
///
/// Return
/// ------
/// * The number of rows written.
pub fn run<H: RadauHost>(
    host: &mut H,
    ic_path: impl AsRef<Utf8Path>,
    output_path: impl AsRef<Utf8Path>,
    n_ephem: usize,
) -> Result<usize, EphemError> {
    let ic = InitialConditions::from_file(ic_path.as_ref())?;
    info!(
        "integrating {} particles from t = {} over {} (step {})",
        ic.particles.len(),
        ic.tstart,
        ic.trange,
        ic.tstep
    );

    let rows = integrate(host, &ic, n_ephem)?;
    save_trajectory(output_path.as_ref(), &rows)?;
    Ok(rows.len())
}
