//! Force models acting on test particles.
//!
//! A force model adds its acceleration contribution to every particle; it
//! never writes positions or velocities. The host integrator calls each
//! model once per force evaluation, with the simulation time and the
//! gravitational constant in its own units.
//!
//! Available models
//! ----------------
//! * [`EphemerisForce`] – Newtonian attraction of bodies read from a JPL DE file.
use nalgebra::Vector3;

use crate::{ephem_errors::EphemError, jpl_ephem::body_ids::Body};

mod ephemeris_force;
pub mod params;
pub mod perturbers;

pub use ephemeris_force::EphemerisForce;
use params::{Params, GEOCENTRIC, N_AST, N_EPHEM, SPEED_OF_LIGHT};

/// A massless test particle, in AU and days.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub acceleration: Vector3<f64>,
}

impl Particle {
    pub fn new(position: Vector3<f64>, velocity: Vector3<f64>) -> Self {
        Particle {
            position,
            velocity,
            acceleration: Vector3::zeros(),
        }
    }
}

/// Contribution of one physical effect to the particle accelerations.
pub trait ForceModel: Send + Sync {
    /// Add the acceleration of this model to `particles`.
    ///
    /// Arguments
    /// ---------
    /// * `params` : parameters attached to the model by the host
    /// * `particles` : particles whose `acceleration` is incremented
    /// * `t` : simulation time
    /// * `g` : gravitational constant in simulation units
    fn apply(
        &self,
        params: &Params,
        particles: &mut [Particle],
        t: f64,
        g: f64,
    ) -> Result<(), EphemError>;

    fn name(&self) -> &'static str;
}

/// Parameters of the ephemeris force, checked against the perturber table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceConfig {
    pub n_ephem: usize,
    pub geocentric: bool,
    pub n_ast: Option<i64>,
    pub c: Option<f64>,
}

impl ForceConfig {
    /// Read the configuration from `params`.
    ///
    /// Arguments
    /// ---------
    /// * `params` : the parameter store
    /// * `available` : number of perturbers in the table
    ///
    /// Return
    /// ------
    /// * [`EphemError::ConfigMissing`] if `N_ephem` is not set,
    ///   [`EphemError::ConfigInvalid`] if it is negative or above `available`
    ///   or if `geocentric` is neither 0 nor 1.
    pub fn from_params(params: &Params, available: usize) -> Result<Self, EphemError> {
        let n_ephem = params
            .get_int(N_EPHEM)
            .ok_or(EphemError::ConfigMissing(N_EPHEM))?;

        let n_ephem = usize::try_from(n_ephem)
            .ok()
            .filter(|n| *n <= available)
            .ok_or_else(|| EphemError::ConfigInvalid {
                name: N_EPHEM,
                reason: format!("{n_ephem} is outside 0..={available}"),
            })?;

        let geocentric = match params.get_int(GEOCENTRIC).unwrap_or(0) {
            0 => false,
            1 => true,
            other => {
                return Err(EphemError::ConfigInvalid {
                    name: GEOCENTRIC,
                    reason: format!("expected 0 or 1, got {other}"),
                })
            }
        };

        Ok(ForceConfig {
            n_ephem,
            geocentric,
            n_ast: params.get_int(N_AST),
            c: params.get_double(SPEED_OF_LIGHT),
        })
    }

    /// Origin of the perturber positions.
    pub fn reference(&self) -> Body {
        if self.geocentric {
            Body::Earth
        } else {
            Body::Barycenter
        }
    }
}
