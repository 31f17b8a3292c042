use log::{error, warn};
use nalgebra::Vector3;

use super::{
    params::Params,
    perturbers::{Perturber, DEFAULT_PERTURBERS},
    ForceConfig, ForceModel, Particle,
};
use crate::{
    constants::{JulianDate, SolarMass, DEFAULT_TIME_ORIGIN_JD},
    ephem_errors::EphemError,
    jpl_ephem::resolver::EphemerisResolver,
};

/// Newtonian attraction of the first `N_ephem` perturbers on every particle.
///
/// Perturber positions are read from the ephemeris at `jde = t + time_origin`
/// and converted to AU with the file's AU definition. For each perturber `b`
/// of mass `m`:
///
/// ```text
/// a_p += -G·m·(r_p - r_b) / |r_p - r_b|³
/// ```
///
/// Every position is resolved before any particle is touched, so a failed
/// lookup leaves the accelerations unchanged.
#[derive(Debug)]
pub struct EphemerisForce {
    resolver: EphemerisResolver,
    perturbers: Vec<Perturber>,
    time_origin: JulianDate,
}

impl EphemerisForce {
    pub fn new(resolver: EphemerisResolver) -> Self {
        EphemerisForce {
            resolver,
            perturbers: DEFAULT_PERTURBERS.to_vec(),
            time_origin: DEFAULT_TIME_ORIGIN_JD,
        }
    }

    pub fn with_perturbers(mut self, perturbers: Vec<Perturber>) -> Self {
        self.perturbers = perturbers;
        self
    }

    /// Julian date (TDB) of simulation time `t = 0`.
    pub fn with_time_origin(mut self, time_origin: JulianDate) -> Self {
        self.time_origin = time_origin;
        self
    }

    pub fn perturbers(&self) -> &[Perturber] {
        &self.perturbers
    }

    pub fn time_origin(&self) -> JulianDate {
        self.time_origin
    }

    pub fn resolver(&self) -> &EphemerisResolver {
        &self.resolver
    }

    pub fn resolver_mut(&mut self) -> &mut EphemerisResolver {
        &mut self.resolver
    }

    /// Mass and position (AU) of the configured perturbers at simulation time `t`.
    pub fn perturber_positions(
        &self,
        config: &ForceConfig,
        t: f64,
    ) -> Result<Vec<(SolarMass, Vector3<f64>)>, EphemError> {
        if config.n_ephem == 0 {
            return Ok(Vec::new());
        }

        let jde = t + self.time_origin;
        let cau = self.resolver.header()?.cau;
        let reference = config.reference();

        let mut positions = Vec::with_capacity(config.n_ephem);
        for perturber in &self.perturbers[..config.n_ephem] {
            let state = self
                .resolver
                .resolve(jde, perturber.body, reference)
                .inspect_err(|err| {
                    if let EphemError::OutOfRange { .. } = err {
                        warn!("{} position unavailable at t = {t}: {err}", perturber.body);
                    }
                })?;
            positions.push((perturber.mass, state.position / cau));
        }

        Ok(positions)
    }
}

impl ForceModel for EphemerisForce {
    fn apply(
        &self,
        params: &Params,
        particles: &mut [Particle],
        t: f64,
        g: f64,
    ) -> Result<(), EphemError> {
        let config = ForceConfig::from_params(params, self.perturbers.len())
            .inspect_err(|err| error!("ephemeris force not configured: {err}"))?;

        let bodies = self.perturber_positions(&config, t)?;

        for (mass, body_position) in bodies {
            for particle in particles.iter_mut() {
                let d = particle.position - body_position;
                let r = d.norm();
                let prefac = g * mass / (r * r * r);
                particle.acceleration -= d * prefac;
            }
        }

        Ok(())
    }

    fn name(&self) -> &'static str {
        "ephemeris_forces"
    }
}
