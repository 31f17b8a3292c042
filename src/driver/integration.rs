//! Integration loop sampling the trajectory inside every step.
//!
//! The host integrator is abstracted behind [`RadauHost`]. The loop asks the
//! host to stop exactly at each output time; the host reports every step it
//! completed on the way, with the particle states at the start of that step
//! and its `b` coefficients, and each step is turned into dense samples.
use log::debug;

use super::{
    initial_conditions::InitialConditions,
    trajectory_output::{Trajectory, TrajectoryRow},
};
use crate::{
    constants::SAMPLES_PER_STEP,
    dense_output::IntegrationStepState,
    ephem_errors::EphemError,
    forces::{
        params::{Params, GEOCENTRIC, N_AST, N_EPHEM, N_OUT, SPEED_OF_LIGHT},
        Particle,
    },
};

/// Massive asteroids announced to the force models.
pub const DEFAULT_N_AST: i64 = 16;

/// Speed of light in AU/day.
pub const DEFAULT_SPEED_OF_LIGHT: f64 = 173.144632674;

/// Relative tolerance when matching step boundaries to host times.
const TIME_TOLERANCE: f64 = 1e-12;

/// Gauss-Radau integrator driven by [`integrate`].
///
/// Implementations own the particles and call their force models (with the
/// parameters given to [`RadauHost::setup`]) whenever accelerations are
/// needed.
pub trait RadauHost {
    /// Start a run at `t_start` with initial step size `dt`.
    fn setup(
        &mut self,
        t_start: f64,
        dt: f64,
        particles: &[Particle],
        params: &Params,
    ) -> Result<(), EphemError>;

    fn time(&self) -> f64;

    /// Advance until `t_stop` exactly.
    ///
    /// Return
    /// ------
    /// * Every step completed since the previous stop, in order. Each one
    ///   carries the particle states (`x0`, `v0`, `a0`) at its own start,
    ///   so consecutive steps chain from the previous stop to `t_stop`.
    fn integrate_to(&mut self, t_stop: f64) -> Result<Vec<IntegrationStepState>, EphemError>;
}

/// Parameters attached to the ephemeris force for a run.
pub fn force_params(ic: &InitialConditions, n_ephem: usize) -> Params {
    let mut params = Params::new();
    params.set_int(GEOCENTRIC, ic.geocentric as i64);
    params.set_int(N_EPHEM, n_ephem as i64);
    params.set_int(N_AST, DEFAULT_N_AST);
    params.set_double(SPEED_OF_LIGHT, DEFAULT_SPEED_OF_LIGHT);
    params.set_int(N_OUT, 0);
    params
}

fn same_time(a: f64, b: f64) -> bool {
    (a - b).abs() <= TIME_TOLERANCE * a.abs().max(b.abs()).max(1.0)
}

/// Check that `steps` cover `[t_from, t_stop]` without gap, for `n_particles`.
fn check_steps(
    steps: &[IntegrationStepState],
    t_from: f64,
    t_stop: f64,
    n_particles: usize,
) -> Result<(), EphemError> {
    let mut t = t_from;
    for step in steps {
        if step.particles.len() != n_particles {
            return Err(EphemError::Integration(format!(
                "host returned a step for {} particles, expected {n_particles}",
                step.particles.len()
            )));
        }
        let start = step.t_end - step.dt;
        if !same_time(start, t) {
            return Err(EphemError::Integration(format!(
                "host step starts at {start}, previous step ended at {t}"
            )));
        }
        t = step.t_end;
    }

    if !same_time(t, t_stop) {
        return Err(EphemError::Integration(format!(
            "host stopped at {t} instead of {t_stop}"
        )));
    }
    Ok(())
}

/// Integrate the initial conditions and sample every step.
///
/// Arguments
/// ---------
/// * `host` : the integrator
/// * `ic` : start time, step, range and particle states
/// * `n_ephem` : number of ephemeris perturbers to enable
///
/// Return
/// ------
/// * `8 · steps · particles` rows, ordered by time then by particle index,
///   where `steps` counts every step the host completed.
pub fn integrate<H: RadauHost>(
    host: &mut H,
    ic: &InitialConditions,
    n_ephem: usize,
) -> Result<Trajectory, EphemError> {
    let params = force_params(ic, n_ephem);
    let times = ic.output_times();
    let n_particles = ic.particles.len();

    host.setup(ic.tstart, ic.tstep, &ic.particles, &params)?;

    let capacity = times.len().saturating_sub(1) * SAMPLES_PER_STEP * n_particles;
    let mut rows = Vec::with_capacity(capacity);
    let mut n_steps = 0;

    for window in times.windows(2) {
        let (t_from, t_stop) = (window[0], window[1]);
        let steps = host.integrate_to(t_stop)?;
        check_steps(&steps, t_from, t_stop, n_particles)?;

        for step in &steps {
            let samples = step.dense_output();
            for n in 0..SAMPLES_PER_STEP {
                for (particle, particle_samples) in samples.iter().enumerate() {
                    let sample = particle_samples[n];
                    rows.push(TrajectoryRow {
                        t: sample.t,
                        particle,
                        position: sample.position,
                        velocity: sample.velocity,
                    });
                }
            }
        }
        n_steps += steps.len();
    }

    debug!(
        "integrated {} particles from {} to {} in {} steps: {} samples",
        n_particles,
        ic.tstart,
        host.time(),
        n_steps,
        rows.len()
    );

    Ok(rows)
}
