//! Dense output of a completed Gauss-Radau step.
//!
//! A 15th-order Gauss-Radau step (IAS15) represents the acceleration over
//! the step as a polynomial in the step fraction `h`:
//!
//! ```text
//! a(h) = a0 + b0·h + b1·h² + … + b6·h⁷
//! ```
//!
//! Integrating twice from the step start state gives the position and the
//! velocity at any fraction of the step. This module evaluates them at the
//! seven interior Gauss-Radau nodes, using the coefficients the integrator
//! stored for its last completed step. Nothing is re-integrated.
//!
//! Output
//! ------
//! For each particle, [`SAMPLES_PER_STEP`] samples: the step start, then the
//! seven nodes at `t = t_end + dt·(h - 1)`.
use nalgebra::Vector3;

use crate::constants::{GAUSS_RADAU_NODES, SAMPLES_PER_STEP};

/// Number of `b` coefficient vectors of a Gauss-Radau step.
pub const RADAU_COEFFS: usize = 7;

/// Start state and step coefficients of one particle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParticleStep {
    pub x0: Vector3<f64>,
    pub v0: Vector3<f64>,
    pub a0: Vector3<f64>,
    pub b: [Vector3<f64>; RADAU_COEFFS],
}

/// Everything needed to interpolate inside the last completed step.
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationStepState {
    /// host time at the end of the step
    pub t_end: f64,
    /// size of the last completed step
    pub dt: f64,
    pub particles: Vec<ParticleStep>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StateSample {
    pub t: f64,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

/// Position weights `s[0..9]` at node fraction `h`.
fn position_weights(dt: f64, h: f64) -> [f64; 9] {
    let mut s = [0.0; 9];
    s[0] = dt * h;
    s[1] = s[0] * s[0] / 2.;
    s[2] = s[1] * h / 3.;
    s[3] = s[2] * h / 2.;
    s[4] = 3. * s[3] * h / 5.;
    s[5] = 2. * s[4] * h / 3.;
    s[6] = 5. * s[5] * h / 7.;
    s[7] = 3. * s[6] * h / 4.;
    s[8] = 7. * s[7] * h / 9.;
    s
}

/// Velocity weights `s[0..8]` at node fraction `h`.
fn velocity_weights(dt: f64, h: f64) -> [f64; 8] {
    let mut s = [0.0; 8];
    s[0] = dt * h;
    s[1] = s[0] * h / 2.;
    s[2] = 2. * s[1] * h / 3.;
    s[3] = 3. * s[2] * h / 4.;
    s[4] = 4. * s[3] * h / 5.;
    s[5] = 5. * s[4] * h / 6.;
    s[6] = 6. * s[5] * h / 7.;
    s[7] = 7. * s[6] * h / 8.;
    s
}

impl ParticleStep {
    /// State at node fraction `h` of a step of size `dt`.
    pub fn predict(&self, dt: f64, h: f64) -> (Vector3<f64>, Vector3<f64>) {
        let b = &self.b;

        let s = position_weights(dt, h);
        let position = self.x0
            + (b[6] * s[8]
                + b[5] * s[7]
                + b[4] * s[6]
                + b[3] * s[5]
                + b[2] * s[4]
                + b[1] * s[3]
                + b[0] * s[2]
                + self.a0 * s[1]
                + self.v0 * s[0]);

        let s = velocity_weights(dt, h);
        let velocity = self.v0
            + b[6] * s[7]
            + b[5] * s[6]
            + b[4] * s[5]
            + b[3] * s[4]
            + b[2] * s[3]
            + b[1] * s[2]
            + b[0] * s[1]
            + self.a0 * s[0];

        (position, velocity)
    }
}

impl IntegrationStepState {
    /// Host times of the samples: step start, then the seven nodes.
    pub fn sample_times(&self) -> [f64; SAMPLES_PER_STEP] {
        let mut times = [0.0; SAMPLES_PER_STEP];
        for (t, h) in times.iter_mut().zip(GAUSS_RADAU_NODES.iter()) {
            *t = self.t_end + self.dt * (h - 1.0);
        }
        times
    }

    /// Samples of every particle over the step.
    ///
    /// Return
    /// ------
    /// * One array per particle, in particle order, each holding the start
    ///   state followed by the seven node states. Times are monotone in the
    ///   direction of integration.
    pub fn dense_output(&self) -> Vec<[StateSample; SAMPLES_PER_STEP]> {
        let times = self.sample_times();

        self.particles
            .iter()
            .map(|particle| {
                let mut samples = [StateSample {
                    t: times[0],
                    position: particle.x0,
                    velocity: particle.v0,
                }; SAMPLES_PER_STEP];

                for n in 1..SAMPLES_PER_STEP {
                    let (position, velocity) = particle.predict(self.dt, GAUSS_RADAU_NODES[n]);
                    samples[n] = StateSample {
                        t: times[n],
                        position,
                        velocity,
                    };
                }
                samples
            })
            .collect()
    }
}
