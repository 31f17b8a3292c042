//! Position/velocity sample returned by the ephemeris resolver.
//!
//! Units
//! -----------------
//! * `position`: file distance unit (kilometers for DE files)
//! * `velocity`: file distance unit per second
//!
//! Use [`BodyState::to_au`] with the file's AU definition to obtain AU and
//! AU/day. Scaling is left to the caller because different consumers need
//! different unit conventions.
//!
//! Arithmetic semantics
//! -----------------
//! Subtraction and negation are component-wise and keep the time tag of the
//! left operand; division by a scalar scales both vectors.
use nalgebra::Vector3;
use std::ops::{Add, Div, Neg, Sub};

use crate::constants::{JulianDate, SECONDS_PER_DAY};

/// State of a body at a given Julian date (TDB).
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BodyState {
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
    pub jde: JulianDate,
}

impl BodyState {
    pub fn zero(jde: JulianDate) -> Self {
        BodyState {
            position: Vector3::zeros(),
            velocity: Vector3::zeros(),
            jde,
        }
    }

    /// Convert to AU and AU/day.
    ///
    /// Arguments
    /// -----------------
    /// * `cau` : kilometers per AU, as stored in the ephemeris header
    ///
    /// Return
    /// -----------------
    /// * A new `BodyState` with `position / cau` and `velocity · 86400 / cau`.
    #[must_use = "`.to_au()` returns a new BodyState; assign or use it"]
    pub fn to_au(&self, cau: f64) -> Self {
        BodyState {
            position: self.position / cau,
            velocity: self.velocity * SECONDS_PER_DAY / cau,
            jde: self.jde,
        }
    }
}

impl Add for BodyState {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        BodyState {
            position: self.position + other.position,
            velocity: self.velocity + other.velocity,
            jde: self.jde,
        }
    }
}

impl Sub for BodyState {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        BodyState {
            position: self.position - other.position,
            velocity: self.velocity - other.velocity,
            jde: self.jde,
        }
    }
}

impl Neg for BodyState {
    type Output = Self;

    fn neg(self) -> Self::Output {
        BodyState {
            position: -self.position,
            velocity: -self.velocity,
            jde: self.jde,
        }
    }
}

impl Div<f64> for BodyState {
    type Output = Self;

    fn div(self, rhs: f64) -> Self::Output {
        BodyState {
            position: self.position / rhs,
            velocity: self.velocity / rhs,
            jde: self.jde,
        }
    }
}

#[cfg(test)]
mod body_state_test {
    use super::*;
    use crate::constants::AU;
    use approx::assert_relative_eq;

    #[test]
    fn test_to_au() {
        let state = BodyState {
            position: Vector3::new(AU, 0.0, -2.0 * AU),
            velocity: Vector3::new(AU / SECONDS_PER_DAY, 0.0, 0.0),
            jde: 2451545.0,
        };

        let au = state.to_au(AU);
        assert_eq!(au.position, Vector3::new(1.0, 0.0, -2.0));
        assert_relative_eq!(au.velocity.x, 1.0, max_relative = 1e-15);
        assert_eq!(au.jde, 2451545.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = BodyState {
            position: Vector3::new(1.0, 2.0, 3.0),
            velocity: Vector3::new(0.5, 0.5, 0.5),
            jde: 10.0,
        };
        let b = BodyState::zero(10.0);

        assert_eq!(a - b, a);
        assert_eq!(b - a, -a);
        assert_eq!((a + a) / 2.0, a);
    }
}
