//! # Pose controllers
//!
//! Single axis PID controller used on each axis of `PoseCtrl`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Serialize;
use util::maths::clamp;

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Added to the time step when computing the derivative
const DERIV_EPSILON_S: f64 = 1e-10;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A PID controller with a clamped integral accumulator.
#[derive(Debug, Serialize, Clone)]
pub struct PidController {
    /// Proportional gain
    k_p: f64,

    /// Integral gain
    k_i: f64,

    /// Derivative gain
    k_d: f64,

    /// Bound on the magnitude of the integral
    integral_limit: f64,

    /// Previous error
    prev_error: f64,

    /// The integral accumulation
    integral: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PidController {
    /// Create a new controller with the given gains.
    pub fn new(k_p: f64, k_i: f64, k_d: f64, integral_limit: f64) -> Self {
        Self {
            k_p,
            k_i,
            k_d,
            integral_limit,
            prev_error: 0.0,
            integral: 0.0,
        }
    }

    /// Get the output of the controller for the given error and time step.
    ///
    /// Returns the output and whether the integral was clamped.
    pub fn get(&mut self, error: f64, dt_s: f64) -> (f64, bool) {
        let unclamped = self.integral + error * dt_s;
        self.integral = clamp(&unclamped, &-self.integral_limit, &self.integral_limit);

        let deriv = (error - self.prev_error) / (dt_s + DERIV_EPSILON_S);

        let out = self.k_p * error + self.k_i * self.integral + self.k_d * deriv;

        self.prev_error = error;

        (out, unclamped != self.integral)
    }

    #[cfg(test)]
    pub fn integral(&self) -> f64 {
        self.integral
    }

    #[cfg(test)]
    pub fn prev_error(&self) -> f64 {
        self.prev_error
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_pid_terms() {
        let mut pid = PidController::new(2.0, 0.5, 0.1, 1.0);

        // First update, derivative relative to a zero previous error
        let (out, clamped) = pid.get(1.0, 0.1);
        assert!(!clamped);
        assert!((pid.integral() - 0.1).abs() < 1e-12);
        let expected = 2.0 * 1.0 + 0.5 * 0.1 + 0.1 * (1.0 / (0.1 + DERIV_EPSILON_S));
        assert!((out - expected).abs() < 1e-9);

        // Constant error, no derivative contribution
        let (out, _) = pid.get(1.0, 0.1);
        assert!((out - (2.0 + 0.5 * 0.2)).abs() < 1e-9);
        assert_eq!(pid.prev_error(), 1.0);
    }

    #[test]
    fn test_integral_clamp() {
        let mut pid = PidController::new(0.0, 1.0, 0.0, 1.0);

        for _ in 0..100 {
            pid.get(5.0, 0.1);
            assert!(pid.integral() <= 1.0);
        }
        let (out, clamped) = pid.get(5.0, 0.1);
        assert!(clamped);
        assert_eq!(out, 1.0);

        for _ in 0..100 {
            pid.get(-5.0, 0.1);
            assert!(pid.integral() >= -1.0);
        }
        assert_eq!(pid.integral(), -1.0);
    }
}
