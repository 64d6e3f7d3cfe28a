//! # Simulated platform
//!
//! Ground vehicle driving with a constant speed and turn rate.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Isometry3, Vector3};

use super::SimParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimPlatform {
    position_m: Vector3<f64>,

    yaw_rad: f64,

    speed_ms: f64,

    yaw_rate_rads: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimPlatform {
    pub fn new(params: &SimParams) -> Self {
        Self {
            position_m: Vector3::from(params.ugv_start_m),
            yaw_rad: params.ugv_start_yaw_rad,
            speed_ms: params.ugv_speed_ms,
            yaw_rate_rads: params.ugv_yaw_rate_rads,
        }
    }

    pub fn step(&mut self, dt_s: f64) {
        let (position_m, yaw_rad) = self.propagate(dt_s);
        self.position_m = position_m;
        self.yaw_rad = yaw_rad;
    }

    pub fn tf(&self) -> Isometry3<f64> {
        Isometry3::new(self.position_m, Vector3::z() * self.yaw_rad)
    }

    /// Transform of the platform `horizon_s` into the future, assuming it keeps driving as it is.
    pub fn predicted_tf(&self, horizon_s: f64) -> Isometry3<f64> {
        let (position_m, yaw_rad) = self.propagate(horizon_s);
        Isometry3::new(position_m, Vector3::z() * yaw_rad)
    }

    fn propagate(&self, dt_s: f64) -> (Vector3<f64>, f64) {
        // Midpoint heading for the turn
        let heading = self.yaw_rad + 0.5 * self.yaw_rate_rads * dt_s;
        let position_m = self.position_m
            + Vector3::new(heading.cos(), heading.sin(), 0.0) * self.speed_ms * dt_s;

        (position_m, self.yaw_rad + self.yaw_rate_rads * dt_s)
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::test::sim_params;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_straight_line_and_prediction() {
        let mut params = sim_params();
        params.ugv_start_m = [1.0, 2.0, 0.0];
        params.ugv_start_yaw_rad = FRAC_PI_2;
        params.ugv_speed_ms = 0.5;
        params.ugv_yaw_rate_rads = 0.0;

        let mut platform = SimPlatform::new(&params);
        let predicted = platform.predicted_tf(2.0);

        for _ in 0..100 {
            platform.step(0.02);
        }

        // Driven 1 m along +Y, matching the 2 s prediction
        let t = platform.tf().translation.vector;
        assert!((t - Vector3::new(1.0, 3.0, 0.0)).norm() < 1e-9);
        assert!((predicted.translation.vector - t).norm() < 1e-9);
    }
}
