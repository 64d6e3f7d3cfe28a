//! # Pose control parameters
//!
//! Loaded from `pose_ctrl.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct PoseCtrlParams {
    /// Proportional gains
    pub k_p: AxisGains,

    /// Integral gains
    pub k_i: AxisGains,

    /// Derivative gains
    pub k_d: AxisGains,

    /// Time between updates above which a cycle is considered stale.
    ///
    /// Units: seconds
    #[serde(default = "default_stale_threshold_s")]
    pub stale_threshold_s: f64,

    /// Bound on the magnitude of each integral accumulator
    #[serde(default = "default_integral_limit")]
    pub integral_limit: f64,
}

/// One gain per controlled axis.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct AxisGains {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl AxisGains {
    /// Gains in (x, y, z, yaw) order.
    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.z, self.yaw]
    }
}

fn default_stale_threshold_s() -> f64 {
    1.0
}

fn default_integral_limit() -> f64 {
    1.0
}
