//! # Mission telemetry

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

use super::MissionState;
use crate::loc::Pose4;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Mission state report, published every cycle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MissionTm {
    pub state: MissionState,

    /// Setpoint commanded this cycle, in the world frame
    pub target: Pose4,

    /// Units: seconds
    pub time_s: f64,

    /// Index of the next landing trajectory sample, if one is loaded
    pub traj_index: Option<usize>,
}
