//! # Pose control module
//!
//! Converts the current and target `Pose4` into a velocity command for the flight control stack
//! using an independent PID controller on each of the x, y, z and yaw axes.
//!
//! The translational outputs are clamped to the kinematic velocity limit and each integral
//! accumulator is clamped to a fixed bound. If the time since the last update exceeds the stale
//! threshold (or there has been no previous update) the controller outputs zero and only resets
//! its update time.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod controllers;
mod params;
mod state;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use controllers::PidController;
pub use params::{AxisGains, PoseCtrlParams};
pub use state::{InitData, InputData, PoseCtrl, StatusReport};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum PoseCtrlError {
    #[error("Invalid pose control parameters: {0}")]
    InvalidParams(&'static str),

    #[error("The current or target pose contains non-finite values")]
    NonFiniteInput,
}
