//! # Flight control stack interface
//!
//! The mission and executive talk to the flight control stack (FCS) through the [`FlightCtrl`]
//! trait, which covers the mode and arming services as well as the per-cycle command outputs.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::fcs::{FcsCmd, FlightMode};

use crate::mission::MissionTm;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Request/response and publication interface of the flight control stack.
pub trait FlightCtrl {
    /// Request a flight mode change. Returns `Ok(true)` if the FCS accepted the request.
    fn set_mode(&mut self, mode: FlightMode) -> Result<bool, FcsError>;

    /// Request the motors be armed. Returns `Ok(true)` if the FCS accepted the request.
    fn arm(&mut self) -> Result<bool, FcsError>;

    /// Publish the command for this cycle.
    fn send_cmd(&mut self, cmd: &FcsCmd) -> Result<(), FcsError>;

    /// Publish the mission state report for this cycle.
    fn send_mission_tm(&mut self, tm: &MissionTm) -> Result<(), FcsError>;
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FcsError {
    #[error("The FCS is not connected")]
    NotConnected,

    #[error("The {0} service call failed: {1}")]
    ServiceFailed(&'static str, String),

    #[error("Could not publish to the FCS: {0}")]
    PublishFailed(String),
}
