//! # Landing library.
//!
//! This library allows other crates in the workspace (and the benchmarks) to access items defined
//! inside the landing executable crate.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Landing executive - runs one control cycle over all modules
pub mod exec;

/// Flight control stack interface - mode and arming services and command outputs
pub mod fcs;

/// Follow strategies - setpoints for the aircraft while it follows the platform
pub mod follow;

/// Localisation module - aggregates the asynchronously received poses into consistent snapshots
pub mod loc;

/// Mission manager - the state machine sequencing the flight
pub mod mission;

/// Executable parameters
pub mod params;

/// Pose control module - converts the commanded setpoint into a velocity command
pub mod pose_ctrl;

/// Landing trajectory module - optimiser setup, online replanning and playback
pub mod traj;

/// Software-in-the-loop simulation of the aircraft, platform and optimiser
#[cfg(feature = "sim")]
pub mod sim;
