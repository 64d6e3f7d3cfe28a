//! # Mission parameters
//!
//! Loaded from `mission.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::follow::FollowParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MissionParams {
    /// Minimum interval between requests to the flight control services, also used between
    /// failed replans.
    ///
    /// Units: seconds
    pub request_interval_s: f64,

    /// Distance from the takeoff hover point at which takeoff is complete.
    ///
    /// Units: meters
    pub takeoff_tolerance_m: f64,

    /// Time spent hovering after takeoff before following.
    ///
    /// Units: seconds
    pub tookoff_hold_s: f64,

    /// Time spent at the standoff point before landing.
    ///
    /// Units: seconds
    pub rendezvous_hold_s: f64,

    /// Horizontal distance to the platform under which the landing trajectory is cut short.
    ///
    /// Units: meters
    #[serde(default)]
    pub land_cut_threshold_m: f64,

    /// Horizontal distance to the platform under which an exhausted landing trajectory is
    /// complete.
    ///
    /// Units: meters
    pub land_done_threshold_m: f64,

    /// Horizontal distance to the platform under which the mission is complete after the motors
    /// are cut.
    ///
    /// Units: meters
    pub shutdown_threshold_m: f64,

    pub follow: FollowParams,
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
