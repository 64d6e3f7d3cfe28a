//! # Flight Control Stack Equipment Interface
//!
//! Types describing the state reported by the flight control stack (FCS) and the commands sent to
//! it every control cycle.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// State record reported by the flight control stack.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct FcsState {
    /// True if the FCS is connected to the autopilot
    pub connected: bool,

    /// True if the motors are armed
    pub armed: bool,

    /// The current flight mode
    pub mode: FlightMode,
}

/// Velocity setpoint in the world frame.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct VelocityCmd {
    /// Linear velocity demand.
    ///
    /// Units: meters/second
    pub linear_ms: [f64; 3],

    /// Yaw rate demand about the world Z axis.
    ///
    /// Units: radians/second
    pub yaw_rate_rads: f64,
}

/// Raw attitude target, only used to cut thrust once the aircraft is on the platform.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttitudeTarget {
    /// Attitude quaternion in (w, x, y, z) order
    pub attitude_q: [f64; 4],

    /// Normalised collective thrust between 0 and 1
    pub thrust: f64,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Flight modes of the autopilot, named as the autopilot reports them.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FlightMode {
    Manual,
    Stabilized,
    Altctl,
    Posctl,
    Offboard,
    AutoLand,
    Unknown,
}

/// Command published to the FCS on a given cycle.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub enum FcsCmd {
    /// Track the given velocity setpoint
    Velocity(VelocityCmd),

    /// Cut thrust
    Kill(AttitudeTarget),
}

#[derive(Debug, thiserror::Error)]
#[error("Unrecognised flight mode \"{0}\"")]
pub struct FlightModeParseError(pub String);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Default for FcsState {
    fn default() -> Self {
        Self {
            connected: false,
            armed: false,
            mode: FlightMode::Unknown,
        }
    }
}

impl VelocityCmd {
    /// A command demanding no motion
    pub fn zero() -> Self {
        Self::default()
    }
}

impl AttitudeTarget {
    /// Level attitude with zero thrust.
    pub fn kill() -> Self {
        Self {
            attitude_q: [1.0, 0.0, 0.0, 0.0],
            thrust: 0.0,
        }
    }
}

impl FromStr for FlightMode {
    type Err = FlightModeParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "MANUAL" => Ok(FlightMode::Manual),
            "STABILIZED" => Ok(FlightMode::Stabilized),
            "ALTCTL" => Ok(FlightMode::Altctl),
            "POSCTL" => Ok(FlightMode::Posctl),
            "OFFBOARD" => Ok(FlightMode::Offboard),
            "AUTO.LAND" => Ok(FlightMode::AutoLand),
            s => Err(FlightModeParseError(s.to_string())),
        }
    }
}

impl Display for FlightMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FlightMode::Manual => write!(f, "MANUAL"),
            FlightMode::Stabilized => write!(f, "STABILIZED"),
            FlightMode::Altctl => write!(f, "ALTCTL"),
            FlightMode::Posctl => write!(f, "POSCTL"),
            FlightMode::Offboard => write!(f, "OFFBOARD"),
            FlightMode::AutoLand => write!(f, "AUTO.LAND"),
            FlightMode::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
