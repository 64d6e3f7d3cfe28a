//! # Landing executable parameters
//!
//! Loaded from `land_exec.toml`.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Top level parameters of the executable.
#[derive(Debug, Clone, Deserialize)]
pub struct LandExecParams {
    /// Frequency of the control cycle, which is also the sample rate of planned trajectories.
    ///
    /// Units: Hertz
    pub cycle_frequency_hz: f64,

    pub geometry: LandingGeometry,

    pub limits: KinematicLimits,
}

/// Geometry of the approach and touchdown, all expressed relative to the platform.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct LandingGeometry {
    /// Height above the platform at which the aircraft hovers after takeoff and while following.
    ///
    /// Units: meters
    pub takeoff_height_m: f64,

    /// Height of the platform's landing surface above its reference point.
    ///
    /// Units: meters
    pub ugv_height_m: f64,

    /// Horizontal standoff distance behind the platform used during following and rendezvous.
    ///
    /// Units: meters
    pub landing_horizontal_m: f64,

    /// Height of the touchdown point in the platform frame.
    ///
    /// Units: meters
    pub touchdown_height_m: f64,

    /// Forward offset of the touchdown point in the platform frame.
    ///
    /// Units: meters
    pub touchdown_offset_m: f64,

    /// Nominal descent velocity used to bound the landing duration.
    ///
    /// Units: meters/second
    pub landing_velocity_ms: f64,
}

/// Symmetric per-axis kinematic bounds.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct KinematicLimits {
    /// Units: meters/second
    pub v_max_ms: f64,

    /// Units: meters/second^2
    pub a_max_mss: f64,
}

/// A parameter outside of its allowed range.
#[derive(Debug, thiserror::Error)]
#[error("Invalid parameter: {0}")]
pub struct InvalidParam(pub &'static str);

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LandExecParams {
    pub fn cycle_period_s(&self) -> f64 {
        1.0 / self.cycle_frequency_hz
    }

    /// Check the values which later divide or bound the control cycle.
    pub fn validate(&self) -> Result<(), InvalidParam> {
        if !(self.cycle_frequency_hz > 0.0 && self.cycle_frequency_hz.is_finite()) {
            return Err(InvalidParam("cycle_frequency_hz must be positive"));
        }
        if !(self.geometry.landing_velocity_ms > 0.0) {
            return Err(InvalidParam("landing_velocity_ms must be positive"));
        }
        if !(self.limits.v_max_ms > 0.0 && self.limits.a_max_mss > 0.0) {
            return Err(InvalidParam("kinematic limits must be positive"));
        }

        Ok(())
    }
}

impl LandingGeometry {
    /// Distance from the platform origin to the standoff point,
    /// `sqrt(landing_horizontal^2 + takeoff_height^2)`.
    pub fn following_norm_m(&self) -> f64 {
        self.landing_horizontal_m.hypot(self.takeoff_height_m)
    }
}
