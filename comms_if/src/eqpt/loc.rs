//! # Localisation Equipment Interface
//!
//! Pose and safe-flight-corridor messages produced by the state estimation and corridor
//! generation equipment.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use chrono::{serde::ts_milliseconds, DateTime, Utc};
use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A 6-DoF pose of a body in the world frame.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoseMsg {
    /// UTC timestamp at which the pose was estimated
    #[serde(with = "ts_milliseconds")]
    pub timestamp: DateTime<Utc>,

    /// The position in the world frame.
    ///
    /// Units: meters
    pub position_m: [f64; 3],

    /// The attitude of the body in the world frame as a (w, x, y, z) quaternion. This quaternion
    /// rotates a vector from the body frame into the world frame.
    pub attitude_q: [f64; 4],
}

/// A plane bounding a convex corridor, given by a point on the plane and its outward normal.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct TangentPlane {
    /// A point on the plane
    pub point_m: [f64; 3],

    /// The outward facing normal of the plane
    pub normal: [f64; 3],
}

/// A convex safe flight corridor, described as the intersection of the half-spaces behind each
/// of its tangent planes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Corridor {
    pub planes: Vec<TangentPlane>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl PoseMsg {
    pub fn new(position_m: [f64; 3], attitude_q: [f64; 4]) -> Self {
        Self {
            timestamp: Utc::now(),
            position_m,
            attitude_q,
        }
    }
}

impl TangentPlane {
    /// Returns true if the point is on the inner side of (or on) the plane.
    pub fn contains(&self, point_m: &[f64; 3]) -> bool {
        let mut dot = 0.0;
        for i in 0..3 {
            dot += (point_m[i] - self.point_m[i]) * self.normal[i];
        }
        dot <= 0.0
    }
}

impl Corridor {
    /// Returns true if the point lies inside every plane of the corridor.
    pub fn contains(&self, point_m: &[f64; 3]) -> bool {
        self.planes.iter().all(|p| p.contains(point_m))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
