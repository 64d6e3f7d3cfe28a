//! # Standoff follower
//!
//! Holds the aircraft at the standoff point behind and above the platform, moving with it.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::Vector3;

use super::FollowStrategy;
use crate::{
    loc::{LocSnapshot, Pose4},
    params::LandingGeometry,
    traj::{gateway::standoff_point_m, player::to_world},
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Standoff {
    /// Standoff point in the platform frame
    point_m: Vector3<f64>,

    /// Distance of the standoff point from the platform origin
    following_norm_m: f64,

    handover_tolerance_m: f64,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Standoff {
    pub fn new(geom: &LandingGeometry, handover_tolerance_m: f64) -> Self {
        Self {
            point_m: standoff_point_m(geom),
            following_norm_m: geom.following_norm_m(),
            handover_tolerance_m,
        }
    }

    /// World frame standoff setpoint for the measured platform pose.
    pub fn target(&self, loc: &LocSnapshot) -> Pose4 {
        to_world(&self.point_m, &loc.ugv_tf, loc.ugv_pose.yaw)
    }
}

impl FollowStrategy for Standoff {
    fn next_target(&mut self, loc: &LocSnapshot) -> Pose4 {
        self.target(loc)
    }

    fn handover_ready(&self, loc: &LocSnapshot, gateway_ready: bool) -> bool {
        loc.rel_position_m.norm() - self.following_norm_m < self.handover_tolerance_m
            && gateway_ready
    }

    fn name(&self) -> &'static str {
        "Standoff"
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
