//! # Block pattern follower
//!
//! Demonstration follow behaviour which flies a rectangular loop above the platform.
//!
//! The loop is built lazily on the first call. Each edge between consecutive corners is subdivided
//! into samples spaced by the step velocity at the control frequency, and the whole loop is
//! repeated `num_loops` times. Each call plays one sample, transformed into the world frame with
//! the measured platform pose. Whenever an edge completes the aircraft's current position is
//! captured, and once every edge is consumed the last captured position is held.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use log::{debug, info};
use nalgebra::Vector3;
use serde::Deserialize;

use super::FollowStrategy;
use crate::{
    loc::{LocSnapshot, Pose4},
    params::InvalidParam,
    traj::player::to_world,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct BlockPatternParams {
    /// Corners of the loop in the platform frame (x, y), visited in order and closed back to the
    /// first.
    ///
    /// Units: meters
    pub corners_m: Vec<[f64; 2]>,

    /// Speed along each edge.
    ///
    /// Units: meters/second
    pub step_velocity_ms: f64,

    /// Number of times the loop is flown
    pub num_loops: usize,
}

#[derive(Debug, Clone)]
pub struct BlockPattern {
    params: BlockPatternParams,

    /// Height of the loop in the platform frame
    height_m: f64,

    cycle_frequency_hz: f64,

    /// Samples of each edge, `None` until first used
    edges: Option<Vec<Vec<Vector3<f64>>>>,

    /// Index of the current edge
    edge: usize,

    /// Index of the next sample within the current edge
    sample: usize,

    /// Aircraft pose captured at the last edge rollover
    hover: Option<Pose4>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl BlockPatternParams {
    /// Check the values which size the pattern.
    pub fn validate(&self) -> Result<(), InvalidParam> {
        if !(self.step_velocity_ms > 0.0 && self.step_velocity_ms.is_finite()) {
            return Err(InvalidParam("step_velocity_ms must be positive"));
        }
        if self.num_loops == 0 {
            return Err(InvalidParam("num_loops must be at least 1"));
        }
        if self.corners_m.len() < 2 {
            return Err(InvalidParam("the block pattern needs at least two corners"));
        }

        Ok(())
    }
}

impl BlockPattern {
    pub fn new(params: BlockPatternParams, height_m: f64, cycle_frequency_hz: f64) -> Self {
        Self {
            params,
            height_m,
            cycle_frequency_hz,
            edges: None,
            edge: 0,
            sample: 0,
            hover: None,
        }
    }

    /// True once every edge has been flown.
    pub fn is_complete(&self) -> bool {
        match self.edges {
            Some(ref e) => self.edge >= e.len(),
            None => false,
        }
    }

    /// Total number of edges, once built.
    pub fn num_edges(&self) -> Option<usize> {
        self.edges.as_ref().map(|e| e.len())
    }

    fn build(&self) -> Vec<Vec<Vector3<f64>>> {
        let corners: Vec<Vector3<f64>> = self
            .params
            .corners_m
            .iter()
            .map(|c| Vector3::new(c[0], c[1], self.height_m))
            .collect();

        let mut loop_edges = Vec::with_capacity(corners.len());

        for (i, start) in corners.iter().enumerate() {
            let end = &corners[(i + 1) % corners.len()];

            // Truncation is intended, any partial step is dropped
            let steps = ((end - start).norm() / self.params.step_velocity_ms
                * self.cycle_frequency_hz) as usize;

            let edge: Vec<Vector3<f64>> = (0..steps)
                .map(|k| start + (end - start) / steps as f64 * (k + 1) as f64)
                .collect();

            debug!("Block pattern edge {} has {} samples", i, edge.len());

            loop_edges.push(edge);
        }

        let edges: Vec<Vec<Vector3<f64>>> = (0..self.params.num_loops)
            .flat_map(|_| loop_edges.iter().cloned())
            .collect();

        info!("Block pattern built with {} edges", edges.len());

        edges
    }
}

impl FollowStrategy for BlockPattern {
    fn next_target(&mut self, loc: &LocSnapshot) -> Pose4 {
        if self.edges.is_none() {
            self.edges = Some(self.build());
        }

        let edges = match self.edges {
            Some(ref e) => e,
            None => return loc.uav_pose,
        };

        // Roll over completed edges, capturing the aircraft position each time
        while self.edge < edges.len() && self.sample >= edges[self.edge].len() {
            self.edge += 1;
            self.sample = 0;
            self.hover = Some(Pose4::new(
                loc.uav_pose.x,
                loc.uav_pose.y,
                loc.uav_pose.z,
                loc.ugv_pose.yaw,
            ));
        }

        if self.edge >= edges.len() {
            return self.hover.unwrap_or(Pose4::new(
                loc.uav_pose.x,
                loc.uav_pose.y,
                loc.uav_pose.z,
                loc.ugv_pose.yaw,
            ));
        }

        let point_m = edges[self.edge][self.sample];
        self.sample += 1;

        to_world(&point_m, &loc.ugv_tf, loc.ugv_pose.yaw)
    }

    fn name(&self) -> &'static str {
        "BlockPattern"
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
