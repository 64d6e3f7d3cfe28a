//! # Follow strategies
//!
//! The FOLLOW mission state delegates the choice of setpoint to a [`FollowStrategy`], so that the
//! demonstration block pattern and the standoff follower can be swapped through the mission
//! parameters without changing the state machine.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod block_pattern;
mod standoff;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::Deserialize;

use crate::{
    loc::{LocSnapshot, Pose4},
    params::LandingGeometry,
};

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use block_pattern::{BlockPattern, BlockPatternParams};
pub use standoff::Standoff;

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// A behaviour producing the setpoint while following the platform.
pub trait FollowStrategy: Send {
    /// Get the setpoint for this cycle.
    fn next_target(&mut self, loc: &LocSnapshot) -> Pose4;

    /// True once the strategy is happy to hand over to the rendezvous. Strategies which never
    /// hand over can rely on the default.
    fn handover_ready(&self, _loc: &LocSnapshot, _gateway_ready: bool) -> bool {
        false
    }

    fn name(&self) -> &'static str;
}

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct FollowParams {
    pub strategy: FollowStrategyKind,

    /// Allowed excess of the aircraft's distance from the platform over the standoff distance
    /// before the standoff follower hands over.
    ///
    /// Units: meters
    pub handover_tolerance_m: f64,

    pub block_pattern: BlockPatternParams,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum FollowStrategyKind {
    BlockPattern,
    Standoff,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Build the strategy selected in the parameters.
pub fn build_strategy(
    params: &FollowParams,
    geom: &LandingGeometry,
    cycle_frequency_hz: f64,
) -> Box<dyn FollowStrategy> {
    match params.strategy {
        FollowStrategyKind::BlockPattern => Box::new(BlockPattern::new(
            params.block_pattern.clone(),
            geom.takeoff_height_m,
            cycle_frequency_hz,
        )),
        FollowStrategyKind::Standoff => {
            Box::new(Standoff::new(geom, params.handover_tolerance_m))
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
