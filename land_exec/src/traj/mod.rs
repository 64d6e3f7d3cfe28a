//! # Landing trajectory module
//!
//! - [`optimiser`] defines the interface of the corridor-constrained trajectory optimiser.
//! - [`gateway`] performs the one-shot optimiser setup and issues online replans.
//! - [`player`] steps through a sampled trajectory one sample per control cycle.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod gateway;
pub mod optimiser;
mod params;
pub mod player;

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use gateway::{spawn_setup_task, time_hypotheses, TrajGateway};
pub use optimiser::{OptError, SampledTraj, TrajOptimiser};
pub use params::TrajParams;
pub use player::{PlayStep, TrajPlayer};

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum TrajError {
    #[error("Optimiser error: {0}")]
    OptError(OptError),

    #[error("The trajectory optimiser prerequisite has not been satisfied")]
    PrerequisiteNotSet,

    #[error("The optimiser returned an empty trajectory")]
    EmptyTrajectory,

    #[error("The corridor channel was closed before any corridors were received")]
    NoCorridors,

    #[error("The setup task could not deliver the gateway")]
    GatewayNotDelivered,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl From<OptError> for TrajError {
    fn from(e: OptError) -> Self {
        Self::OptError(e)
    }
}
