//! # Trajectory optimiser interface
//!
//! The landing trajectory is produced by an external corridor-constrained optimiser. It is set up
//! once with the kinematic bounds and safe flight corridors, searches a grid of time allocation
//! hypotheses for the best feasible solution, and afterwards answers fast online replans between
//! a start and goal point in the platform frame.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::loc::Corridor;
use nalgebra::Vector3;
use serde::Serialize;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Structure of the piecewise polynomial the optimiser solves for.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicInfo {
    pub axis_dim: usize,
    pub n_order: usize,
    pub m: usize,
    pub d_order: usize,
}

/// Per-axis dynamic bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DynConstraints {
    pub v_max: Vector3<f64>,
    pub v_min: Vector3<f64>,
    pub a_max: Vector3<f64>,
    pub a_min: Vector3<f64>,
}

/// Everything the optimiser is constrained by.
#[derive(Debug, Clone)]
pub struct ConstraintBundle {
    /// Ordered safe flight corridors, one per trajectory segment
    pub sfc_list: Vec<Corridor>,

    pub d_constraints: DynConstraints,

    pub corridor_type: CorridorType,
}

/// Trajectory sampled at a fixed period, expressed in the platform frame.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SampledTraj {
    /// Units: seconds
    pub sample_period_s: f64,

    /// Units: meters
    pub points_m: Vec<Vector3<f64>>,
}

/// Result of the prerequisite optimisation.
#[derive(Debug, Clone, Default)]
pub struct OptTrajInfo {
    /// True if a feasible heuristic optimum was found
    pub feasible: bool,

    pub traj: SampledTraj,

    /// Duration of each segment of the optimal solution.
    ///
    /// Units: seconds
    pub time_allocation_s: Vec<f64>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorridorType {
    /// Corridors are convex polyhedra described by tangent planes
    Polyhedron,
}

#[derive(Debug, thiserror::Error)]
pub enum OptError {
    #[error("The optimiser has not been set up")]
    NotSetUp,

    #[error("The optimiser prerequisite has not been set")]
    PrerequisiteNotSet,

    #[error("The optimiser boundary conditions have not been set")]
    BoundaryNotSet,

    #[error("No feasible trajectory within [{0:.3}, {1:.3}] s")]
    Infeasible(f64, f64),

    #[error("Invalid optimiser input: {0}")]
    InvalidInput(String),
}

// ------------------------------------------------------------------------------------------------
// TRAITS
// ------------------------------------------------------------------------------------------------

/// Black-box corridor-constrained trajectory optimiser.
///
/// All positions are in the platform frame.
pub trait TrajOptimiser: Send {
    fn setup(
        &mut self,
        info: &KinematicInfo,
        constraints: &ConstraintBundle,
        frequency_hz: f64,
    ) -> Result<(), OptError>;

    /// Set the `[min, max]` duration hypotheses and the resolution of the sample grid.
    fn set_prerequisite(
        &mut self,
        time_hypotheses_s: [f64; 2],
        sample_rows: usize,
        sample_cols: usize,
    ) -> Result<(), OptError>;

    fn update_boundary(
        &mut self,
        start_m: &Vector3<f64>,
        end_m: &Vector3<f64>,
        velocity_ms: &Vector3<f64>,
    ) -> Result<(), OptError>;

    /// Run the (expensive) search over the sample grid.
    fn optimise_samples(&mut self) -> Result<(), OptError>;

    fn optimal_traj_info(&self) -> Result<OptTrajInfo, OptError>;

    /// Quickly replan from `start_m` to `goal_m` reusing the prerequisite solution.
    fn replan_online(
        &mut self,
        start_m: &Vector3<f64>,
        goal_m: &Vector3<f64>,
    ) -> Result<SampledTraj, OptError>;
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl DynConstraints {
    /// Bounds of `±v_max` and `±a_max` on all three axes.
    pub fn symmetric(v_max: f64, a_max: f64) -> Self {
        Self {
            v_max: Vector3::repeat(v_max),
            v_min: Vector3::repeat(-v_max),
            a_max: Vector3::repeat(a_max),
            a_min: Vector3::repeat(-a_max),
        }
    }
}

impl SampledTraj {
    pub fn len(&self) -> usize {
        self.points_m.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points_m.is_empty()
    }

    /// Duration spanned by the samples.
    ///
    /// Units: seconds
    pub fn duration_s(&self) -> f64 {
        self.sample_period_s * self.len() as f64
    }
}
