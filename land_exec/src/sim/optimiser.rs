//! # Simulated trajectory optimiser
//!
//! Stand-in for the corridor-constrained optimiser which plans straight-line minimum jerk
//! trajectories. The prerequisite search walks the grid of duration hypotheses and picks the
//! shortest duration which respects the velocity and acceleration bounds, with both boundary
//! points inside the corridors.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::loc::Corridor;
use log::debug;
use nalgebra::Vector3;

use crate::traj::{
    optimiser::{ConstraintBundle, KinematicInfo, OptTrajInfo},
    OptError, SampledTraj, TrajOptimiser,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Peak velocity of a unit minimum jerk move of unit duration
const MIN_JERK_PEAK_VEL: f64 = 1.875;

/// Peak acceleration of a unit minimum jerk move of unit duration, `10 / sqrt(3)`
const MIN_JERK_PEAK_ACC: f64 = 5.773_502_691_896_258;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct SimOptimiser {
    /// Sample frequency
    frequency_hz: f64,

    /// Tightest velocity and acceleration bounds over all axes
    v_max_ms: f64,
    a_max_mss: f64,

    corridors: Vec<Corridor>,

    set_up: bool,

    /// Candidate durations to search
    hypotheses_s: Vec<f64>,

    boundary: Option<(Vector3<f64>, Vector3<f64>)>,

    /// Optimal duration, `Some` once the search has run, `Some(None)` if nothing was feasible
    optimum_s: Option<Option<f64>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimOptimiser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shortest duration for which a move of `distance_m` stays within the bounds.
    fn min_duration_s(&self, distance_m: f64) -> f64 {
        let t_vel = MIN_JERK_PEAK_VEL * distance_m / self.v_max_ms;
        let t_acc = (MIN_JERK_PEAK_ACC * distance_m / self.a_max_mss).sqrt();

        t_vel.max(t_acc).max(1.0 / self.frequency_hz)
    }

    fn in_corridors(&self, point_m: &Vector3<f64>) -> bool {
        let p = [point_m.x, point_m.y, point_m.z];
        self.corridors.iter().any(|c| c.contains(&p))
    }

    /// Sample the minimum jerk move from `start_m` to `end_m` lasting `duration_s`, including
    /// both ends.
    fn sample(&self, start_m: &Vector3<f64>, end_m: &Vector3<f64>, duration_s: f64) -> SampledTraj {
        let num_steps = (duration_s * self.frequency_hz).ceil().max(1.0) as usize;

        let points_m = (0..=num_steps)
            .map(|k| {
                let tau = k as f64 / num_steps as f64;
                let s = tau.powi(3) * (10.0 - 15.0 * tau + 6.0 * tau.powi(2));
                start_m + (end_m - start_m) * s
            })
            .collect();

        SampledTraj {
            sample_period_s: 1.0 / self.frequency_hz,
            points_m,
        }
    }
}

impl TrajOptimiser for SimOptimiser {
    fn setup(
        &mut self,
        info: &KinematicInfo,
        constraints: &ConstraintBundle,
        frequency_hz: f64,
    ) -> Result<(), OptError> {
        if info.axis_dim != 3 {
            return Err(OptError::InvalidInput(format!(
                "only 3 axes are supported, got {}",
                info.axis_dim
            )));
        }
        if !(frequency_hz > 0.0) {
            return Err(OptError::InvalidInput(format!(
                "frequency must be positive, got {}",
                frequency_hz
            )));
        }

        let d = &constraints.d_constraints;
        self.v_max_ms = d.v_max.min().min(-d.v_min.max());
        self.a_max_mss = d.a_max.min().min(-d.a_min.max());

        if !(self.v_max_ms > 0.0 && self.a_max_mss > 0.0) {
            return Err(OptError::InvalidInput(
                "dynamic bounds must contain zero".into(),
            ));
        }

        self.frequency_hz = frequency_hz;
        self.corridors = constraints.sfc_list.clone();
        self.set_up = true;

        Ok(())
    }

    fn set_prerequisite(
        &mut self,
        time_hypotheses_s: [f64; 2],
        sample_rows: usize,
        sample_cols: usize,
    ) -> Result<(), OptError> {
        if !self.set_up {
            return Err(OptError::NotSetUp);
        }

        let [min_s, max_s] = time_hypotheses_s;
        let num = sample_rows * sample_cols;

        if !(min_s > 0.0 && min_s <= max_s) || num == 0 {
            return Err(OptError::InvalidInput(format!(
                "bad prerequisite [{}, {}] with {} samples",
                min_s, max_s, num
            )));
        }

        self.hypotheses_s = if num == 1 {
            vec![max_s]
        } else {
            (0..num)
                .map(|i| min_s + (max_s - min_s) * i as f64 / (num - 1) as f64)
                .collect()
        };

        Ok(())
    }

    fn update_boundary(
        &mut self,
        start_m: &Vector3<f64>,
        end_m: &Vector3<f64>,
        _velocity_ms: &Vector3<f64>,
    ) -> Result<(), OptError> {
        if self.hypotheses_s.is_empty() {
            return Err(OptError::PrerequisiteNotSet);
        }

        self.boundary = Some((*start_m, *end_m));

        Ok(())
    }

    fn optimise_samples(&mut self) -> Result<(), OptError> {
        let (start_m, end_m) = self.boundary.ok_or(OptError::BoundaryNotSet)?;

        let required_s = self.min_duration_s((end_m - start_m).norm());
        let inside = self.in_corridors(&start_m) && self.in_corridors(&end_m);

        let optimum_s = if inside {
            self.hypotheses_s.iter().copied().find(|t| *t >= required_s)
        } else {
            None
        };

        debug!(
            "Sim optimiser needs {:.3} s, boundary in corridors: {}, optimum: {:?}",
            required_s, inside, optimum_s
        );

        self.optimum_s = Some(optimum_s);

        Ok(())
    }

    fn optimal_traj_info(&self) -> Result<OptTrajInfo, OptError> {
        let (start_m, end_m) = self.boundary.ok_or(OptError::BoundaryNotSet)?;

        match self.optimum_s {
            Some(Some(t)) => Ok(OptTrajInfo {
                feasible: true,
                traj: self.sample(&start_m, &end_m, t),
                time_allocation_s: vec![t],
            }),
            Some(None) => Ok(OptTrajInfo::default()),
            None => Err(OptError::PrerequisiteNotSet),
        }
    }

    fn replan_online(
        &mut self,
        start_m: &Vector3<f64>,
        goal_m: &Vector3<f64>,
    ) -> Result<SampledTraj, OptError> {
        if !self.set_up {
            return Err(OptError::NotSetUp);
        }

        let duration_s = self.min_duration_s((goal_m - start_m).norm());

        Ok(self.sample(start_m, goal_m, duration_s))
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
