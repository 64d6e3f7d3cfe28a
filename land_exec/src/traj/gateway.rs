//! # Trajectory gateway
//!
//! Owns the trajectory optimiser. The expensive prerequisite setup runs once on a dedicated task
//! as soon as the first corridor set is available, after which the gateway is handed to the control
//! cycle which uses it for the online replan on entry to landing.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::mpsc::{channel, Receiver},
    thread::{self, JoinHandle},
    time::Instant,
};

use comms_if::eqpt::loc::Corridor;
use log::{debug, error, info, warn};
use nalgebra::Vector3;
use util::{session, time::std_duration_to_millis};

use super::{
    optimiser::{ConstraintBundle, CorridorType, DynConstraints, KinematicInfo},
    SampledTraj, TrajError, TrajOptimiser, TrajParams,
};
use crate::params::{KinematicLimits, LandExecParams, LandingGeometry};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Trajectory gateway, see module level documentation.
pub struct TrajGateway {
    optimiser: Box<dyn TrajOptimiser>,

    /// True if the prerequisite search found a feasible heuristic optimum
    prerequisite_set: bool,

    /// Trajectory from the standoff point to touchdown computed during setup
    /// Touchdown point in the platform frame
    goal_m: Vector3<f64>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajGateway {
    /// Set up the optimiser. This call blocks for the duration of the prerequisite search and
    /// must not be made from the control cycle.
    pub fn setup(
        mut optimiser: Box<dyn TrajOptimiser>,
        traj_params: &TrajParams,
        exec_params: &LandExecParams,
        corridors: Vec<Corridor>,
    ) -> Result<Self, TrajError> {
        let geom = &exec_params.geometry;

        let info = KinematicInfo {
            axis_dim: traj_params.axis_dim,
            n_order: traj_params.n_order,
            m: traj_params.m,
            d_order: traj_params.d_order,
        };

        info!("Setting up trajectory optimiser with {} corridors", corridors.len());

        let constraints = ConstraintBundle {
            sfc_list: corridors,
            d_constraints: DynConstraints::symmetric(
                exec_params.limits.v_max_ms,
                exec_params.limits.a_max_mss,
            ),
            corridor_type: CorridorType::Polyhedron,
        };

        let time_hyp_s = time_hypotheses(geom, &exec_params.limits);
        let start_m = standoff_point_m(geom);
        let goal_m = touchdown_point_m(geom);

        info!(
            "Landing time hypotheses: [{:.3}, {:.3}] s, start {:?}, goal {:?}",
            time_hyp_s[0],
            time_hyp_s[1],
            start_m.as_slice(),
            goal_m.as_slice()
        );

        optimiser.setup(&info, &constraints, exec_params.cycle_frequency_hz)?;

        let t0 = Instant::now();
        optimiser.set_prerequisite(
            time_hyp_s,
            traj_params.sample_square_root,
            traj_params.sample_square_root,
        )?;
        optimiser.update_boundary(&start_m, &goal_m, &Vector3::zeros())?;
        log_timing("Optimiser matrices", t0);

        let t0 = Instant::now();
        optimiser.optimise_samples()?;
        let opt_info = optimiser.optimal_traj_info()?;
        log_timing("Sample optimisation", t0);

        let t0 = Instant::now();
        let initial_traj = optimiser.replan_online(&start_m, &goal_m)?;
        log_timing("Initial online replan", t0);

        if opt_info.feasible {
            info!(
                "Trajectory prerequisite set, optimal time allocation {:?} s",
                opt_info.time_allocation_s
            );
            debug!("Initial landing trajectory has {} samples", initial_traj.len());
            session::save_with_timestamp("traj/initial_traj.json", initial_traj);
        } else {
            warn!("No feasible heuristic optimum found, landing trajectories will not be played");
        }

        Ok(Self {
            optimiser,
            prerequisite_set: opt_info.feasible,
            goal_m,
        })
    }

    /// True if the prerequisite is satisfied and replans may be issued.
    pub fn is_ready(&self) -> bool {
        self.prerequisite_set
    }

    #[cfg(test)]
    pub fn goal_m(&self) -> &Vector3<f64> {
        &self.goal_m
    }

    /// Replan from `start_m` (platform frame) to the touchdown point.
    pub fn replan(&mut self, start_m: &Vector3<f64>) -> Result<SampledTraj, TrajError> {
        if !self.prerequisite_set {
            return Err(TrajError::PrerequisiteNotSet);
        }

        let t0 = Instant::now();
        let traj = self.optimiser.replan_online(start_m, &self.goal_m)?;
        log_timing("Online replan", t0);

        if traj.is_empty() {
            return Err(TrajError::EmptyTrajectory);
        }

        session::save_with_timestamp("traj/landing_traj.json", traj.clone());

        Ok(traj)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// `[min, max]` landing duration hypotheses.
///
/// The maximum assumes the horizontal and vertical legs are flown one after the other at the
/// landing velocity, the minimum flies the straight line at `v_max`.
pub fn time_hypotheses(geom: &LandingGeometry, limits: &KinematicLimits) -> [f64; 2] {
    let drop_m = geom.takeoff_height_m - geom.touchdown_height_m;

    let max_s = (drop_m + geom.landing_horizontal_m) / geom.landing_velocity_ms;
    let min_s = drop_m.hypot(geom.landing_horizontal_m) / limits.v_max_ms;

    [min_s, max_s]
}

/// Standoff point behind the platform, in the platform frame.
pub fn standoff_point_m(geom: &LandingGeometry) -> Vector3<f64> {
    Vector3::new(-geom.landing_horizontal_m, 0.0, geom.takeoff_height_m)
}

/// Touchdown point in the platform frame.
pub fn touchdown_point_m(geom: &LandingGeometry) -> Vector3<f64> {
    Vector3::new(geom.touchdown_offset_m, 0.0, geom.touchdown_height_m)
}

/// Spawn the one-shot setup task.
///
/// The task blocks until the first corridor set arrives on `corridor_rx`, sets up the gateway and
/// sends it on the returned receiver.
pub fn spawn_setup_task(
    optimiser: Box<dyn TrajOptimiser>,
    traj_params: TrajParams,
    exec_params: LandExecParams,
    corridor_rx: Receiver<Vec<Corridor>>,
) -> (JoinHandle<Result<(), TrajError>>, Receiver<TrajGateway>) {
    let (gateway_tx, gateway_rx) = channel();

    let handle = thread::spawn(move || {
        let result = corridor_rx
            .recv()
            .map_err(|_| TrajError::NoCorridors)
            .and_then(|corridors| {
                TrajGateway::setup(optimiser, &traj_params, &exec_params, corridors)
            })
            .and_then(|gateway| {
                gateway_tx
                    .send(gateway)
                    .map_err(|_| TrajError::GatewayNotDelivered)
            });

        if let Err(ref e) = result {
            error!("Trajectory setup failed: {}", e);
        }

        result
    });

    (handle, gateway_rx)
}

fn log_timing(what: &str, start: Instant) {
    let ms = std_duration_to_millis(start.elapsed());
    info!("{}: {:.3} ms ({:.1} Hz)", what, ms, 1e3 / ms.max(1e-6));
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::traj::optimiser::{OptError, OptTrajInfo};

    /// Optimiser returning a fixed straight line, used to check the gateway plumbing.
    pub(crate) struct LineOptimiser {
        pub(crate) feasible: bool,
    }

    impl TrajOptimiser for LineOptimiser {
        fn setup(&mut self, _: &KinematicInfo, _: &ConstraintBundle, _: f64) -> Result<(), OptError> {
            Ok(())
        }

        fn set_prerequisite(&mut self, hyp: [f64; 2], _: usize, _: usize) -> Result<(), OptError> {
            assert!(hyp[0] < hyp[1]);
            Ok(())
        }

        fn update_boundary(
            &mut self,
            _: &Vector3<f64>,
            _: &Vector3<f64>,
            vel: &Vector3<f64>,
        ) -> Result<(), OptError> {
            assert_eq!(*vel, Vector3::zeros());
            Ok(())
        }

        fn optimise_samples(&mut self) -> Result<(), OptError> {
            Ok(())
        }

        fn optimal_traj_info(&self) -> Result<OptTrajInfo, OptError> {
            Ok(OptTrajInfo {
                feasible: self.feasible,
                ..Default::default()
            })
        }

        fn replan_online(
            &mut self,
            start_m: &Vector3<f64>,
            goal_m: &Vector3<f64>,
        ) -> Result<SampledTraj, OptError> {
            Ok(SampledTraj {
                sample_period_s: 0.1,
                points_m: (0..=10)
                    .map(|i| start_m + (goal_m - start_m) * (i as f64 / 10.0))
                    .collect(),
            })
        }
    }

    fn exec_params() -> LandExecParams {
        toml::from_str(include_str!("../../../params/land_exec.toml")).unwrap()
    }

    fn traj_params() -> TrajParams {
        toml::from_str(include_str!("../../../params/traj.toml")).unwrap()
    }

    #[test]
    fn test_time_hypotheses() {
        let geom = LandingGeometry {
            takeoff_height_m: 1.2,
            ugv_height_m: 0.3,
            landing_horizontal_m: 0.4,
            touchdown_height_m: 0.2,
            touchdown_offset_m: 0.0,
            landing_velocity_ms: 0.5,
        };
        let limits = KinematicLimits {
            v_max_ms: 2.0,
            a_max_mss: 1.0,
        };

        let [min_s, max_s] = time_hypotheses(&geom, &limits);

        assert!((max_s - 2.8).abs() < 1e-12);
        assert!((min_s - (1.16f64).sqrt() / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_setup_sequence() {
        let opt = LineOptimiser { feasible: true };

        let mut gateway =
            TrajGateway::setup(Box::new(opt), &traj_params(), &exec_params(), vec![]).unwrap();

        assert!(gateway.is_ready());

        let standoff_m = standoff_point_m(&exec_params().geometry);
        let traj = gateway.replan(&standoff_m).unwrap();
        assert!((traj.points_m[0] - standoff_m).norm() < 1e-12);
    }

    #[test]
    fn test_infeasible_setup_blocks_replan() {
        let opt = LineOptimiser { feasible: false };

        let mut gateway =
            TrajGateway::setup(Box::new(opt), &traj_params(), &exec_params(), vec![]).unwrap();

        assert!(!gateway.is_ready());
        assert!(matches!(
            gateway.replan(&Vector3::new(-1.0, 0.0, 1.0)),
            Err(TrajError::PrerequisiteNotSet)
        ));
    }

    #[test]
    fn test_replan_ends_at_touchdown() {
        let opt = LineOptimiser { feasible: true };

        let mut gateway =
            TrajGateway::setup(Box::new(opt), &traj_params(), &exec_params(), vec![]).unwrap();

        let start_m = Vector3::new(-2.0, 0.5, 1.5);
        let traj = gateway.replan(&start_m).unwrap();

        assert_eq!(traj.points_m[0], start_m);
        assert!((traj.points_m[traj.len() - 1] - gateway.goal_m()).norm() < 1e-12);
    }

    #[test]
    fn test_setup_task_waits_for_corridors() {
        let opt = LineOptimiser { feasible: true };
        let (corridor_tx, corridor_rx) = channel();

        let (handle, gateway_rx) =
            spawn_setup_task(Box::new(opt), traj_params(), exec_params(), corridor_rx);

        assert!(gateway_rx.try_recv().is_err());

        corridor_tx.send(vec![Corridor::default()]).unwrap();

        let gateway = gateway_rx.recv().unwrap();
        assert!(gateway.is_ready());
        assert!(handle.join().unwrap().is_ok());
    }

    #[test]
    fn test_setup_task_without_corridors() {
        let opt = LineOptimiser { feasible: true };
        let (corridor_tx, corridor_rx) = channel::<Vec<Corridor>>();
        drop(corridor_tx);

        let (handle, gateway_rx) =
            spawn_setup_task(Box::new(opt), traj_params(), exec_params(), corridor_rx);

        assert!(matches!(handle.join().unwrap(), Err(TrajError::NoCorridors)));
        assert!(gateway_rx.recv().is_err());
    }
}
