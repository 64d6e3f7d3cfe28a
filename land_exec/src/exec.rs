//! # Landing executive
//!
//! Ties the localisation, mission and pose control modules together into the control cycle. Each
//! cycle runs synchronously: snapshot, mission step (including any replan and trajectory or
//! pattern stepping), pose control, then publication.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::mpsc::{Receiver, TryRecvError};

use comms_if::eqpt::fcs::{AttitudeTarget, FcsCmd, VelocityCmd};
use log::{debug, trace, warn};
use util::module::State;

use crate::{
    fcs::FlightCtrl,
    loc::{LocError, LocMgr},
    mission::{MissionMgr, MissionTm},
    pose_ctrl::{self, PoseCtrl},
    traj::TrajGateway,
};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

pub struct LandExec {
    loc_mgr: LocMgr,

    mission: MissionMgr,

    pose_ctrl: PoseCtrl,

    /// Receiver for the gateway built by the setup task, dropped once the task has finished
    gateway_rx: Option<Receiver<TrajGateway>>,
}

/// Everything produced by one control cycle.
#[derive(Debug, Clone, Copy)]
pub struct CycleOutput {
    pub cmd: FcsCmd,

    pub tm: MissionTm,

    /// Pose control report, `None` if the motors were cut or pose control failed
    pub ctrl_report: Option<pose_ctrl::StatusReport>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl LandExec {
    pub fn new(
        loc_mgr: LocMgr,
        mission: MissionMgr,
        pose_ctrl: PoseCtrl,
        gateway_rx: Receiver<TrajGateway>,
    ) -> Self {
        Self {
            loc_mgr,
            mission,
            pose_ctrl,
            gateway_rx: Some(gateway_rx),
        }
    }

    /// Check whether the setup task has delivered the trajectory gateway, handing it to the
    /// mission if so.
    ///
    /// Returns true once the setup task has finished, successfully or not.
    pub fn poll_setup(&mut self) -> bool {
        let result = match self.gateway_rx {
            Some(ref rx) => rx.try_recv(),
            None => return true,
        };

        match result {
            Ok(gateway) => {
                self.mission.set_gateway(gateway);
                self.gateway_rx = None;
                true
            }
            Err(TryRecvError::Empty) => false,
            Err(TryRecvError::Disconnected) => {
                warn!("Trajectory setup task ended without a gateway, landing will not be possible");
                self.gateway_rx = None;
                true
            }
        }
    }

    /// Run one control cycle at `time_s`.
    ///
    /// Returns `Ok(None)` without doing anything until the FCS state, aircraft pose and platform
    /// pose have all been received.
    pub fn cycle(
        &mut self,
        time_s: f64,
        fcs: &mut dyn FlightCtrl,
    ) -> Result<Option<CycleOutput>, LocError> {
        self.poll_setup();

        let loc = match self.loc_mgr.snapshot()? {
            Some(l) => l,
            None => {
                trace!("Localisation not yet available");
                return Ok(None);
            }
        };

        let tm = self.mission.step(time_s, &loc, fcs);

        let (cmd, ctrl_report) = if tm.state.is_kill() {
            (FcsCmd::Kill(AttitudeTarget::kill()), None)
        } else {
            match self.pose_ctrl.proc(&pose_ctrl::InputData {
                time_s,
                current: loc.uav_pose,
                target: tm.target,
            }) {
                Ok((cmd, report)) => {
                    if report.saturated.iter().any(|s| *s) {
                        debug!("PoseCtrl output saturated: {:?}", report.saturated);
                    }
                    (FcsCmd::Velocity(cmd), Some(report))
                }
                Err(e) => {
                    warn!("PoseCtrl error, commanding zero velocity: {}", e);
                    (FcsCmd::Velocity(VelocityCmd::zero()), None)
                }
            }
        };

        if let Err(e) = fcs.send_cmd(&cmd) {
            warn!("Could not send the FCS command: {}", e);
        }
        if let Err(e) = fcs.send_mission_tm(&tm) {
            warn!("Could not send the mission TM: {}", e);
        }

        Ok(Some(CycleOutput {
            cmd,
            tm,
            ctrl_report,
        }))
    }

    pub fn mission(&self) -> &MissionMgr {
        &self.mission
    }

    pub fn loc_mgr(&self) -> &LocMgr {
        &self.loc_mgr
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        mission::{test::MockFcs, MissionParams, MissionState},
        params::LandExecParams,
        pose_ctrl::{InitData, PoseCtrlParams},
    };
    use comms_if::eqpt::fcs::{FcsState, FlightMode};
    use nalgebra::Isometry3;
    use std::sync::mpsc::channel;

    fn exec() -> (LandExec, LocMgr, std::sync::mpsc::Sender<TrajGateway>) {
        let exec_params: LandExecParams =
            toml::from_str(include_str!("../../params/land_exec.toml")).unwrap();
        let mission_params: MissionParams =
            toml::from_str(include_str!("../../params/mission.toml")).unwrap();
        let ctrl_params: PoseCtrlParams =
            toml::from_str(include_str!("../../params/pose_ctrl.toml")).unwrap();

        let (loc_mgr, _corridor_rx) = LocMgr::new();
        let mission = MissionMgr::new(mission_params, &exec_params, 4).unwrap();

        let mut pose_ctrl = PoseCtrl::default();
        pose_ctrl
            .init(
                InitData {
                    params: ctrl_params,
                    v_max_ms: exec_params.limits.v_max_ms,
                },
                None,
            )
            .unwrap();

        let (gateway_tx, gateway_rx) = channel();

        (
            LandExec::new(loc_mgr.clone(), mission, pose_ctrl, gateway_rx),
            loc_mgr,
            gateway_tx,
        )
    }

    #[test]
    fn test_idle_until_loc_available() {
        let (mut exec, loc_mgr, _gateway_tx) = exec();
        let mut fcs = MockFcs::default();

        assert!(exec.cycle(0.0, &mut fcs).unwrap().is_none());

        loc_mgr
            .on_fcs_state(FcsState {
                connected: true,
                armed: false,
                mode: FlightMode::Offboard,
            })
            .unwrap();
        loc_mgr.on_uav_pose(Isometry3::identity()).unwrap();
        assert!(exec.cycle(0.02, &mut fcs).unwrap().is_none());

        // Nothing published or requested yet
        assert!(fcs.cmds.is_empty());
        assert!(fcs.tms.is_empty());
        assert_eq!(fcs.arm_requests, 0);

        loc_mgr.on_ugv_pose(Isometry3::identity()).unwrap();
        let out = exec.cycle(0.04, &mut fcs).unwrap().unwrap();

        assert_eq!(out.tm.state, MissionState::Idle);
        assert_eq!(fcs.arm_requests, 1);
        assert_eq!(fcs.cmds.len(), 1);
        assert_eq!(fcs.tms.len(), 1);
        assert!(matches!(out.cmd, FcsCmd::Velocity(_)));
    }

    #[test]
    fn test_velocity_then_setup_delivery() {
        let (mut exec, loc_mgr, gateway_tx) = exec();
        let mut fcs = MockFcs::default();

        loc_mgr
            .on_fcs_state(FcsState {
                connected: true,
                armed: true,
                mode: FlightMode::Offboard,
            })
            .unwrap();
        loc_mgr.on_uav_pose(Isometry3::identity()).unwrap();
        loc_mgr
            .on_ugv_pose(Isometry3::translation(3.0, 0.0, 0.0))
            .unwrap();

        assert!(!exec.poll_setup());

        // First cycle arms the mission, the controller's first tick is stale
        let out = exec.cycle(0.0, &mut fcs).unwrap().unwrap();
        assert_eq!(out.tm.state, MissionState::Armed);
        assert_eq!(out.cmd, FcsCmd::Velocity(VelocityCmd::zero()));
        assert!(out.ctrl_report.unwrap().stale_tick);

        // Second cycle climbs towards the takeoff point
        let out = exec.cycle(0.02, &mut fcs).unwrap().unwrap();
        match out.cmd {
            FcsCmd::Velocity(v) => {
                assert!(v.linear_ms[2] > 0.0);
                assert_eq!(v.linear_ms[0], 0.0);
            }
            c => panic!("Expected a velocity command, got {:?}", c),
        }

        // Setup task finishing without a gateway is reported as finished
        drop(gateway_tx);
        assert!(exec.poll_setup());
        assert!(!exec.mission().gateway_ready());
    }

    #[cfg(feature = "sim")]
    #[test]
    fn test_sim_mission_to_completion() {
        use crate::{
            follow::FollowStrategyKind,
            sim::{SimOptimiser, SimParams, SimWorld},
            traj::{spawn_setup_task, TrajParams},
        };
        use std::time::{Duration, Instant};

        let exec_params: LandExecParams =
            toml::from_str(include_str!("../../params/land_exec.toml")).unwrap();
        let traj_params: TrajParams =
            toml::from_str(include_str!("../../params/traj.toml")).unwrap();
        let ctrl_params: PoseCtrlParams =
            toml::from_str(include_str!("../../params/pose_ctrl.toml")).unwrap();
        let mut sim_params: SimParams =
            toml::from_str(include_str!("../../params/sim.toml")).unwrap();
        let mut mission_params: MissionParams =
            toml::from_str(include_str!("../../params/mission.toml")).unwrap();

        // Stationary platform, standoff following, and a landing threshold tight enough for the
        // settled aircraft to complete the shutdown
        sim_params.ugv_speed_ms = 0.0;
        sim_params.ugv_yaw_rate_rads = 0.0;
        mission_params.follow.strategy = FollowStrategyKind::Standoff;
        mission_params.land_done_threshold_m = 0.08;

        let sim = SimWorld::new(&sim_params);
        let (loc_mgr, corridor_rx) = LocMgr::new();

        let (_setup_jh, gateway_rx) = spawn_setup_task(
            Box::new(SimOptimiser::new()),
            traj_params.clone(),
            exec_params.clone(),
            corridor_rx,
        );

        let mission =
            MissionMgr::new(mission_params, &exec_params, traj_params.replan_start_index).unwrap();
        let mut pose_ctrl = PoseCtrl::default();
        pose_ctrl
            .init(
                InitData {
                    params: ctrl_params,
                    v_max_ms: exec_params.limits.v_max_ms,
                },
                None,
            )
            .unwrap();

        let mut exec = LandExec::new(loc_mgr.clone(), mission, pose_ctrl, gateway_rx);
        let mut fcs = sim.fcs();

        // First publication releases the corridors to the setup task
        sim.publish(&loc_mgr).unwrap();
        let t0 = Instant::now();
        while !exec.poll_setup() {
            assert!(t0.elapsed() < Duration::from_secs(10));
            std::thread::sleep(Duration::from_millis(1));
        }
        assert!(exec.mission().gateway_ready());

        let dt_s = exec_params.cycle_period_s();
        let mut states = vec![];

        for i in 0..(120.0 / dt_s) as usize {
            sim.publish(&loc_mgr).unwrap();

            let out = exec.cycle(i as f64 * dt_s, &mut fcs).unwrap().unwrap();

            if states.last() != Some(&out.tm.state) {
                states.push(out.tm.state);
            }

            if out.tm.state.is_kill() {
                assert!(matches!(out.cmd, FcsCmd::Kill(_)));
            } else {
                assert!(matches!(out.cmd, FcsCmd::Velocity(_)));
            }

            if out.tm.state == MissionState::MissionComplete {
                break;
            }

            sim.step(dt_s).unwrap();
        }

        assert_eq!(
            states,
            vec![
                MissionState::Idle,
                MissionState::Armed,
                MissionState::Tookoff,
                MissionState::Follow,
                MissionState::Rendezvous,
                MissionState::Land,
                MissionState::Shutdown,
                MissionState::MissionComplete,
            ]
        );

        // Let the aircraft drop onto the deck
        for _ in 0..50 {
            sim.step(dt_s).unwrap();
        }

        let status = sim.status().unwrap();
        assert!(status.on_deck);
        assert_eq!(
            status.last_tm.map(|tm| tm.state),
            Some(MissionState::MissionComplete)
        );
    }
}
