//! # Mission manager
//!
//! This module implements the [`MissionMgr`] state machine, which sequences the flight from the
//! ground to a landing on the platform. The mission moves forward through the following states,
//! never backwards:
//!
//! - `IDLE` - Offboard mode and arming are requested from the flight control stack.
//! - `ARMED` - The aircraft climbs to the takeoff hover point above its start position.
//! - `TOOKOFF` - The aircraft hovers at the takeoff point for a short time.
//! - `FOLLOW` - A [`FollowStrategy`] produces the setpoints until it hands over.
//! - `RENDEZVOUS` - The aircraft holds the standoff point behind the platform.
//! - `LAND` - A landing trajectory is planned once and played back towards the touchdown point.
//! - `SHUTDOWN` - The motors are cut while the aircraft settles onto the platform.
//! - `MISSION_COMPLETE` - Nothing more to do.
//!
//! Each cycle the guard of the current state is evaluated first. Guards only read the mission
//! state, if one succeeds the transition side effects are applied and the next state becomes
//! current. The (possibly new) state then computes this cycle's setpoint.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

pub mod guards;
mod params;
mod tm;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::fmt::Display;

use comms_if::eqpt::fcs::FlightMode;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use self::guards::IdleAction;
use crate::{
    fcs::{FcsError, FlightCtrl},
    follow::{build_strategy, FollowStrategy, Standoff},
    loc::{LocSnapshot, Pose4},
    params::{LandExecParams, LandingGeometry},
    traj::{TrajGateway, TrajPlayer},
};

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use self::{params::MissionParams, tm::MissionTm};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Mission manager
///
/// Owned by the control cycle, none of this state is shared with other threads.
pub struct MissionMgr {
    params: MissionParams,

    geom: LandingGeometry,

    /// Index of the first sample played after a replan
    replan_start_index: usize,

    state: MissionState,

    /// The last state whose entry was logged
    entry_logged: Option<MissionState>,

    /// Time at which the current state was entered.
    ///
    /// Units: seconds
    state_entry_s: f64,

    /// Time of the last request to the flight control services
    last_request_s: Option<f64>,

    /// Hover point captured on arming
    takeoff_target: Pose4,

    /// Setpoint for this cycle
    target: Pose4,

    /// True if a landing replan is still to be made in this landing attempt
    replan_pending: bool,

    /// Earliest time at which the pending replan may be attempted
    replan_retry_s: f64,

    follow: Box<dyn FollowStrategy>,

    /// Used to hold position during the rendezvous and while no landing trajectory is available
    standoff: Standoff,

    player: TrajPlayer,

    /// The trajectory gateway, once its setup is complete
    gateway: Option<TrajGateway>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MissionState {
    Idle,
    Armed,
    Tookoff,
    Follow,
    Rendezvous,
    Land,
    Shutdown,
    MissionComplete,
}

#[derive(Debug, thiserror::Error)]
pub enum MissionError {
    #[error("Failed to load MissionParams: {0}")]
    ParamLoadError(util::params::LoadError),

    #[error("Invalid mission parameters: {0}")]
    InvalidParams(&'static str),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl MissionMgr {
    /// Load the mission parameters from `params_path` and create the manager.
    pub fn init(
        params_path: &str,
        exec_params: &LandExecParams,
        replan_start_index: usize,
    ) -> Result<Self, MissionError> {
        let params: MissionParams =
            util::params::load(params_path).map_err(MissionError::ParamLoadError)?;

        Self::new(params, exec_params, replan_start_index)
    }

    pub fn new(
        params: MissionParams,
        exec_params: &LandExecParams,
        replan_start_index: usize,
    ) -> Result<Self, MissionError> {
        if !(params.request_interval_s > 0.0) {
            return Err(MissionError::InvalidParams(
                "request_interval_s must be positive",
            ));
        }
        if !(params.takeoff_tolerance_m > 0.0) {
            return Err(MissionError::InvalidParams(
                "takeoff_tolerance_m must be positive",
            ));
        }
        if params.tookoff_hold_s < 0.0 || params.rendezvous_hold_s < 0.0 {
            return Err(MissionError::InvalidParams("hold times must not be negative"));
        }
        exec_params
            .validate()
            .map_err(|e| MissionError::InvalidParams(e.0))?;
        params
            .follow
            .block_pattern
            .validate()
            .map_err(|e| MissionError::InvalidParams(e.0))?;

        let geom = exec_params.geometry;
        let follow = build_strategy(&params.follow, &geom, exec_params.cycle_frequency_hz);
        let standoff = Standoff::new(&geom, params.follow.handover_tolerance_m);

        info!("MissionMgr using the {} follow strategy", follow.name());

        Ok(Self {
            params,
            geom,
            replan_start_index,
            state: MissionState::Idle,
            entry_logged: None,
            state_entry_s: 0.0,
            last_request_s: None,
            takeoff_target: Pose4::default(),
            target: Pose4::default(),
            replan_pending: false,
            replan_retry_s: 0.0,
            follow,
            standoff,
            player: TrajPlayer::new(),
            gateway: None,
        })
    }

    /// Step the mission.
    ///
    /// Requests to the flight control services are made through `fcs`, their failures are logged
    /// and retried later.
    pub fn step(&mut self, time_s: f64, loc: &LocSnapshot, fcs: &mut dyn FlightCtrl) -> MissionTm {
        if self.guard(time_s, loc) {
            self.transition(time_s, loc);
        }

        if self.entry_logged != Some(self.state) {
            info!("Mission state: {}", self.state);
            self.entry_logged = Some(self.state);
        }

        match self.state {
            MissionState::Idle => {
                self.target = loc.uav_pose;
                self.idle(time_s, loc, fcs);
            }
            MissionState::Armed | MissionState::Tookoff => self.target = self.takeoff_target,
            MissionState::Follow => self.target = self.follow.next_target(loc),
            MissionState::Rendezvous => self.target = self.standoff.target(loc),
            MissionState::Land => self.land(time_s, loc),
            // Motors are cut, the last setpoint is held for the report
            MissionState::Shutdown | MissionState::MissionComplete => (),
        }

        MissionTm {
            state: self.state,
            target: self.target,
            time_s,
            traj_index: self.player.index(),
        }
    }

    /// Hand the set up trajectory gateway to the mission.
    pub fn set_gateway(&mut self, gateway: TrajGateway) {
        info!(
            "Trajectory gateway available (prerequisite satisfied: {})",
            gateway.is_ready()
        );
        self.gateway = Some(gateway);
    }

    pub fn gateway_ready(&self) -> bool {
        match self.gateway {
            Some(ref g) => g.is_ready(),
            None => false,
        }
    }

    pub fn state(&self) -> MissionState {
        self.state
    }

    pub fn target(&self) -> Pose4 {
        self.target
    }

    pub fn replan_pending(&self) -> bool {
        self.replan_pending
    }

    pub fn takeoff_target(&self) -> Pose4 {
        self.takeoff_target
    }

    /// Evaluate the guard of the current state.
    fn guard(&self, time_s: f64, loc: &LocSnapshot) -> bool {
        match self.state {
            MissionState::Idle => guards::idle_ready(&loc.fcs_state),
            MissionState::Armed => guards::takeoff_reached(
                &loc.uav_pose,
                &self.takeoff_target,
                self.params.takeoff_tolerance_m,
            ),
            MissionState::Tookoff => {
                guards::timer_elapsed(time_s, self.state_entry_s, self.params.tookoff_hold_s)
            }
            MissionState::Follow => self.follow.handover_ready(loc, self.gateway_ready()),
            MissionState::Rendezvous => {
                guards::timer_elapsed(time_s, self.state_entry_s, self.params.rendezvous_hold_s)
            }
            MissionState::Land => {
                self.player.is_loaded()
                    && guards::land_complete(
                        !self.player.is_exhausted(),
                        loc.rel_horizontal_m(),
                        &self.params,
                    )
            }
            MissionState::Shutdown => {
                guards::shutdown_complete(loc.rel_horizontal_m(), &self.params)
            }
            MissionState::MissionComplete => false,
        }
    }

    /// Move to the next state, applying the side effects of the transition.
    fn transition(&mut self, time_s: f64, loc: &LocSnapshot) {
        let next = match self.state.next() {
            Some(s) => s,
            None => return,
        };

        match next {
            MissionState::Armed => {
                self.takeoff_target = Pose4::new(
                    loc.uav_pose.x,
                    loc.uav_pose.y,
                    self.geom.takeoff_height_m + self.geom.ugv_height_m,
                    loc.ugv_pose.yaw,
                );
                debug!("Takeoff target: {:?}", self.takeoff_target);
            }
            MissionState::Land => {
                self.replan_pending = true;
                self.replan_retry_s = time_s;
                self.player.clear();
            }
            _ => (),
        }

        self.state = next;
        self.state_entry_s = time_s;
    }

    fn idle(&mut self, time_s: f64, loc: &LocSnapshot, fcs: &mut dyn FlightCtrl) {
        match guards::idle_action(
            &loc.fcs_state,
            time_s,
            self.last_request_s,
            self.params.request_interval_s,
        ) {
            IdleAction::None => (),
            IdleAction::SetMode => {
                self.last_request_s = Some(time_s);
                log_request("Offboard mode", fcs.set_mode(FlightMode::Offboard));
            }
            IdleAction::Arm => {
                self.last_request_s = Some(time_s);
                log_request("Arm", fcs.arm());
            }
        }
    }

    fn land(&mut self, time_s: f64, loc: &LocSnapshot) {
        if self.replan_pending && time_s >= self.replan_retry_s {
            match self.gateway.as_mut() {
                Some(gateway) if gateway.is_ready() => match gateway.replan(&loc.rel_position_m) {
                    Ok(traj) => {
                        info!("Landing trajectory of {} samples loaded", traj.len());
                        self.player.load(traj, self.replan_start_index);
                        self.replan_pending = false;
                    }
                    Err(e) => {
                        warn!("Landing replan failed, holding at the standoff point: {}", e);
                        self.replan_retry_s = time_s + self.params.request_interval_s;
                    }
                },
                _ => {
                    warn!("Landing trajectory prerequisite not satisfied, holding at the standoff point");
                    self.replan_retry_s = time_s + self.params.request_interval_s;
                }
            }
        }

        self.target = match self.player.step(&loc.ugv_pred_tf, loc.ugv_pose.yaw) {
            Some(s) => s.pose(),
            None => self.standoff.target(loc),
        };
    }
}

impl MissionState {
    /// The state following this one, `None` for the terminal state.
    pub fn next(&self) -> Option<Self> {
        match self {
            MissionState::Idle => Some(MissionState::Armed),
            MissionState::Armed => Some(MissionState::Tookoff),
            MissionState::Tookoff => Some(MissionState::Follow),
            MissionState::Follow => Some(MissionState::Rendezvous),
            MissionState::Rendezvous => Some(MissionState::Land),
            MissionState::Land => Some(MissionState::Shutdown),
            MissionState::Shutdown => Some(MissionState::MissionComplete),
            MissionState::MissionComplete => None,
        }
    }

    /// True in the states where the motors must be cut.
    pub fn is_kill(&self) -> bool {
        matches!(self, MissionState::Shutdown | MissionState::MissionComplete)
    }
}

impl Display for MissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MissionState::Idle => "IDLE",
            MissionState::Armed => "ARMED",
            MissionState::Tookoff => "TOOKOFF",
            MissionState::Follow => "FOLLOW",
            MissionState::Rendezvous => "RENDEZVOUS",
            MissionState::Land => "LAND",
            MissionState::Shutdown => "SHUTDOWN",
            MissionState::MissionComplete => "MISSION_COMPLETE",
        };

        write!(f, "{}", s)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

fn log_request(what: &str, result: Result<bool, FcsError>) {
    match result {
        Ok(true) => info!("{} request accepted", what),
        Ok(false) => warn!("{} request rejected", what),
        Err(e) => warn!("{} request failed: {}", what, e),
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::{
        follow::{test::snapshot, FollowStrategyKind},
        traj::{gateway::test::LineOptimiser, TrajParams},
    };
    use comms_if::eqpt::fcs::FcsCmd;

    /// Flight control stack which accepts every request and records everything sent to it.
    #[derive(Default)]
    pub(crate) struct MockFcs {
        pub(crate) mode_requests: Vec<FlightMode>,
        pub(crate) arm_requests: usize,
        pub(crate) cmds: Vec<FcsCmd>,
        pub(crate) tms: Vec<MissionTm>,
    }

    impl FlightCtrl for MockFcs {
        fn set_mode(&mut self, mode: FlightMode) -> Result<bool, FcsError> {
            self.mode_requests.push(mode);
            Ok(true)
        }

        fn arm(&mut self) -> Result<bool, FcsError> {
            self.arm_requests += 1;
            Ok(true)
        }

        fn send_cmd(&mut self, cmd: &FcsCmd) -> Result<(), FcsError> {
            self.cmds.push(*cmd);
            Ok(())
        }

        fn send_mission_tm(&mut self, tm: &MissionTm) -> Result<(), FcsError> {
            self.tms.push(*tm);
            Ok(())
        }
    }

    pub(crate) fn mission_params() -> MissionParams {
        toml::from_str(include_str!("../../../params/mission.toml")).unwrap()
    }

    fn exec_params() -> LandExecParams {
        toml::from_str(include_str!("../../../params/land_exec.toml")).unwrap()
    }

    fn gateway(feasible: bool) -> TrajGateway {
        let traj_params: TrajParams =
            toml::from_str(include_str!("../../../params/traj.toml")).unwrap();

        TrajGateway::setup(
            Box::new(LineOptimiser { feasible }),
            &traj_params,
            &exec_params(),
            vec![],
        )
        .unwrap()
    }

    /// Mission following the standoff point, so that it can hand over to the rendezvous.
    fn standoff_mission() -> MissionMgr {
        let mut params = mission_params();
        params.follow.strategy = FollowStrategyKind::Standoff;

        let mut mgr = MissionMgr::new(params, &exec_params(), 4).unwrap();
        mgr.set_gateway(gateway(true));
        mgr
    }

    /// Standoff point in the world with the platform at the origin.
    fn standoff_uav() -> [f64; 4] {
        let geom = exec_params().geometry;
        [-geom.landing_horizontal_m, 0.0, geom.takeoff_height_m, 0.0]
    }

    /// Drive a standoff mission into RENDEZVOUS, returning the entry time.
    fn drive_to_rendezvous(mgr: &mut MissionMgr, fcs: &mut MockFcs) -> f64 {
        let ugv = [0.0; 4];

        mgr.step(0.0, &snapshot([0.0, 0.0, 0.0, 0.0], ugv), fcs);
        assert_eq!(mgr.state(), MissionState::Armed);

        let hover = mgr.takeoff_target();
        mgr.step(1.0, &snapshot([hover.x, hover.y, hover.z, 0.0], ugv), fcs);
        assert_eq!(mgr.state(), MissionState::Tookoff);

        mgr.step(3.0, &snapshot([hover.x, hover.y, hover.z, 0.0], ugv), fcs);
        assert_eq!(mgr.state(), MissionState::Follow);

        mgr.step(3.5, &snapshot(standoff_uav(), ugv), fcs);
        assert_eq!(mgr.state(), MissionState::Rendezvous);

        3.5
    }

    #[test]
    fn test_idle_requests_arm_when_offboard() {
        let mut mgr = MissionMgr::new(mission_params(), &exec_params(), 4).unwrap();
        let mut fcs = MockFcs::default();

        let mut loc = snapshot([0.0; 4], [0.0; 4]);
        loc.fcs_state.armed = false;

        let tm = mgr.step(0.0, &loc, &mut fcs);

        assert_eq!(tm.state, MissionState::Idle);
        assert_eq!(fcs.arm_requests, 1);
        assert!(fcs.mode_requests.is_empty());

        // Not retried within the interval
        mgr.step(1.0, &loc, &mut fcs);
        assert_eq!(fcs.arm_requests, 1);

        mgr.step(2.0, &loc, &mut fcs);
        assert_eq!(fcs.arm_requests, 2);
        assert_eq!(mgr.state(), MissionState::Idle);
    }

    #[test]
    fn test_idle_requests_offboard_first() {
        let mut mgr = MissionMgr::new(mission_params(), &exec_params(), 4).unwrap();
        let mut fcs = MockFcs::default();

        let mut loc = snapshot([0.0; 4], [0.0; 4]);
        loc.fcs_state.armed = false;
        loc.fcs_state.mode = FlightMode::Posctl;

        mgr.step(0.0, &loc, &mut fcs);

        assert_eq!(fcs.mode_requests, vec![FlightMode::Offboard]);
        assert_eq!(fcs.arm_requests, 0);

        // Mode confirmed, arming follows on the next eligible cycle
        loc.fcs_state.mode = FlightMode::Offboard;
        mgr.step(0.5, &loc, &mut fcs);
        assert_eq!(fcs.arm_requests, 0);
        mgr.step(2.0, &loc, &mut fcs);
        assert_eq!(fcs.arm_requests, 1);
    }

    #[test]
    fn test_takeoff_within_tolerance() {
        let mut mgr = MissionMgr::new(mission_params(), &exec_params(), 4).unwrap();
        let mut fcs = MockFcs::default();
        let ugv = [0.0, 0.0, 0.0, 0.25];

        mgr.step(0.0, &snapshot([0.3, -0.2, 0.0, 0.0], ugv), &mut fcs);
        assert_eq!(mgr.state(), MissionState::Armed);

        let geom = exec_params().geometry;
        let hover = mgr.takeoff_target();
        assert_eq!(hover.x, 0.3);
        assert_eq!(hover.y, -0.2);
        assert!((hover.z - (geom.takeoff_height_m + geom.ugv_height_m)).abs() < 1e-12);
        assert!((hover.yaw - 0.25).abs() < 1e-12);
        assert_eq!(mgr.target(), hover);

        // 0.2 m away
        mgr.step(0.5, &snapshot([0.3, -0.2, hover.z - 0.2, 0.0], ugv), &mut fcs);
        assert_eq!(mgr.state(), MissionState::Armed);

        // 0.1 m away
        mgr.step(0.52, &snapshot([0.3, -0.2, hover.z - 0.1, 0.0], ugv), &mut fcs);
        assert_eq!(mgr.state(), MissionState::Tookoff);
    }

    #[test]
    fn test_rendezvous_hold_then_land() {
        let mut mgr = standoff_mission();
        let mut fcs = MockFcs::default();
        let loc = snapshot(standoff_uav(), [0.0; 4]);

        let entry_s = drive_to_rendezvous(&mut mgr, &mut fcs);

        mgr.step(entry_s + 3.98, &loc, &mut fcs);
        assert_eq!(mgr.state(), MissionState::Rendezvous);
        assert!(!mgr.replan_pending());

        let tm = mgr.step(entry_s + 4.0, &loc, &mut fcs);
        assert_eq!(tm.state, MissionState::Land);

        // Replanned on entry and the first sample played from the start index
        assert!(!mgr.replan_pending());
        assert_eq!(tm.traj_index, Some(5));
    }

    #[test]
    fn test_infeasible_landing_holds_standoff() {
        let mut mgr = standoff_mission();
        let mut fcs = MockFcs::default();

        let entry_s = drive_to_rendezvous(&mut mgr, &mut fcs);
        mgr.set_gateway(gateway(false));

        // Aircraft directly over the platform
        let loc = snapshot([0.0, 0.0, 0.5, 0.0], [0.0; 4]);

        let tm = mgr.step(entry_s + 4.0, &loc, &mut fcs);
        assert_eq!(tm.state, MissionState::Land);
        assert!(mgr.replan_pending());
        assert_eq!(tm.traj_index, None);

        let standoff = standoff_uav();
        assert_eq!(tm.target, Pose4::new(standoff[0], standoff[1], standoff[2], 0.0));

        // No progress, however close the aircraft is
        for i in 1..200 {
            let tm = mgr.step(entry_s + 4.0 + i as f64 * 0.02, &loc, &mut fcs);
            assert_eq!(tm.state, MissionState::Land);
        }
        assert!(mgr.replan_pending());
    }

    #[test]
    fn test_landing_to_completion() {
        let mut mgr = standoff_mission();
        let mut fcs = MockFcs::default();
        let ugv = [0.0; 4];

        let entry_s = drive_to_rendezvous(&mut mgr, &mut fcs);
        let mut t = entry_s + 4.0;

        // Trajectory of 11 samples started at index 4, the aircraft stays at the standoff point
        let far = snapshot(standoff_uav(), ugv);
        for _ in 0..7 {
            assert_eq!(mgr.step(t, &far, &mut fcs).state, MissionState::Land);
            t += 0.02;
        }

        // Exhausted but too far away, the touchdown point is held
        let tm = mgr.step(t, &far, &mut fcs);
        assert_eq!(tm.state, MissionState::Land);
        assert_eq!(tm.traj_index, Some(11));
        assert!(tm.target.x.abs() < 1e-12);
        assert!((tm.target.z - exec_params().geometry.touchdown_height_m).abs() < 1e-12);

        let near = snapshot([0.05, 0.0, 0.25, 0.0], ugv);
        assert_eq!(mgr.step(t + 0.02, &near, &mut fcs).state, MissionState::Shutdown);
        assert!(mgr.state().is_kill());
        assert_eq!(
            mgr.step(t + 0.04, &near, &mut fcs).state,
            MissionState::MissionComplete
        );
        assert_eq!(
            mgr.step(t + 10.0, &near, &mut fcs).state,
            MissionState::MissionComplete
        );
    }

    #[test]
    fn test_block_pattern_never_hands_over() {
        let mut mgr = MissionMgr::new(mission_params(), &exec_params(), 4).unwrap();
        mgr.set_gateway(gateway(true));
        let mut fcs = MockFcs::default();
        let ugv = [0.0; 4];

        mgr.step(0.0, &snapshot([0.0; 4], ugv), &mut fcs);
        let hover = mgr.takeoff_target();
        mgr.step(1.0, &snapshot([hover.x, hover.y, hover.z, 0.0], ugv), &mut fcs);
        mgr.step(3.0, &snapshot([hover.x, hover.y, hover.z, 0.0], ugv), &mut fcs);
        assert_eq!(mgr.state(), MissionState::Follow);

        for i in 0..500 {
            let tm = mgr.step(3.0 + i as f64 * 0.02, &snapshot(standoff_uav(), ugv), &mut fcs);
            assert_eq!(tm.state, MissionState::Follow);
        }
    }

    #[test]
    fn test_guard_does_not_change_state() {
        let mut mgr = MissionMgr::new(mission_params(), &exec_params(), 4).unwrap();
        let loc = snapshot([0.0; 4], [0.0; 4]);

        assert!(mgr.guard(0.0, &loc));
        assert!(mgr.guard(0.0, &loc));
        assert_eq!(mgr.state(), MissionState::Idle);

        // Only the driver moves the state on
        mgr.step(0.0, &loc, &mut MockFcs::default());
        assert_eq!(mgr.state(), MissionState::Armed);
        assert_eq!(mgr.entry_logged, Some(MissionState::Armed));
    }

    #[test]
    fn test_state_order() {
        let mut state = MissionState::Idle;
        let mut names = vec![state.to_string()];

        while let Some(next) = state.next() {
            state = next;
            names.push(state.to_string());
        }

        assert_eq!(
            names,
            vec![
                "IDLE",
                "ARMED",
                "TOOKOFF",
                "FOLLOW",
                "RENDEZVOUS",
                "LAND",
                "SHUTDOWN",
                "MISSION_COMPLETE"
            ]
        );
        assert_eq!(
            serde_json::to_string(&MissionState::MissionComplete).unwrap(),
            "\"MISSION_COMPLETE\""
        );
    }

    #[test]
    fn test_invalid_params() {
        let mut params = mission_params();
        params.request_interval_s = 0.0;

        assert!(matches!(
            MissionMgr::new(params, &exec_params(), 4),
            Err(MissionError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_invalid_pattern_and_cycle_params() {
        let rejected = |params: MissionParams, exec: LandExecParams| {
            matches!(
                MissionMgr::new(params, &exec, 4),
                Err(MissionError::InvalidParams(_))
            )
        };

        let mut params = mission_params();
        params.follow.block_pattern.step_velocity_ms = 0.0;
        assert!(rejected(params, exec_params()));

        let mut params = mission_params();
        params.follow.block_pattern.num_loops = 0;
        assert!(rejected(params, exec_params()));

        let mut exec = exec_params();
        exec.cycle_frequency_hz = 0.0;
        assert!(rejected(mission_params(), exec));

        let mut exec = exec_params();
        exec.geometry.landing_velocity_ms = 0.0;
        assert!(rejected(mission_params(), exec));

        assert!(MissionMgr::new(mission_params(), &exec_params(), 4).is_ok());
    }
}
