//! # Mission transition guards
//!
//! Guards only read their inputs. Side effects of a successful guard are applied by
//! [`MissionMgr`](super::MissionMgr) after it has evaluated them.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::fcs::{FcsState, FlightMode};

use super::MissionParams;
use crate::loc::Pose4;

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

/// Request IDLE should make to the flight control stack this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdleAction {
    None,
    SetMode,
    Arm,
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// True once the FCS reports offboard mode and armed motors.
pub fn idle_ready(fcs_state: &FcsState) -> bool {
    fcs_state.mode == FlightMode::Offboard && fcs_state.armed
}

/// Choose the request to make while idle.
///
/// Requests share a single retry timer, the first is made as soon as possible. Offboard mode is
/// requested until the FCS reports it, after which arming is requested.
pub fn idle_action(
    fcs_state: &FcsState,
    time_s: f64,
    last_request_s: Option<f64>,
    request_interval_s: f64,
) -> IdleAction {
    if idle_ready(fcs_state) {
        return IdleAction::None;
    }

    if let Some(t) = last_request_s {
        if time_s - t < request_interval_s {
            return IdleAction::None;
        }
    }

    if fcs_state.mode != FlightMode::Offboard {
        IdleAction::SetMode
    } else {
        IdleAction::Arm
    }
}

/// True when the aircraft is within tolerance of the takeoff hover point.
pub fn takeoff_reached(uav_pose: &Pose4, takeoff_target: &Pose4, tolerance_m: f64) -> bool {
    uav_pose.distance_m(takeoff_target) < tolerance_m
}

/// True once at least `hold_s` has elapsed since `entry_s`.
pub fn timer_elapsed(time_s: f64, entry_s: f64, hold_s: f64) -> bool {
    time_s - entry_s >= hold_s
}

/// Landing completion.
///
/// While the trajectory is still being played the landing is only cut short if the horizontal
/// distance to the platform is no greater than `land_cut_threshold_m`. Once the trajectory is
/// exhausted the landing completes when the distance is no greater than `land_done_threshold_m`.
pub fn land_complete(traj_in_bounds: bool, rel_horizontal_m: f64, params: &MissionParams) -> bool {
    if traj_in_bounds {
        !(rel_horizontal_m > params.land_cut_threshold_m)
    } else {
        !(rel_horizontal_m > params.land_done_threshold_m)
    }
}

/// True when the aircraft has settled over the platform after the motors were cut.
pub fn shutdown_complete(rel_horizontal_m: f64, params: &MissionParams) -> bool {
    rel_horizontal_m < params.shutdown_threshold_m
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::mission::test::mission_params;

    fn fcs(mode: FlightMode, armed: bool) -> FcsState {
        FcsState {
            connected: true,
            armed,
            mode,
        }
    }

    #[test]
    fn test_idle_action() {
        let manual = fcs(FlightMode::Manual, false);
        let offboard = fcs(FlightMode::Offboard, false);
        let ready = fcs(FlightMode::Offboard, true);

        // First request is immediate
        assert_eq!(idle_action(&manual, 0.0, None, 2.0), IdleAction::SetMode);
        assert_eq!(idle_action(&offboard, 0.0, None, 2.0), IdleAction::Arm);

        // Retries are limited by the interval, regardless of outcome
        assert_eq!(idle_action(&manual, 1.9, Some(0.0), 2.0), IdleAction::None);
        assert_eq!(idle_action(&manual, 2.0, Some(0.0), 2.0), IdleAction::SetMode);
        assert_eq!(idle_action(&offboard, 3.0, Some(2.0), 2.0), IdleAction::None);
        assert_eq!(idle_action(&offboard, 4.5, Some(2.0), 2.0), IdleAction::Arm);

        assert_eq!(idle_action(&ready, 10.0, None, 2.0), IdleAction::None);
        assert!(idle_ready(&ready));
        assert!(!idle_ready(&offboard));

        // Armed but in the wrong mode is not ready
        assert!(!idle_ready(&fcs(FlightMode::Posctl, true)));
    }

    #[test]
    fn test_takeoff_reached() {
        let target = Pose4::new(0.0, 0.0, 1.5, 0.0);

        assert!(takeoff_reached(&Pose4::new(0.0, 0.1, 1.5, 2.0), &target, 0.15));
        assert!(!takeoff_reached(&Pose4::new(0.0, 0.0, 1.3, 0.0), &target, 0.15));
    }

    #[test]
    fn test_timer_elapsed() {
        assert!(!timer_elapsed(13.999, 10.0, 4.0));
        assert!(timer_elapsed(14.0, 10.0, 4.0));
    }

    #[test]
    fn test_land_complete() {
        let params = mission_params();

        // Exhausted trajectory completes within the done threshold
        assert!(land_complete(false, 0.1, &params));
        assert!(!land_complete(false, 0.2, &params));

        // The default cut threshold of zero means any horizontal offset keeps the trajectory
        // playing, only an exact alignment cuts it short
        assert_eq!(params.land_cut_threshold_m, 0.0);
        assert!(!land_complete(true, 1e-9, &params));
        assert!(!land_complete(true, 0.1, &params));
        assert!(land_complete(true, 0.0, &params));

        // Raising the cut threshold allows an early completion
        let mut relaxed = mission_params();
        relaxed.land_cut_threshold_m = 0.05;
        assert!(land_complete(true, 0.04, &relaxed));
        assert!(!land_complete(true, 0.06, &relaxed));
    }

    #[test]
    fn test_shutdown_complete() {
        let params = mission_params();

        assert!(shutdown_complete(0.05, &params));
        assert!(!shutdown_complete(0.1, &params));
    }
}
