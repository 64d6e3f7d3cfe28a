//! # Simulated aircraft
//!
//! Kinematic model of the aircraft and its flight control stack. In offboard mode and armed the
//! aircraft follows velocity commands exactly. A kill command cuts the motors, after which the
//! aircraft drops vertically onto whatever is below it and stays there.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use comms_if::eqpt::fcs::{FcsCmd, FcsState, FlightMode};
use log::{debug, info};
use nalgebra::{Isometry3, Point3, Vector3};

use super::SimParams;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct SimVehicle {
    position_m: Vector3<f64>,

    yaw_rad: f64,

    fcs_state: FcsState,

    /// Last command received
    cmd: Option<FcsCmd>,

    /// Speed of the fall once the motors are cut.
    ///
    /// Units: meters/second
    fall_speed_ms: f64,

    /// Horizontal radius of the platform's deck
    deck_radius_m: f64,

    /// Height of the deck above the platform origin
    deck_height_m: f64,

    /// Position in the platform frame once landed on the deck
    deck_offset_m: Option<Vector3<f64>>,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimVehicle {
    pub fn new(params: &SimParams) -> Self {
        Self {
            position_m: Vector3::from(params.uav_start_m),
            yaw_rad: params.uav_start_yaw_rad,
            fcs_state: FcsState {
                connected: true,
                armed: false,
                mode: FlightMode::Manual,
            },
            cmd: None,
            fall_speed_ms: params.fall_speed_ms,
            deck_radius_m: params.deck_radius_m,
            deck_height_m: params.deck_height_m,
            deck_offset_m: None,
        }
    }

    pub fn fcs_state(&self) -> FcsState {
        self.fcs_state
    }

    pub fn tf(&self) -> Isometry3<f64> {
        Isometry3::new(self.position_m, Vector3::z() * self.yaw_rad)
    }

    pub fn is_on_deck(&self) -> bool {
        self.deck_offset_m.is_some()
    }

    /// Mode change service. Always accepted while connected.
    pub fn set_mode(&mut self, mode: FlightMode) -> bool {
        if !self.fcs_state.connected {
            return false;
        }

        if self.fcs_state.mode != mode {
            info!("Sim FCS mode {} -> {}", self.fcs_state.mode, mode);
        }
        self.fcs_state.mode = mode;

        true
    }

    /// Arming service. Only accepted in offboard mode.
    pub fn arm(&mut self) -> bool {
        if self.fcs_state.mode != FlightMode::Offboard {
            debug!("Sim FCS arm rejected in {} mode", self.fcs_state.mode);
            return false;
        }

        self.fcs_state.armed = true;
        true
    }

    pub fn set_cmd(&mut self, cmd: FcsCmd) {
        if matches!(cmd, FcsCmd::Kill(_)) && !matches!(self.cmd, Some(FcsCmd::Kill(_))) {
            info!("Sim FCS motors cut");
        }
        self.cmd = Some(cmd);
    }

    /// Advance the aircraft by `dt_s` with the platform at `platform_tf`.
    pub fn step(&mut self, dt_s: f64, platform_tf: &Isometry3<f64>) {
        // Riding the platform
        if let Some(offset_m) = self.deck_offset_m {
            self.position_m = (platform_tf * Point3::from(offset_m)).coords;
            return;
        }

        match self.cmd {
            Some(FcsCmd::Velocity(v))
                if self.fcs_state.armed && self.fcs_state.mode == FlightMode::Offboard =>
            {
                self.position_m += Vector3::from(v.linear_ms) * dt_s;
                self.yaw_rad += v.yaw_rate_rads * dt_s;
            }
            Some(FcsCmd::Kill(_)) => {
                self.fcs_state.armed = false;
                self.fall(dt_s, platform_tf);
            }
            _ => (),
        }

        // Ground
        if self.position_m.z < 0.0 {
            self.position_m.z = 0.0;
        }
    }

    fn fall(&mut self, dt_s: f64, platform_tf: &Isometry3<f64>) {
        let rel_m = platform_tf.inverse_transform_point(&Point3::from(self.position_m)).coords;

        self.position_m.z -= self.fall_speed_ms * dt_s;

        let over_deck = rel_m.xy().norm() <= self.deck_radius_m;
        let deck_z = (platform_tf * Point3::new(0.0, 0.0, self.deck_height_m)).z;

        if over_deck && self.position_m.z <= deck_z && rel_m.z >= self.deck_height_m {
            self.position_m.z = deck_z;
            let offset_m = Vector3::new(rel_m.x, rel_m.y, self.deck_height_m);
            info!("Sim aircraft on deck at {:?}", offset_m.as_slice());
            self.deck_offset_m = Some(offset_m);
        }
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::sim::test::sim_params;
    use comms_if::eqpt::fcs::{AttitudeTarget, VelocityCmd};

    fn vel(x: f64, y: f64, z: f64) -> FcsCmd {
        FcsCmd::Velocity(VelocityCmd {
            linear_ms: [x, y, z],
            yaw_rate_rads: 0.0,
        })
    }

    #[test]
    fn test_services() {
        let mut vehicle = SimVehicle::new(&sim_params());

        assert!(!vehicle.arm());
        assert!(vehicle.set_mode(FlightMode::Offboard));
        assert!(vehicle.arm());

        let state = vehicle.fcs_state();
        assert!(state.armed);
        assert_eq!(state.mode, FlightMode::Offboard);
    }

    #[test]
    fn test_velocity_only_when_armed() {
        let mut params = sim_params();
        params.uav_start_m = [0.0, 0.0, 0.0];
        let mut vehicle = SimVehicle::new(&params);
        let platform = Isometry3::translation(10.0, 0.0, 0.0);

        vehicle.set_cmd(vel(0.0, 0.0, 1.0));
        vehicle.step(1.0, &platform);
        assert_eq!(vehicle.tf().translation.vector, Vector3::zeros());

        vehicle.set_mode(FlightMode::Offboard);
        vehicle.arm();
        vehicle.step(1.0, &platform);
        assert!((vehicle.tf().translation.z - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kill_lands_on_deck() {
        let mut params = sim_params();
        params.uav_start_m = [0.0, 0.0, 0.0];
        params.deck_height_m = 0.3;
        params.deck_radius_m = 0.5;
        params.fall_speed_ms = 1.0;

        let mut vehicle = SimVehicle::new(&params);
        vehicle.set_mode(FlightMode::Offboard);
        vehicle.arm();

        // Climb to 1 m above a platform at the origin
        let mut platform = Isometry3::identity();
        vehicle.set_cmd(vel(0.1, 0.0, 1.0));
        vehicle.step(1.0, &platform);

        vehicle.set_cmd(FcsCmd::Kill(AttitudeTarget::kill()));
        for _ in 0..100 {
            vehicle.step(0.02, &platform);
        }

        assert!(vehicle.is_on_deck());
        assert!(!vehicle.fcs_state().armed);
        assert!((vehicle.tf().translation.z - 0.3).abs() < 1e-12);

        // Carried with the platform
        platform = Isometry3::translation(2.0, 0.0, 0.0);
        vehicle.step(0.02, &platform);
        let t = vehicle.tf().translation.vector;
        assert!((t - Vector3::new(2.1, 0.0, 0.3)).norm() < 1e-9);
    }

    #[test]
    fn test_kill_off_deck_falls_to_ground() {
        let mut params = sim_params();
        params.uav_start_m = [5.0, 0.0, 0.0];
        let mut vehicle = SimVehicle::new(&params);
        vehicle.set_mode(FlightMode::Offboard);
        vehicle.arm();

        let platform = Isometry3::identity();
        vehicle.set_cmd(vel(0.0, 0.0, 1.0));
        vehicle.step(1.0, &platform);

        vehicle.set_cmd(FcsCmd::Kill(AttitudeTarget::kill()));
        for _ in 0..200 {
            vehicle.step(0.02, &platform);
        }

        assert!(!vehicle.is_on_deck());
        assert_eq!(vehicle.tf().translation.z, 0.0);
    }
}
