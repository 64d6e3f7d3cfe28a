//! # Software-in-the-loop simulation
//!
//! Provides simulated equipment so the executive can be run without any hardware:
//!
//! - [`SimVehicle`] - the aircraft and its flight control stack, driven through [`SimFcs`].
//! - [`SimPlatform`] - the ground vehicle, with a constant velocity forward prediction.
//! - [`SimOptimiser`] - a minimum jerk trajectory optimiser.
//! - A box shaped safe flight corridor around the final approach.
//!
//! The world is advanced and published into the [`LocMgr`] by a background thread at its own
//! rate, in the same way data arrives asynchronously from the real equipment. Tests drive the
//! world directly through [`SimWorld::step`] and [`SimWorld::publish`] instead.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

mod optimiser;
mod platform;
mod vehicle;

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, PoisonError,
    },
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use comms_if::eqpt::{
    fcs::{FcsCmd, FlightMode},
    loc::{Corridor, TangentPlane},
};
use log::{error, trace, warn};
use nalgebra::Isometry3;
use serde::Deserialize;

use crate::{
    fcs::{FcsError, FlightCtrl},
    loc::{iso_from_msg, msg_from_iso, LocError, LocMgr},
    mission::MissionTm,
};

// ------------------------------------------------------------------------------------------------
// EXPORTS
// ------------------------------------------------------------------------------------------------

pub use self::{optimiser::SimOptimiser, platform::SimPlatform, vehicle::SimVehicle};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Simulation parameters, loaded from `sim.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct SimParams {
    /// Rate at which the background thread advances and publishes the world.
    ///
    /// Units: Hertz
    pub rate_hz: f64,

    pub uav_start_m: [f64; 3],

    pub uav_start_yaw_rad: f64,

    pub ugv_start_m: [f64; 3],

    pub ugv_start_yaw_rad: f64,

    /// Units: meters/second
    pub ugv_speed_ms: f64,

    /// Units: radians/second
    pub ugv_yaw_rate_rads: f64,

    /// How far ahead the platform pose is predicted.
    ///
    /// Units: seconds
    pub prediction_horizon_s: f64,

    /// Units: meters/second
    pub fall_speed_ms: f64,

    /// Horizontal radius of the platform's deck.
    ///
    /// Units: meters
    pub deck_radius_m: f64,

    /// Height of the deck above the platform origin.
    ///
    /// Units: meters
    pub deck_height_m: f64,

    pub corridor: CorridorParams,
}

/// Bounds of the final approach corridor, in the platform frame.
#[derive(Debug, Clone, Deserialize)]
pub struct CorridorParams {
    /// Extent of the corridor behind the platform origin
    pub final_corridor_length_m: f64,

    /// Extent of the corridor in front of the platform origin
    pub final_corridor_front_m: f64,

    pub final_corridor_half_width_m: f64,

    /// Height of the corridor ceiling above the platform origin
    pub final_corridor_height_m: f64,
}

/// Shared simulated world.
#[derive(Clone)]
pub struct SimWorld {
    world: Arc<Mutex<World>>,

    bg_run: Arc<AtomicBool>,
}

/// Flight control stack handle onto the simulated aircraft.
pub struct SimFcs {
    world: Arc<Mutex<World>>,
}

/// Snapshot of the world state.
#[derive(Debug, Clone, Copy)]
pub struct SimStatus {
    pub time_s: f64,

    pub uav_tf: Isometry3<f64>,

    pub ugv_tf: Isometry3<f64>,

    pub on_deck: bool,

    /// The last mission report received
    pub last_tm: Option<MissionTm>,
}

struct World {
    time_s: f64,

    vehicle: SimVehicle,

    platform: SimPlatform,

    corridors: Vec<Corridor>,

    prediction_horizon_s: f64,

    last_tm: Option<MissionTm>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum SimError {
    #[error("The sim world lock was poisoned")]
    PoisonError,

    #[error("Could not publish to the LocMgr: {0}")]
    LocError(LocError),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl SimWorld {
    pub fn new(params: &SimParams) -> Self {
        Self {
            world: Arc::new(Mutex::new(World {
                time_s: 0.0,
                vehicle: SimVehicle::new(params),
                platform: SimPlatform::new(params),
                corridors: landing_corridors(&params.corridor),
                prediction_horizon_s: params.prediction_horizon_s,
                last_tm: None,
            })),
            bg_run: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Get a flight control stack handle onto the simulated aircraft.
    pub fn fcs(&self) -> SimFcs {
        SimFcs {
            world: self.world.clone(),
        }
    }

    /// Advance the world by `dt_s`.
    pub fn step(&self, dt_s: f64) -> Result<(), SimError> {
        let mut world = self.world.lock()?;

        world.platform.step(dt_s);
        let platform_tf = world.platform.tf();
        world.vehicle.step(dt_s, &platform_tf);
        world.time_s += dt_s;

        Ok(())
    }

    /// Publish the current state of the world into the localisation manager.
    pub fn publish(&self, loc_mgr: &LocMgr) -> Result<(), SimError> {
        let (fcs_state, uav_msg, ugv_msg, ugv_pred_msg, corridors) = {
            let world = self.world.lock()?;
            (
                world.vehicle.fcs_state(),
                msg_from_iso(&world.vehicle.tf()),
                msg_from_iso(&world.platform.tf()),
                msg_from_iso(&world.platform.predicted_tf(world.prediction_horizon_s)),
                world.corridors.clone(),
            )
        };

        loc_mgr.on_fcs_state(fcs_state)?;
        loc_mgr.on_uav_pose(iso_from_msg(&uav_msg))?;
        loc_mgr.on_ugv_pose(iso_from_msg(&ugv_msg))?;
        loc_mgr.on_ugv_pred_pose(iso_from_msg(&ugv_pred_msg))?;
        loc_mgr.on_corridors(corridors)?;

        Ok(())
    }

    pub fn status(&self) -> Result<SimStatus, SimError> {
        let world = self.world.lock()?;

        Ok(SimStatus {
            time_s: world.time_s,
            uav_tf: world.vehicle.tf(),
            ugv_tf: world.platform.tf(),
            on_deck: world.vehicle.is_on_deck(),
            last_tm: world.last_tm,
        })
    }

    /// Start the background thread which advances and publishes the world at `rate_hz`.
    pub fn start(&self, loc_mgr: LocMgr, rate_hz: f64) -> JoinHandle<Result<(), SimError>> {
        self.bg_run.store(true, Ordering::Relaxed);

        let sim = self.clone();
        thread::spawn(move || {
            let res = sim.bg_thread(loc_mgr, rate_hz);
            if let Err(ref e) = res {
                error!("Sim thread stopped: {}", e);
            }
            res
        })
    }

    /// Request the background thread stops.
    pub fn stop(&self) {
        self.bg_run.store(false, Ordering::Relaxed);
    }

    fn bg_thread(&self, loc_mgr: LocMgr, rate_hz: f64) -> Result<(), SimError> {
        let period = Duration::from_secs_f64(1.0 / rate_hz);
        let mut last = Instant::now();

        while self.bg_run.load(Ordering::Relaxed) {
            let cycle_start = Instant::now();

            self.step((cycle_start - last).as_secs_f64())?;
            last = cycle_start;
            self.publish(&loc_mgr)?;

            if let Some(d) = period.checked_sub(cycle_start.elapsed()) {
                thread::sleep(d);
            }
        }

        Ok(())
    }
}

impl FlightCtrl for SimFcs {
    fn set_mode(&mut self, mode: FlightMode) -> Result<bool, FcsError> {
        let mut world = self
            .world
            .lock()
            .map_err(|_| FcsError::ServiceFailed("set_mode", "sim lock poisoned".into()))?;

        if !world.vehicle.fcs_state().connected {
            return Err(FcsError::NotConnected);
        }

        Ok(world.vehicle.set_mode(mode))
    }

    fn arm(&mut self) -> Result<bool, FcsError> {
        let mut world = self
            .world
            .lock()
            .map_err(|_| FcsError::ServiceFailed("arm", "sim lock poisoned".into()))?;

        Ok(world.vehicle.arm())
    }

    fn send_cmd(&mut self, cmd: &FcsCmd) -> Result<(), FcsError> {
        let mut world = self
            .world
            .lock()
            .map_err(|_| FcsError::PublishFailed("sim lock poisoned".into()))?;

        trace!("Sim FCS cmd: {:?}", cmd);
        world.vehicle.set_cmd(*cmd);

        Ok(())
    }

    fn send_mission_tm(&mut self, tm: &MissionTm) -> Result<(), FcsError> {
        let mut world = self
            .world
            .lock()
            .map_err(|_| FcsError::PublishFailed("sim lock poisoned".into()))?;

        world.last_tm = Some(*tm);

        Ok(())
    }
}

impl<G> From<PoisonError<G>> for SimError {
    fn from(_: PoisonError<G>) -> Self {
        Self::PoisonError
    }
}

impl From<LocError> for SimError {
    fn from(e: LocError) -> Self {
        Self::LocError(e)
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Single box corridor around the final approach, in the platform frame.
pub fn landing_corridors(params: &CorridorParams) -> Vec<Corridor> {
    if params.final_corridor_length_m <= 0.0 || params.final_corridor_height_m <= 0.0 {
        warn!("Empty landing corridor");
        return vec![];
    }

    let bounds = [
        ([params.final_corridor_front_m, 0.0, 0.0], [1.0, 0.0, 0.0]),
        ([-params.final_corridor_length_m, 0.0, 0.0], [-1.0, 0.0, 0.0]),
        ([0.0, params.final_corridor_half_width_m, 0.0], [0.0, 1.0, 0.0]),
        ([0.0, -params.final_corridor_half_width_m, 0.0], [0.0, -1.0, 0.0]),
        ([0.0, 0.0, params.final_corridor_height_m], [0.0, 0.0, 1.0]),
        ([0.0, 0.0, 0.0], [0.0, 0.0, -1.0]),
    ];

    vec![Corridor {
        planes: bounds
            .iter()
            .map(|(point_m, normal)| TangentPlane {
                point_m: *point_m,
                normal: *normal,
            })
            .collect(),
    }]
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
