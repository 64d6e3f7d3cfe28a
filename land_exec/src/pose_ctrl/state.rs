//! Implementations for the PoseCtrl state structure

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

// External
use comms_if::eqpt::fcs::VelocityCmd;
use log::{debug, trace};
use serde::Serialize;

// Internal
use super::{PidController, PoseCtrlError, PoseCtrlParams};
use crate::loc::Pose4;
use util::{
    maths::{clamp, wrap_pi},
    module::State,
    session::Session,
};

// ------------------------------------------------------------------------------------------------
// CONSTANTS
// ------------------------------------------------------------------------------------------------

/// Number of controlled axes (x, y, z, yaw)
const NUM_AXES: usize = 4;

/// Index of the yaw axis
const YAW: usize = 3;

// ------------------------------------------------------------------------------------------------
// DATA STRUCTURES
// ------------------------------------------------------------------------------------------------

/// Pose control module state
#[derive(Default)]
pub struct PoseCtrl {
    v_max_ms: f64,

    stale_threshold_s: f64,

    axes: Vec<PidController>,

    /// Time of the last update, `None` until the first cycle
    last_update_s: Option<f64>,
}

pub struct InitData {
    pub params: PoseCtrlParams,

    /// Bound on each translational velocity output.
    ///
    /// Units: meters/second
    pub v_max_ms: f64,
}

/// Input data to pose control.
#[derive(Debug, Clone, Copy)]
pub struct InputData {
    /// Monotonic time of this cycle.
    ///
    /// Units: seconds
    pub time_s: f64,

    pub current: Pose4,

    pub target: Pose4,
}

/// Status report for pose control processing.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct StatusReport {
    /// True if the cycle was stale and a zero command was output
    pub stale_tick: bool,

    /// True for each translational axis whose output was clamped to `v_max`
    pub saturated: [bool; 3],

    /// True for each axis whose integral was clamped
    pub integral_clamped: [bool; NUM_AXES],

    /// Errors in (x, y, z, yaw) order, yaw wrapped into (-pi, pi]
    pub error: [f64; NUM_AXES],
}

// ------------------------------------------------------------------------------------------------
// IMPLEMENTATIONS
// ------------------------------------------------------------------------------------------------

impl State for PoseCtrl {
    type InitData = InitData;
    type InitError = PoseCtrlError;

    type InputData = InputData;
    type OutputData = VelocityCmd;
    type StatusReport = StatusReport;
    type ProcError = PoseCtrlError;

    fn init(
        &mut self,
        init_data: Self::InitData,
        _session: Option<&Session>,
    ) -> Result<(), Self::InitError> {
        let params = init_data.params;

        if !(init_data.v_max_ms > 0.0) {
            return Err(PoseCtrlError::InvalidParams("v_max_ms must be positive"));
        }
        if !(params.stale_threshold_s > 0.0) {
            return Err(PoseCtrlError::InvalidParams("stale_threshold_s must be positive"));
        }
        if !(params.integral_limit >= 0.0) {
            return Err(PoseCtrlError::InvalidParams("integral_limit must not be negative"));
        }

        let k_p = params.k_p.to_array();
        let k_i = params.k_i.to_array();
        let k_d = params.k_d.to_array();

        if k_p.iter().chain(k_i.iter()).chain(k_d.iter()).any(|k| !k.is_finite()) {
            return Err(PoseCtrlError::InvalidParams("gains must be finite"));
        }

        self.axes = (0..NUM_AXES)
            .map(|i| PidController::new(k_p[i], k_i[i], k_d[i], params.integral_limit))
            .collect();
        self.v_max_ms = init_data.v_max_ms;
        self.stale_threshold_s = params.stale_threshold_s;
        self.last_update_s = None;

        debug!("PoseCtrl initialised, k_p {:?}, k_i {:?}, k_d {:?}", k_p, k_i, k_d);

        Ok(())
    }

    fn proc(
        &mut self,
        input_data: &Self::InputData,
    ) -> Result<(Self::OutputData, Self::StatusReport), Self::ProcError> {
        let mut report = StatusReport::default();

        if !input_data.current.is_finite()
            || !input_data.target.is_finite()
            || !input_data.time_s.is_finite()
        {
            return Err(PoseCtrlError::NonFiniteInput);
        }

        // Stale, first or time-reversed cycle, reset the update time only
        let dt_s = match self.last_update_s.map(|t| input_data.time_s - t) {
            Some(dt) if (0.0..=self.stale_threshold_s).contains(&dt) => dt,
            _ => {
                if self.last_update_s.is_some() {
                    debug!("PoseCtrl stale tick at {:.3} s", input_data.time_s);
                }
                self.last_update_s = Some(input_data.time_s);
                report.stale_tick = true;
                return Ok((VelocityCmd::zero(), report));
            }
        };

        let target = &input_data.target;
        let current = &input_data.current;

        report.error = [
            target.x - current.x,
            target.y - current.y,
            target.z - current.z,
            wrap_pi(target.yaw - current.yaw),
        ];

        let mut out = [0f64; NUM_AXES];
        for (i, pid) in self.axes.iter_mut().enumerate() {
            let (o, clamped) = pid.get(report.error[i], dt_s);
            out[i] = o;
            report.integral_clamped[i] = clamped;
        }

        // Only the translational axes are limited
        for i in 0..YAW {
            let limited = clamp(&out[i], &-self.v_max_ms, &self.v_max_ms);
            report.saturated[i] = limited != out[i];
            out[i] = limited;
        }

        self.last_update_s = Some(input_data.time_s);

        let cmd = VelocityCmd {
            linear_ms: [out[0], out[1], out[2]],
            yaw_rate_rads: out[YAW],
        };

        trace!("PoseCtrl output: {:?}", cmd);

        Ok((cmd, report))
    }
}

#[cfg(test)]
impl PoseCtrl {
    /// Integral accumulators in (x, y, z, yaw) order.
    pub fn integrals(&self) -> Vec<f64> {
        self.axes.iter().map(|a| a.integral()).collect()
    }
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
