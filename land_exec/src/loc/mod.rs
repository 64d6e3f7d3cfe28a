//! # Localisation module
//!
//! The localisation manager aggregates the asynchronous state and pose feeds of the aircraft (UAV)
//! and the landing platform (UGV). Each message handler performs a complete overwrite of its
//! stored transform under a single lock, so the control cycle always reads a consistent
//! [`LocSnapshot`].
//!
//! The aircraft position expressed in the platform body frame (the relative position) is
//! recomputed whenever either pose is updated, once both have been observed.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use std::sync::{
    mpsc::{channel, Receiver, Sender},
    Arc, Mutex, PoisonError, RwLock,
};

use comms_if::eqpt::{
    fcs::FcsState,
    loc::{Corridor, PoseMsg},
};
use log::{debug, info};
use nalgebra::{Isometry3, Quaternion, Translation3, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use util::maths::heading_from_quaternion;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// Planar-yaw reduction of a rigid transform.
///
/// Only the heading of the full attitude is kept.
#[derive(Debug, Copy, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Pose4 {
    pub x: f64,
    pub y: f64,
    pub z: f64,

    /// Heading about the world Z axis.
    ///
    /// Units: radians
    pub yaw: f64,
}

/// A complete, consistent view of the localisation data at one instant.
#[derive(Debug, Clone)]
pub struct LocSnapshot {
    pub fcs_state: FcsState,

    pub uav_tf: Isometry3<f64>,
    pub uav_pose: Pose4,

    pub ugv_tf: Isometry3<f64>,
    pub ugv_pose: Pose4,

    /// Forward-predicted platform transform. Equal to `ugv_tf` if no prediction has been received.
    pub ugv_pred_tf: Isometry3<f64>,

    /// Aircraft position in the platform body frame.
    ///
    /// Units: meters
    pub rel_position_m: Vector3<f64>,
}

/// Localisation manager.
///
/// Cheap to clone, all clones share the same underlying data. Handlers may be called from any
/// thread.
#[derive(Clone)]
pub struct LocMgr {
    data: Arc<RwLock<LocData>>,

    /// One-shot sender for the first corridor set, taken on first use.
    corridor_sender: Arc<Mutex<Option<Sender<Vec<Corridor>>>>>,
}

#[derive(Debug, Default)]
struct LocData {
    fcs_state: Option<FcsState>,
    uav: Option<(Isometry3<f64>, Pose4)>,
    ugv: Option<(Isometry3<f64>, Pose4)>,
    ugv_pred: Option<Isometry3<f64>>,
    rel_position_m: Option<Vector3<f64>>,
    corridors: Option<Vec<Corridor>>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LocError {
    #[error("A localisation lock was poisoned")]
    PoisonError,

    #[error("Received a pose containing non-finite values")]
    NonFinitePose,
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl Pose4 {
    pub fn new(x: f64, y: f64, z: f64, yaw: f64) -> Self {
        Self { x, y, z, yaw }
    }

    /// Build from a position and heading.
    pub fn from_position(position_m: &Vector3<f64>, yaw: f64) -> Self {
        Self::new(position_m[0], position_m[1], position_m[2], yaw)
    }

    /// Reduce a full transform to position and heading.
    pub fn from_iso(tf: &Isometry3<f64>) -> Self {
        Self::from_position(
            &tf.translation.vector,
            heading_from_quaternion(&tf.rotation),
        )
    }

    pub fn position_m(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Euclidean distance between the positions of two poses.
    pub fn distance_m(&self, other: &Pose4) -> f64 {
        (self.position_m() - other.position_m()).norm()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.yaw.is_finite()
    }
}

impl LocSnapshot {
    /// Norm of the horizontal component of the relative position.
    pub fn rel_horizontal_m(&self) -> f64 {
        self.rel_position_m.xy().norm()
    }
}

impl LocMgr {
    /// Create a new manager, returning the receiver that will be given the first corridor set.
    pub fn new() -> (Self, Receiver<Vec<Corridor>>) {
        let (tx, rx) = channel();

        (
            Self {
                data: Arc::new(RwLock::new(LocData::default())),
                corridor_sender: Arc::new(Mutex::new(Some(tx))),
            },
            rx,
        )
    }

    pub fn on_fcs_state(&self, state: FcsState) -> Result<(), LocError> {
        let mut data = self.data.write()?;

        if data.fcs_state.map(|s| s.mode) != Some(state.mode) {
            info!("FCS mode: {}", state.mode);
        }

        data.fcs_state = Some(state);

        Ok(())
    }

    pub fn on_uav_pose(&self, tf: Isometry3<f64>) -> Result<(), LocError> {
        let entry = Self::checked_entry(tf)?;

        let mut data = self.data.write()?;
        data.uav = Some(entry);
        data.update_rel_position();

        Ok(())
    }

    pub fn on_ugv_pose(&self, tf: Isometry3<f64>) -> Result<(), LocError> {
        let entry = Self::checked_entry(tf)?;

        let mut data = self.data.write()?;
        data.ugv = Some(entry);
        data.update_rel_position();

        Ok(())
    }

    pub fn on_ugv_pred_pose(&self, tf: Isometry3<f64>) -> Result<(), LocError> {
        let (tf, _) = Self::checked_entry(tf)?;

        self.data.write()?.ugv_pred = Some(tf);

        Ok(())
    }

    /// Store the latest corridors. The first set received is also forwarded to the trajectory
    /// setup task.
    pub fn on_corridors(&self, corridors: Vec<Corridor>) -> Result<(), LocError> {
        if let Some(sender) = self.corridor_sender.lock()?.take() {
            info!("First corridor set received ({} corridors)", corridors.len());

            // The setup task may already have exited, in which case nobody needs the corridors
            if sender.send(corridors.clone()).is_err() {
                debug!("Corridor receiver dropped");
            }
        }

        self.data.write()?.corridors = Some(corridors);

        Ok(())
    }

    /// Get the current snapshot, or `None` if the FCS state, aircraft pose and platform pose have
    /// not all been received yet.
    pub fn snapshot(&self) -> Result<Option<LocSnapshot>, LocError> {
        let data = self.data.read()?;

        let (fcs_state, (uav_tf, uav_pose), (ugv_tf, ugv_pose), rel_position_m) =
            match (data.fcs_state, data.uav, data.ugv, data.rel_position_m) {
                (Some(f), Some(u), Some(g), Some(r)) => (f, u, g, r),
                _ => return Ok(None),
            };

        let ugv_pred_tf = data.ugv_pred.unwrap_or(ugv_tf);

        Ok(Some(LocSnapshot {
            fcs_state,
            uav_tf,
            uav_pose,
            ugv_tf,
            ugv_pose,
            ugv_pred_tf,
            rel_position_m,
        }))
    }

    /// Number of corridors in the most recent set.
    pub fn num_corridors(&self) -> Result<Option<usize>, LocError> {
        Ok(self.data.read()?.corridors.as_ref().map(|c| c.len()))
    }

    fn checked_entry(tf: Isometry3<f64>) -> Result<(Isometry3<f64>, Pose4), LocError> {
        let pose = Pose4::from_iso(&tf);

        if pose.is_finite() {
            Ok((tf, pose))
        } else {
            Err(LocError::NonFinitePose)
        }
    }
}

impl LocData {
    fn update_rel_position(&mut self) {
        if let (Some((uav_tf, _)), Some((ugv_tf, _))) = (&self.uav, &self.ugv) {
            self.rel_position_m = Some(rel_position(uav_tf, ugv_tf));
        }
    }
}

impl<G> From<PoisonError<G>> for LocError {
    fn from(_: PoisonError<G>) -> Self {
        Self::PoisonError
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Position of the aircraft in the platform body frame,
/// `R_ugv^-1 * (t_uav - t_ugv)`.
pub fn rel_position(uav_tf: &Isometry3<f64>, ugv_tf: &Isometry3<f64>) -> Vector3<f64> {
    ugv_tf
        .rotation
        .inverse_transform_vector(&(uav_tf.translation.vector - ugv_tf.translation.vector))
}

/// Convert a pose message into a rigid transform. The attitude quaternion is normalised.
pub fn iso_from_msg(msg: &PoseMsg) -> Isometry3<f64> {
    let [w, x, y, z] = msg.attitude_q;

    Isometry3::from_parts(
        Translation3::new(msg.position_m[0], msg.position_m[1], msg.position_m[2]),
        UnitQuaternion::from_quaternion(Quaternion::new(w, x, y, z)),
    )
}

/// Convert a rigid transform into a pose message stamped now.
pub fn msg_from_iso(tf: &Isometry3<f64>) -> PoseMsg {
    let q = tf.rotation.quaternion();
    let t = tf.translation.vector;

    PoseMsg::new([t[0], t[1], t[2]], [q.w, q.i, q.j, q.k])
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------
