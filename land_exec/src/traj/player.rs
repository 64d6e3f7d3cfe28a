//! # Trajectory player
//!
//! Steps through a sampled platform-frame trajectory, one sample per control cycle, producing
//! world-frame setpoints.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use nalgebra::{Isometry3, Point3, Vector3};

use super::SampledTraj;
use crate::loc::Pose4;

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Default)]
pub struct TrajPlayer {
    points_m: Vec<Vector3<f64>>,

    /// Index of the next sample to play, `None` if nothing has been loaded
    index: Option<usize>,
}

// ------------------------------------------------------------------------------------------------
// ENUMS
// ------------------------------------------------------------------------------------------------

#[derive(Debug, Copy, Clone, PartialEq)]
pub enum PlayStep {
    /// A new sample was played
    Active(Pose4),

    /// The trajectory is exhausted, the last sample is held
    Exhausted(Pose4),
}

// ------------------------------------------------------------------------------------------------
// IMPLS
// ------------------------------------------------------------------------------------------------

impl TrajPlayer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current trajectory, starting playback at `start_index`.
    pub fn load(&mut self, traj: SampledTraj, start_index: usize) {
        self.points_m = traj.points_m;
        self.index = Some(start_index);
    }

    /// Drop the current trajectory and return to the "not started" state.
    pub fn clear(&mut self) {
        self.points_m.clear();
        self.index = None;
    }

    /// True if a non-empty trajectory has been loaded.
    pub fn is_loaded(&self) -> bool {
        self.index.is_some() && !self.points_m.is_empty()
    }

    /// True if every sample of the loaded trajectory has been played.
    pub fn is_exhausted(&self) -> bool {
        match self.index {
            Some(i) => i >= self.points_m.len(),
            None => false,
        }
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Play the next sample.
    ///
    /// The sample is moved into the world frame with `ugv_tf`, and the heading is set to
    /// `ugv_yaw`. Once exhausted the last sample is returned on every call. Returns `None` if no
    /// trajectory is loaded.
    pub fn step(&mut self, ugv_tf: &Isometry3<f64>, ugv_yaw: f64) -> Option<PlayStep> {
        let index = self.index?;
        let last = self.points_m.len().checked_sub(1)?;

        if index <= last {
            self.index = Some(index + 1);
            Some(PlayStep::Active(to_world(
                &self.points_m[index],
                ugv_tf,
                ugv_yaw,
            )))
        } else {
            Some(PlayStep::Exhausted(to_world(
                &self.points_m[last],
                ugv_tf,
                ugv_yaw,
            )))
        }
    }
}

impl PlayStep {
    pub fn pose(&self) -> Pose4 {
        match self {
            PlayStep::Active(p) | PlayStep::Exhausted(p) => *p,
        }
    }
}

// ------------------------------------------------------------------------------------------------
// FUNCTIONS
// ------------------------------------------------------------------------------------------------

/// Move a platform-frame point into the world frame, `R * p + t`.
pub fn to_world(point_m: &Vector3<f64>, ugv_tf: &Isometry3<f64>, ugv_yaw: f64) -> Pose4 {
    let world = ugv_tf * Point3::from(*point_m);
    Pose4::from_position(&world.coords, ugv_yaw)
}

// ------------------------------------------------------------------------------------------------
// TESTS
// ------------------------------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn three_samples() -> SampledTraj {
        SampledTraj {
            sample_period_s: 0.02,
            points_m: vec![
                Vector3::new(-1.0, 0.0, 1.0),
                Vector3::new(-0.5, 0.0, 0.6),
                Vector3::new(0.0, 0.0, 0.2),
            ],
        }
    }

    #[test]
    fn test_three_sample_playback() {
        let mut player = TrajPlayer::new();
        player.load(three_samples(), 0);

        let tf = Isometry3::identity();

        for i in 0..3 {
            assert!(!player.is_exhausted());
            match player.step(&tf, 0.0) {
                Some(PlayStep::Active(p)) => {
                    assert_eq!(p.position_m(), three_samples().points_m[i])
                }
                s => panic!("Expected an active step, got {:?}", s),
            }
        }

        assert!(player.is_exhausted());

        let frozen = player.step(&tf, 0.0).unwrap();
        assert_eq!(frozen, PlayStep::Exhausted(Pose4::new(0.0, 0.0, 0.2, 0.0)));

        // Repeated calls after exhaustion return the same pose
        for _ in 0..5 {
            assert_eq!(player.step(&tf, 0.0).unwrap(), frozen);
        }
    }

    #[test]
    fn test_world_transform() {
        let mut player = TrajPlayer::new();
        player.load(three_samples(), 0);

        let tf = Isometry3::new(Vector3::new(10.0, 5.0, 0.5), Vector3::z() * FRAC_PI_2);

        let pose = player.step(&tf, 1.2).unwrap().pose();

        // (-1, 0, 1) rotated by 90 deg is (0, -1, 1)
        assert!((pose.x - 10.0).abs() < 1e-12);
        assert!((pose.y - 4.0).abs() < 1e-12);
        assert!((pose.z - 1.5).abs() < 1e-12);
        assert_eq!(pose.yaw, 1.2);
    }

    #[test]
    fn test_start_index() {
        let mut player = TrajPlayer::new();
        player.load(three_samples(), 2);

        assert_eq!(player.index(), Some(2));
        assert!(matches!(
            player.step(&Isometry3::identity(), 0.0),
            Some(PlayStep::Active(_))
        ));
        assert!(player.is_exhausted());

        // Starting beyond the end holds the last sample immediately
        player.load(three_samples(), 4);
        assert!(player.is_exhausted());
        assert_eq!(
            player.step(&Isometry3::identity(), 0.0),
            Some(PlayStep::Exhausted(Pose4::new(0.0, 0.0, 0.2, 0.0)))
        );
    }

    #[test]
    fn test_not_loaded() {
        let mut player = TrajPlayer::new();

        assert!(!player.is_loaded());
        assert!(!player.is_exhausted());
        assert!(player.step(&Isometry3::identity(), 0.0).is_none());

        player.load(SampledTraj::default(), 0);
        assert!(!player.is_loaded());
        assert!(player.step(&Isometry3::identity(), 0.0).is_none());

        player.load(three_samples(), 0);
        player.clear();
        assert_eq!(player.index(), None);
    }
}
