//! Utility maths functions

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Rotation3, UnitQuaternion};
use num_traits::Float;

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Clamp a value into `[min, max]`.
pub fn clamp<T>(value: &T, min: &T, max: &T) -> T
where
    T: Float,
{
    let mut ret = *value;

    if ret > *max {
        ret = *max
    }
    if ret < *min {
        ret = *min
    }

    ret
}

/// Calculates the least nonnegative remainder of `lhs (mod rhs)`.
///
/// Taken from the std library as num is missing it. Due to round-off the result can equal
/// `rhs.abs()` when `lhs` is a very small negative number.
pub fn rem_euclid<T>(lhs: T, rhs: T) -> T
where
    T: Float,
{
    let r = lhs % rhs;
    if r < T::zero() {
        r + rhs.abs()
    } else {
        r
    }
}

/// Wrap an angle into the range `(-pi, pi]`.
pub fn wrap_pi<T>(angle: T) -> T
where
    T: Float,
{
    let pi_t = T::from(std::f64::consts::PI).unwrap_or_else(T::zero);
    let tau_t = pi_t + pi_t;

    let wrapped = rem_euclid(angle + pi_t, tau_t) - pi_t;

    if wrapped <= -pi_t {
        wrapped + tau_t
    } else {
        wrapped
    }
}

/// Heading (rotation about world Z) of a rotation matrix, `atan2(R[1,0], R[0,0])`.
pub fn heading_from_rotation(rot: &Rotation3<f64>) -> f64 {
    let m = rot.matrix();
    m[(1, 0)].atan2(m[(0, 0)])
}

/// Heading (rotation about world Z) of an attitude quaternion.
pub fn heading_from_quaternion(q: &UnitQuaternion<f64>) -> f64 {
    heading_from_rotation(&q.to_rotation_matrix())
}
