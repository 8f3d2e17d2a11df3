//! Conversions between rotation matrices, quaternions, axis-angle pairs and
//! Euler angles in any of the six non-repeating axis orders.
//!
//! The typed API ([`Quaternion`], [`EulerAngles`], [`AxisOrder`]) cannot fail.
//! The string-order functions in this module parse the order first and
//! reject malformed ones with [`RotationError`].

pub mod axis;
pub mod euler;
#[allow(clippy::needless_range_loop)]
pub mod quaternion;

pub use axis::{axis_from_string, axis_order_is_valid, Axis, AxisOrder};
pub use euler::EulerAngles;
pub use quaternion::{compose_quaternions, Quaternion};

use crate::error::RotationError;
use crate::linalg::{Mat3, Vec3};

pub fn axis_angle_to_quaternion(axis: &Vec3, theta: f64) -> Quaternion {
    Quaternion::from_axis_angle(axis, theta)
}

pub fn axis_angle_to_matrix(axis: &Vec3, theta: f64) -> Mat3 {
    Quaternion::from_axis_angle(axis, theta).to_matrix()
}

/// `q1 * q2 * q3` where `qi` rotates `theta_i` about `order[i]`.
pub fn euler_angles_to_quaternion(
    theta1: f64,
    theta2: f64,
    theta3: f64,
    order: &str,
) -> Result<Quaternion, RotationError> {
    let order: AxisOrder = order.parse()?;
    Ok(EulerAngles::new(theta1, theta2, theta3, order).to_quaternion())
}

/// Angles in application order.
pub fn quaternion_to_euler_angles(q: &Quaternion, order: &str) -> Result<[f64; 3], RotationError> {
    let order: AxisOrder = order.parse()?;
    Ok(EulerAngles::from_quaternion(q, order).angles)
}

pub fn quaternion_to_matrix(q: &Quaternion) -> Mat3 {
    q.to_matrix()
}

pub fn matrix_to_quaternion(m: &Mat3) -> Quaternion {
    Quaternion::from_matrix(m)
}

pub fn euler_angles_to_matrix(
    theta1: f64,
    theta2: f64,
    theta3: f64,
    order: &str,
) -> Result<Mat3, RotationError> {
    Ok(euler_angles_to_quaternion(theta1, theta2, theta3, order)?.to_matrix())
}

pub fn matrix_to_euler_angles(m: &Mat3, order: &str) -> Result<[f64; 3], RotationError> {
    quaternion_to_euler_angles(&Quaternion::from_matrix(m), order)
}
