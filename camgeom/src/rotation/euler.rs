use super::axis::AxisOrder;
use super::quaternion::{compose_quaternions, Quaternion};
use crate::linalg::Mat3;

/// Middle angles within this distance of ±90° are reported as near gimbal lock.
const GIMBAL_LOCK_MARGIN: f64 = 1e-6;

/// Three rotation angles (radians) applied in `order`.
///
/// `angles[i]` rotates about `order.axes()[i]`, each in the frame left by the
/// previous rotations, so the total is `R1 * R2 * R3`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EulerAngles {
    pub angles: [f64; 3],
    pub order: AxisOrder,
}

impl EulerAngles {
    pub fn new(theta1: f64, theta2: f64, theta3: f64, order: AxisOrder) -> Self {
        EulerAngles {
            angles: [theta1, theta2, theta3],
            order,
        }
    }

    pub fn to_quaternion(&self) -> Quaternion {
        let mut parts = [Quaternion::IDENTITY; 3];
        for ((q, axis), theta) in parts.iter_mut().zip(self.order.axes()).zip(self.angles) {
            *q = Quaternion::from_axis_angle(&axis.unit_vector(), theta);
        }
        compose_quaternions(&parts)
    }

    /// Angles of `q` in `order`.
    ///
    /// The middle angle is in [-π/2, π/2]; the outer two in (-π, π]. Near
    /// the middle angle's ±90° the outer angles are coupled and only their
    /// sum (or difference) is meaningful. `q` need not be unit length.
    pub fn from_quaternion(q: &Quaternion, order: AxisOrder) -> Self {
        let q = q.normalized().to_array();
        let [a1, a2, a3] = order.axes();
        let p0 = q[3];
        let p1 = q[a1.index()];
        let p2 = q[a2.index()];
        let p3 = q[a3.index()];
        let e = order.handedness();

        let theta1 = f64::atan2(
            e * 2.0 * (p2 * p3 + e * p0 * p1),
            p0 * p0 - p1 * p1 - p2 * p2 + p3 * p3,
        );
        let sin2 = (-e * 2.0 * (p1 * p3 - e * p0 * p2)).clamp(-1.0, 1.0);
        let theta2 = sin2.asin();
        let theta3 = f64::atan2(
            e * 2.0 * (p1 * p2 + e * p0 * p3),
            p0 * p0 + p1 * p1 - p2 * p2 - p3 * p3,
        );

        if 1.0 - sin2.abs() < GIMBAL_LOCK_MARGIN {
            tracing::trace!(%order, theta2, "euler extraction near gimbal lock");
        }

        EulerAngles::new(theta1, theta2, theta3, order)
    }

    pub fn to_matrix(&self) -> Mat3 {
        self.to_quaternion().to_matrix()
    }

    pub fn from_matrix(m: &Mat3, order: AxisOrder) -> Self {
        EulerAngles::from_quaternion(&Quaternion::from_matrix(m), order)
    }

    pub fn to_degrees(&self) -> [f64; 3] {
        self.angles.map(f64::to_degrees)
    }
}
