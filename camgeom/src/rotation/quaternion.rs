use std::ops::Mul;

use crate::linalg::{cross, dot, vec_norm, Mat3, Vec3};

/// Rotation quaternion with vector part `(x, y, z)` and scalar part `w`.
///
/// `q` and `-q` describe the same rotation; nothing here picks one of them.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quaternion {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quaternion {
    pub const IDENTITY: Quaternion = Quaternion {
        x: 0.0,
        y: 0.0,
        z: 0.0,
        w: 1.0,
    };

    pub fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Quaternion { x, y, z, w }
    }

    /// Components in `(x, y, z, w)` order.
    pub fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    pub fn from_array(q: [f64; 4]) -> Self {
        Quaternion::new(q[0], q[1], q[2], q[3])
    }

    pub fn vector(&self) -> Vec3 {
        [self.x, self.y, self.z]
    }

    /// Rotation of `theta` radians about `axis`. The axis is normalized here;
    /// a zero axis gives the identity.
    pub fn from_axis_angle(axis: &Vec3, theta: f64) -> Self {
        let n = vec_norm(axis);
        if n == 0.0 {
            return Quaternion::IDENTITY;
        }
        let (s, c) = (theta / 2.0).sin_cos();
        Quaternion::new(s * axis[0] / n, s * axis[1] / n, s * axis[2] / n, c)
    }

    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    pub fn normalized(&self) -> Self {
        let n = self.norm();
        Quaternion::new(self.x / n, self.y / n, self.z / n, self.w / n)
    }

    pub fn negated(&self) -> Self {
        Quaternion::new(-self.x, -self.y, -self.z, -self.w)
    }

    /// Hamilton product `self * other`: rotate by `self`, then by `other`
    /// expressed in the frame `self` produced.
    pub fn compose(&self, other: &Quaternion) -> Quaternion {
        let v1 = self.vector();
        let v2 = other.vector();
        let w = self.w * other.w - dot(&v1, &v2);
        let c = cross(&v1, &v2);
        Quaternion::new(
            c[0] + self.w * v2[0] + other.w * v1[0],
            c[1] + self.w * v2[1] + other.w * v1[1],
            c[2] + self.w * v2[2] + other.w * v1[2],
            w,
        )
    }

    /// Rotation matrix of the normalized quaternion. No further
    /// orthonormalization is done.
    pub fn to_matrix(&self) -> Mat3 {
        let Quaternion { x, y, z, w } = self.normalized();
        [
            [
                1.0 - 2.0 * y * y - 2.0 * z * z,
                2.0 * x * y - 2.0 * z * w,
                2.0 * x * z + 2.0 * y * w,
            ],
            [
                2.0 * x * y + 2.0 * z * w,
                1.0 - 2.0 * x * x - 2.0 * z * z,
                2.0 * y * z - 2.0 * x * w,
            ],
            [
                2.0 * x * z - 2.0 * y * w,
                2.0 * y * z + 2.0 * x * w,
                1.0 - 2.0 * x * x - 2.0 * y * y,
            ],
        ]
    }

    /// Quaternion of a rotation matrix.
    ///
    /// Branches on the largest of the four `4 q_i^2` candidates so the
    /// division is always by the biggest available component.
    pub fn from_matrix(rot: &Mat3) -> Self {
        let d0 = rot[0][0];
        let d1 = rot[1][1];
        let d2 = rot[2][2];
        let candidates = [
            1.0 + d0 - d1 - d2,
            1.0 - d0 + d1 - d2,
            1.0 - d0 - d1 + d2,
            1.0 + d0 + d1 + d2,
        ];

        // First maximum wins on ties
        let mut imax = 0;
        for i in 1..4 {
            if candidates[i].abs() > candidates[imax].abs() {
                imax = i;
            }
        }

        let s4 = candidates[imax].sqrt() * 2.0;
        let inv = 1.0 / s4;
        match imax {
            0 => Quaternion::new(
                s4 / 4.0,
                (rot[1][0] + rot[0][1]) * inv,
                (rot[2][0] + rot[0][2]) * inv,
                (rot[2][1] - rot[1][2]) * inv,
            ),
            1 => Quaternion::new(
                (rot[1][0] + rot[0][1]) * inv,
                s4 / 4.0,
                (rot[2][1] + rot[1][2]) * inv,
                (rot[0][2] - rot[2][0]) * inv,
            ),
            2 => Quaternion::new(
                (rot[2][0] + rot[0][2]) * inv,
                (rot[2][1] + rot[1][2]) * inv,
                s4 / 4.0,
                (rot[1][0] - rot[0][1]) * inv,
            ),
            _ => Quaternion::new(
                (rot[2][1] - rot[1][2]) * inv,
                (rot[0][2] - rot[2][0]) * inv,
                (rot[1][0] - rot[0][1]) * inv,
                s4 / 4.0,
            ),
        }
    }

    /// Rotate a vector.
    pub fn rotate(&self, v: &Vec3) -> Vec3 {
        crate::linalg::mat_vec(&self.to_matrix(), v)
    }
}

impl Default for Quaternion {
    fn default() -> Self {
        Quaternion::IDENTITY
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.compose(&rhs)
    }
}

/// Fold quaternions left to right starting from the identity.
pub fn compose_quaternions<'a, I>(quaternions: I) -> Quaternion
where
    I: IntoIterator<Item = &'a Quaternion>,
{
    quaternions
        .into_iter()
        .fold(Quaternion::IDENTITY, |total, q| total.compose(q))
}
