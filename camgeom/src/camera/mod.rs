//! Camera projection decomposition.
//!
//! Projection matrices factor as `P = K * DropZ * [R T; 0 1]` where `K` is an
//! upper-triangular intrinsic matrix with positive diagonal and `DropZ`
//! discards depth. Every factorization here is checked by recomposing and
//! comparing against the input within [`DecompositionConfig::tolerance`].

pub mod affine;
pub mod batch;
pub mod config;
pub mod headpose;
pub mod ortho;
pub mod reprojection;

pub use affine::{decompose_affine, AffineCamera};
pub use batch::{decompose_affine_all, head_poses};
pub use config::{DecompositionConfig, DEFAULT_TOLERANCE};
pub use headpose::{
    compose_camera_rotation, decompose_camera_rotation, HeadPose, FRANKFURT_PITCH_OFFSET_DEG,
};
pub use ortho::{affine_to_orthographic, OrthographicCamera};
pub use reprojection::{project_points, projection_error, reprojection_error};

use crate::error::CameraError;
use crate::linalg::{homogeneous, mat_vec, max_abs_diff, transpose, Mat3, Mat3x4, Mat4, Vec3};

/// Selector that keeps x, y and the homogeneous 1 of a 3D point, dropping z.
pub const DROP_Z: Mat3x4 = [
    [1.0, 0.0, 0.0, 0.0],
    [0.0, 1.0, 0.0, 0.0],
    [0.0, 0.0, 0.0, 1.0],
];

/// A rigid transform (world -> camera).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Extrinsics {
    /// 3x3 rotation matrix (row-major)
    pub r: Mat3,
    /// Translation vector
    pub t: Vec3,
}

impl Extrinsics {
    pub fn new(r: Mat3, t: Vec3) -> Self {
        Extrinsics { r, t }
    }

    /// `[R T; 0 1]`
    pub fn to_homogeneous(&self) -> Mat4 {
        homogeneous(&self.r, &self.t)
    }

    /// Split a 4x4 homogeneous transform. The bottom row is ignored.
    pub fn from_homogeneous(m: &Mat4) -> Self {
        Extrinsics {
            r: crate::linalg::block3(m),
            t: [m[0][3], m[1][3], m[2][3]],
        }
    }

    /// `[R^T, -R^T T]`, valid when `r` is orthonormal.
    pub fn inverse(&self) -> Self {
        let rt = transpose(&self.r);
        let t = mat_vec(&rt, &self.t);
        Extrinsics {
            r: rt,
            t: [-t[0], -t[1], -t[2]],
        }
    }

    pub fn transform_point(&self, p: &Vec3) -> Vec3 {
        let rp = mat_vec(&self.r, p);
        [rp[0] + self.t[0], rp[1] + self.t[1], rp[2] + self.t[2]]
    }
}

/// A 3x4 camera projection matrix mapping homogeneous 3D points to
/// homogeneous pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProjectionMatrix(pub Mat3x4);

impl ProjectionMatrix {
    /// Extend the two rows of an affine camera with `[0, 0, 0, 1]`.
    pub fn from_affine_rows(rows: [[f64; 4]; 2]) -> Self {
        ProjectionMatrix([rows[0], rows[1], [0.0, 0.0, 0.0, 1.0]])
    }

    pub fn rows(&self) -> &Mat3x4 {
        &self.0
    }

    /// Pixel coordinates of a 3D point (homogeneous divide by the third row).
    pub fn project(&self, p: &Vec3) -> [f64; 2] {
        let m = &self.0;
        let mut h = [0.0; 3];
        for (hi, row) in h.iter_mut().zip(m) {
            *hi = row[0] * p[0] + row[1] * p[1] + row[2] * p[2] + row[3];
        }
        [h[0] / h[2], h[1] / h[2]]
    }
}

impl From<Mat3x4> for ProjectionMatrix {
    fn from(m: Mat3x4) -> Self {
        ProjectionMatrix(m)
    }
}

impl From<[[f64; 4]; 2]> for ProjectionMatrix {
    fn from(rows: [[f64; 4]; 2]) -> Self {
        ProjectionMatrix::from_affine_rows(rows)
    }
}

/// Fail with `DecompositionResidual` unless `expected` and `actual` agree
/// element-wise within `tolerance`. NaN never passes.
pub(crate) fn verify_reconstruction(
    stage: &'static str,
    expected: &Mat3x4,
    actual: &Mat3x4,
    tolerance: f64,
) -> Result<(), CameraError> {
    let max_residual = max_abs_diff(expected, actual);
    tracing::debug!(stage, max_residual, tolerance, "reconstruction residual");
    if max_residual <= tolerance {
        return Ok(());
    }
    tracing::warn!(stage, max_residual, tolerance, "reconstruction check failed");
    Err(CameraError::DecompositionResidual {
        stage,
        max_residual,
        tolerance,
    })
}
