use super::{verify_reconstruction, DecompositionConfig, Extrinsics, ProjectionMatrix, DROP_Z};
use crate::error::CameraError;
use crate::linalg::{cross, fix_rq_signs, mat2_inv, mat_mul, rq_2x3, Mat3, Mat3x4};

/// An affine camera factored as `P = K * DropZ * [R T; 0 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AffineCamera {
    /// Upper-triangular intrinsics with positive diagonal and `k[2][2] = 1`.
    pub k: Mat3,
    pub drop_z: Mat3x4,
    /// Proper rotation and translation. `t[2]` is always 0: depth translation
    /// is invisible to an affine camera.
    pub extrinsics: Extrinsics,
}

impl AffineCamera {
    /// `K * DropZ * [R T; 0 1]`
    pub fn projection(&self) -> ProjectionMatrix {
        ProjectionMatrix(mat_mul(
            &mat_mul(&self.k, &self.drop_z),
            &self.extrinsics.to_homogeneous(),
        ))
    }
}

/// Factor an affine projection matrix into intrinsics and extrinsics.
///
/// Only the top two rows of `p` carry information; the recomposed matrix
/// always has `[0, 0, 0, 1]` as its third row, so a 3x4 input with any other
/// third row (a perspective camera) fails the residual check.
pub fn decompose_affine(
    p: &ProjectionMatrix,
    config: &DecompositionConfig,
) -> Result<AffineCamera, CameraError> {
    let m = p.rows();
    let a = [
        [m[0][0], m[0][1], m[0][2]],
        [m[1][0], m[1][1], m[1][2]],
    ];
    let t_raw = [m[0][3], m[1][3]];

    let (mut ar, mut aq) = rq_2x3(&a).ok_or(CameraError::Singular("affine projection block"))?;
    fix_rq_signs(&mut ar, &mut aq);

    let k = [
        [ar[0][0], ar[0][1], 0.0],
        [ar[1][0], ar[1][1], 0.0],
        [0.0, 0.0, 1.0],
    ];

    let rotx = aq[0];
    let roty = aq[1];
    let rotz = cross(&rotx, &roty);
    let r = [rotx, roty, rotz];

    let ar_inv = mat2_inv(&ar).ok_or(CameraError::Singular("affine intrinsics"))?;
    let t2 = [
        ar_inv[0][0] * t_raw[0] + ar_inv[0][1] * t_raw[1],
        ar_inv[1][0] * t_raw[0] + ar_inv[1][1] * t_raw[1],
    ];

    let camera = AffineCamera {
        k,
        drop_z: DROP_Z,
        extrinsics: Extrinsics::new(r, [t2[0], t2[1], 0.0]),
    };

    verify_reconstruction("decompose_affine", m, camera.projection().rows(), config.tolerance)?;

    Ok(camera)
}
