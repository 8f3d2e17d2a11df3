//! Many independent inputs at once. Each element is processed on its own, so
//! with the `parallel` feature the work is spread over rayon's pool.

#[cfg(feature = "parallel")]
use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use super::{
    decompose_affine, decompose_camera_rotation, AffineCamera, DecompositionConfig, HeadPose,
    ProjectionMatrix,
};
use crate::error::CameraError;
use crate::linalg::Mat3;

/// [`decompose_affine`] over a slice; results keep input order.
pub fn decompose_affine_all(
    projections: &[ProjectionMatrix],
    config: &DecompositionConfig,
) -> Vec<Result<AffineCamera, CameraError>> {
    #[cfg(feature = "parallel")]
    let results = projections
        .par_iter()
        .map(|p| decompose_affine(p, config))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let results = projections
        .iter()
        .map(|p| decompose_affine(p, config))
        .collect();

    results
}

/// [`decompose_camera_rotation`] over a slice; results keep input order.
pub fn head_poses(rotations: &[Mat3], pitch_offset: f64) -> Vec<HeadPose> {
    #[cfg(feature = "parallel")]
    let poses = rotations
        .par_iter()
        .map(|r| decompose_camera_rotation(r, pitch_offset))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let poses = rotations
        .iter()
        .map(|r| decompose_camera_rotation(r, pitch_offset))
        .collect();

    poses
}
