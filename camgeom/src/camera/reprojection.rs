use super::ProjectionMatrix;
use crate::error::CameraError;
use crate::linalg::Vec3;

/// Mean Euclidean distance between corresponding 2D points.
pub fn projection_error(observed: &[[f64; 2]], reprojected: &[[f64; 2]]) -> Result<f64, CameraError> {
    if observed.len() != reprojected.len() {
        return Err(CameraError::PointCountMismatch {
            observed: observed.len(),
            reprojected: reprojected.len(),
        });
    }
    if observed.is_empty() {
        return Err(CameraError::EmptyPointSet);
    }
    let total: f64 = observed
        .iter()
        .zip(reprojected)
        .map(|(a, b)| {
            let dx = a[0] - b[0];
            let dy = a[1] - b[1];
            (dx * dx + dy * dy).sqrt()
        })
        .sum();
    Ok(total / observed.len() as f64)
}

pub fn project_points(p: &ProjectionMatrix, points: &[Vec3]) -> Vec<[f64; 2]> {
    points.iter().map(|pt| p.project(pt)).collect()
}

/// Mean pixel error of camera `p` against observed image points of `points_3d`.
pub fn reprojection_error(
    p: &ProjectionMatrix,
    points_3d: &[Vec3],
    observed: &[[f64; 2]],
) -> Result<f64, CameraError> {
    let projected = project_points(p, points_3d);
    projection_error(observed, &projected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_of_distances() {
        let a = [[0.0, 0.0], [1.0, 1.0]];
        let b = [[3.0, 4.0], [1.0, 1.0]];
        assert_eq!(projection_error(&a, &b).unwrap(), 2.5);
    }

    #[test]
    fn identical_sets_have_zero_error() {
        let a = [[10.0, -3.0], [7.5, 2.0], [0.0, 0.0]];
        assert_eq!(projection_error(&a, &a).unwrap(), 0.0);
    }

    #[test]
    fn length_mismatch_fails() {
        let a = [[0.0, 0.0], [1.0, 1.0]];
        let b = [[0.0, 0.0]];
        assert_eq!(
            projection_error(&a, &b).unwrap_err(),
            CameraError::PointCountMismatch {
                observed: 2,
                reprojected: 1
            }
        );
    }

    #[test]
    fn empty_sets_fail() {
        assert_eq!(projection_error(&[], &[]).unwrap_err(), CameraError::EmptyPointSet);
    }

    #[test]
    fn reprojection_of_perfect_camera() {
        let p = ProjectionMatrix::from_affine_rows([[2.0, 0.0, 0.0, 5.0], [0.0, 2.0, 0.0, -1.0]]);
        let pts = [[0.0, 0.0, 1.0], [1.0, 2.0, -3.0], [-4.0, 0.5, 9.0]];
        let mut observed = project_points(&p, &pts);
        assert_eq!(observed[1], [7.0, 3.0]);
        assert_eq!(reprojection_error(&p, &pts, &observed).unwrap(), 0.0);

        observed[0][0] += 3.0;
        let err = reprojection_error(&p, &pts, &observed).unwrap();
        assert!((err - 1.0).abs() < 1e-12);
    }
}
