use super::{verify_reconstruction, DecompositionConfig, Extrinsics, ProjectionMatrix, DROP_Z};
use crate::error::CameraError;
use crate::linalg::{
    block3, fix_qr_signs, homogeneous, mat_inv, mat_mul, mat_vec, qr_3x3, Mat3, Mat4, Vec3,
};

/// An orthographic camera plus the warp `h` to apply to scene points so that
/// it images them the way the original affine camera did.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrthographicCamera {
    /// `diag(f, f, 1)`
    pub k: Mat3,
    pub extrinsics: Extrinsics,
    /// 4x4 point warp: upper-triangular (diagonal when limited) scale/shear,
    /// no translation.
    pub h: Mat4,
}

impl OrthographicCamera {
    /// `Kortho * DropZ * [R T; 0 1]`, without the point warp.
    pub fn projection(&self) -> ProjectionMatrix {
        ProjectionMatrix(mat_mul(
            &mat_mul(&self.k, &DROP_Z),
            &self.extrinsics.to_homogeneous(),
        ))
    }

    /// `Kortho * DropZ * [R T; 0 1] * H`. Equals the original affine
    /// projection unless the warp was limited to its diagonal.
    pub fn warped_projection(&self) -> ProjectionMatrix {
        ProjectionMatrix(mat_mul(self.projection().rows(), &self.h))
    }

    /// Apply the point warp to a scene point.
    pub fn warp_point(&self, p: &Vec3) -> Vec3 {
        let w = mat_vec(&block3(&self.h), p);
        [w[0] + self.h[0][3], w[1] + self.h[1][3], w[2] + self.h[2][3]]
    }
}

/// Move shear and non-uniform scale out of affine intrinsics `k` and into a
/// warp applied to the scene points.
///
/// `k` must have the affine form produced by [`super::decompose_affine`]
/// (no principal-point column); anything else fails the recomposition check.
pub fn affine_to_orthographic(
    k: &Mat3,
    extrinsics: &Extrinsics,
    config: &DecompositionConfig,
) -> Result<OrthographicCamera, CameraError> {
    let f = k[0][0];
    let k_ortho = [[f, 0.0, 0.0], [0.0, f, 0.0], [0.0, 0.0, 1.0]];

    // A maps K to Kortho; H is A^-1 conjugated into world coordinates
    let k_inv = mat_inv(k).ok_or(CameraError::Singular("intrinsics"))?;
    let a3 = mat_mul(&k_inv, &k_ortho);
    let a3_inv = mat_inv(&a3).ok_or(CameraError::Singular("orthographic intrinsics"))?;
    let a_inv = homogeneous(&a3_inv, &[0.0; 3]);

    let rt = extrinsics.to_homogeneous();
    let rt_inv = extrinsics.inverse().to_homogeneous();
    let h = mat_mul(&mat_mul(&rt_inv, &a_inv), &rt);

    let p = mat_mul(&mat_mul(k, &DROP_Z), &rt);
    let p3 = mat_mul(&mat_mul(&mat_mul(&k_ortho, &DROP_Z), &rt), &h);
    verify_reconstruction("affine_to_orthographic", &p, &p3, config.tolerance)?;

    // Fold the rotation part of H into the extrinsics
    let (mut hq, mut hr) = qr_3x3(&block3(&h));
    fix_qr_signs(&mut hq, &mut hr);

    if config.limit_h_diagonal {
        hr = [
            [hr[0][0], 0.0, 0.0],
            [0.0, hr[1][1], 0.0],
            [0.0, 0.0, hr[2][2]],
        ];
    }

    let hq4 = homogeneous(&hq, &[h[0][3], h[1][3], h[2][3]]);
    let rt_ortho = mat_mul(&rt, &hq4);

    Ok(OrthographicCamera {
        k: k_ortho,
        extrinsics: Extrinsics::from_homogeneous(&rt_ortho),
        h: homogeneous(&hr, &[0.0; 3]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::{decompose_affine, AffineCamera};
    use crate::linalg::{mat_det, max_abs_diff, transpose, IDENTITY3, IDENTITY4};
    use crate::rotation::{AxisOrder, EulerAngles};

    fn rotation() -> Mat3 {
        EulerAngles::new(0.4, -0.25, 0.1, AxisOrder::YXZ).to_matrix()
    }

    fn full_warp() -> DecompositionConfig {
        DecompositionConfig {
            limit_h_diagonal: false,
            ..DecompositionConfig::default()
        }
    }

    #[test]
    fn orthographic_input_is_unchanged() {
        let k = [[700.0, 0.0, 0.0], [0.0, 700.0, 0.0], [0.0, 0.0, 1.0]];
        let ext = Extrinsics::new(rotation(), [3.0, 4.0, 0.0]);
        let ortho = affine_to_orthographic(&k, &ext, &DecompositionConfig::default()).unwrap();

        assert!(max_abs_diff(&ortho.k, &k) < 1e-12);
        assert!(max_abs_diff(&ortho.h, &IDENTITY4) < 1e-9, "H={:?}", ortho.h);
        assert!(max_abs_diff(&ortho.extrinsics.r, &ext.r) < 1e-9);
        for i in 0..3 {
            assert!((ortho.extrinsics.t[i] - ext.t[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn full_warp_reproduces_sheared_camera() {
        let k = [[800.0, 12.0, 0.0], [0.0, 760.0, 0.0], [0.0, 0.0, 1.0]];
        let ext = Extrinsics::new(rotation(), [-5.0, 2.0, 0.0]);
        let original = AffineCamera {
            k,
            drop_z: DROP_Z,
            extrinsics: ext,
        }
        .projection();

        let ortho = affine_to_orthographic(&k, &ext, &full_warp()).unwrap();

        assert_eq!(ortho.k, [[800.0, 0.0, 0.0], [0.0, 800.0, 0.0], [0.0, 0.0, 1.0]]);
        let warped = ortho.warped_projection();
        assert!(
            max_abs_diff(warped.rows(), original.rows()) < 1e-9,
            "{warped:?} vs {original:?}"
        );
        // Warp is upper-triangular with positive diagonal
        for i in 0..3 {
            assert!(ortho.h[i][i] > 0.0);
            for j in 0..i {
                assert_eq!(ortho.h[i][j], 0.0);
            }
        }
    }

    #[test]
    fn limited_warp_is_diagonal_and_rotation_proper() {
        let k = [[800.0, 12.0, 0.0], [0.0, 760.0, 0.0], [0.0, 0.0, 1.0]];
        let ext = Extrinsics::new(rotation(), [-5.0, 2.0, 0.0]);
        let ortho = affine_to_orthographic(&k, &ext, &DecompositionConfig::default()).unwrap();

        for i in 0..4 {
            for j in 0..4 {
                if i != j {
                    assert_eq!(ortho.h[i][j], 0.0, "H[{i}][{j}]");
                }
            }
        }
        let r = ortho.extrinsics.r;
        assert!(max_abs_diff(&mat_mul(&r, &transpose(&r)), &IDENTITY3) < 1e-12);
        assert!((mat_det(&r) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn axis_aligned_stretch_moves_into_warp() {
        let k = [[800.0, 0.0, 0.0], [0.0, 600.0, 0.0], [0.0, 0.0, 1.0]];
        let ext = Extrinsics::new(IDENTITY3, [10.0, -4.0, 0.0]);
        let original = AffineCamera {
            k,
            drop_z: DROP_Z,
            extrinsics: ext,
        }
        .projection();

        let ortho = affine_to_orthographic(&k, &ext, &DecompositionConfig::default()).unwrap();

        assert!((ortho.h[0][0] - 1.0).abs() < 1e-12);
        assert!((ortho.h[1][1] - 0.75).abs() < 1e-12);
        assert!((ortho.h[2][2] - 1.0).abs() < 1e-12);
        assert!(max_abs_diff(ortho.warped_projection().rows(), original.rows()) < 1e-9);

        // A warped point images where the original camera put it
        let pt = [0.3, -1.2, 5.0];
        let a = original.project(&pt);
        let b = ortho.projection().project(&ortho.warp_point(&pt));
        assert!((a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9);
    }

    #[test]
    fn principal_point_fails_recomposition() {
        let k = [[500.0, 0.0, 10.0], [0.0, 500.0, 0.0], [0.0, 0.0, 1.0]];
        let ext = Extrinsics::new(IDENTITY3, [0.0; 3]);
        let err = affine_to_orthographic(&k, &ext, &DecompositionConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            CameraError::DecompositionResidual {
                stage: "affine_to_orthographic",
                ..
            }
        ));
    }

    #[test]
    fn singular_intrinsics() {
        let k = [[0.0, 0.0, 0.0], [0.0, 500.0, 0.0], [0.0, 0.0, 1.0]];
        let ext = Extrinsics::new(IDENTITY3, [0.0; 3]);
        assert_eq!(
            affine_to_orthographic(&k, &ext, &DecompositionConfig::default()).unwrap_err(),
            CameraError::Singular("intrinsics")
        );
    }

    #[test]
    fn chains_after_decompose_affine() {
        let p = ProjectionMatrix::from_affine_rows([
            [610.0, 8.0, -120.0, 320.0],
            [15.0, -590.0, 60.0, 240.0],
        ]);
        let cam = decompose_affine(&p, &DecompositionConfig::default()).unwrap();
        let ortho = affine_to_orthographic(&cam.k, &cam.extrinsics, &full_warp()).unwrap();
        assert!(max_abs_diff(ortho.warped_projection().rows(), p.rows()) < 1e-6);
    }
}
