//! End-to-end: synthetic affine cameras -> decomposition -> orthographic
//! factoring -> head pose.
use camgeom::camera::{
    affine_to_orthographic, compose_camera_rotation, decompose_affine, decompose_camera_rotation,
    reprojection_error, AffineCamera, DecompositionConfig, Extrinsics, HeadPose, ProjectionMatrix,
    DROP_Z, FRANKFURT_PITCH_OFFSET_DEG,
};
use camgeom::error::{CameraError, RotationError};
use camgeom::linalg::{max_abs_diff, IDENTITY3};
use camgeom::rotation::{axis_order_is_valid, euler_angles_to_quaternion, matrix_to_euler_angles};

fn affine_camera(pose: HeadPose, k: [[f64; 3]; 3], t: [f64; 3]) -> (ProjectionMatrix, [[f64; 3]; 3]) {
    let r = compose_camera_rotation(&pose, FRANKFURT_PITCH_OFFSET_DEG);
    let cam = AffineCamera {
        k,
        drop_z: DROP_Z,
        extrinsics: Extrinsics::new(r, t),
    };
    (cam.projection(), r)
}

fn face_points() -> Vec<[f64; 3]> {
    let mut pts = Vec::new();
    for i in -2..=2 {
        for j in -2..=2 {
            let x = i as f64 * 20.0;
            let y = j as f64 * 25.0;
            pts.push([x, y, 40.0 - 0.01 * (x * x + y * y)]);
        }
    }
    pts
}

#[test]
fn identity_camera_head_pose() {
    let pose = decompose_camera_rotation(&IDENTITY3, -7.0);
    assert!(pose.yaw.abs() < 1e-9, "{pose:?}");
    assert!((pose.pitch + 7.0).abs() < 1e-9, "{pose:?}");
    assert!(pose.roll.abs() < 1e-9, "{pose:?}");

    let r = compose_camera_rotation(&HeadPose::new(0.0, -7.0, 0.0), -7.0);
    assert!(max_abs_diff(&r, &IDENTITY3) < 1e-12);
}

#[test]
fn head_pose_survives_affine_decomposition() {
    let truth = HeadPose::new(-22.0, 8.0, 4.0);
    let k = [[4.2, 0.05, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 1.0]];
    let (p, r) = affine_camera(truth, k, [112.0, 96.0, 0.0]);

    let config = DecompositionConfig::default();
    let cam = decompose_affine(&p, &config).unwrap();
    assert!(max_abs_diff(&cam.extrinsics.r, &r) < 1e-9);

    let pose = decompose_camera_rotation(&cam.extrinsics.r, FRANKFURT_PITCH_OFFSET_DEG);
    assert!((pose.yaw - truth.yaw).abs() < 1e-6, "{pose:?}");
    assert!((pose.pitch - truth.pitch).abs() < 1e-6, "{pose:?}");
    assert!((pose.roll - truth.roll).abs() < 1e-6, "{pose:?}");
}

#[test]
fn orthographic_render_matches_affine_image() {
    let k = [[4.2, 0.3, 0.0], [0.0, 3.6, 0.0], [0.0, 0.0, 1.0]];
    let (p, _) = affine_camera(HeadPose::new(15.0, -5.0, 2.0), k, [100.0, 120.0, 0.0]);
    let pts = face_points();
    let observed: Vec<[f64; 2]> = pts.iter().map(|pt| p.project(pt)).collect();

    let config = DecompositionConfig {
        limit_h_diagonal: false,
        ..DecompositionConfig::default()
    };
    let cam = decompose_affine(&p, &config).unwrap();
    let ortho = affine_to_orthographic(&cam.k, &cam.extrinsics, &config).unwrap();

    let warped: Vec<[f64; 3]> = pts.iter().map(|pt| ortho.warp_point(pt)).collect();
    let err = reprojection_error(&ortho.projection(), &warped, &observed).unwrap();
    assert!(err < 1e-9, "mean reprojection error {err}");

    // The limited warp trades exactness for an axis-aligned scale
    let limited = affine_to_orthographic(&cam.k, &cam.extrinsics, &DecompositionConfig::default())
        .unwrap();
    let warped: Vec<[f64; 3]> = pts.iter().map(|pt| limited.warp_point(pt)).collect();
    let err = reprojection_error(&limited.projection(), &warped, &observed).unwrap();
    assert!(err.is_finite());
}

#[test]
fn invalid_orders_are_rejected() {
    for bad in ["XYX", "ABC", "XY", "XYZW"] {
        assert!(!axis_order_is_valid(bad));
        assert!(matches!(
            euler_angles_to_quaternion(0.0, 0.0, 0.0, bad),
            Err(RotationError::InvalidAxisOrder(_))
        ));
        assert!(matches!(
            matrix_to_euler_angles(&IDENTITY3, bad),
            Err(RotationError::InvalidAxisOrder(_))
        ));
    }
}

#[test]
fn residual_error_reports_stage_and_tolerance() {
    let p = ProjectionMatrix([
        [500.0, 0.0, 320.0, 0.0],
        [0.0, 500.0, 240.0, 0.0],
        [0.0, 0.0, 1.0, 0.0],
    ]);
    match decompose_affine(&p, &DecompositionConfig::default()) {
        Err(CameraError::DecompositionResidual {
            stage,
            max_residual,
            tolerance,
        }) => {
            assert_eq!(stage, "decompose_affine");
            assert_eq!(tolerance, 1e-6);
            assert!(max_residual >= 1.0);
        }
        other => panic!("expected residual error, got {other:?}"),
    }
}
