use crate::linalg::Mat3;
use crate::rotation::{AxisOrder, EulerAngles};

/// Pitch offset (degrees) that puts pitch 0 at a horizontal Frankfurt plane.
pub const FRANKFURT_PITCH_OFFSET_DEG: f64 = -7.0;

/// Head orientation in degrees: yaw about Y, then pitch about X, then roll about Z.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeadPose {
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

impl HeadPose {
    pub fn new(yaw: f64, pitch: f64, roll: f64) -> Self {
        HeadPose { yaw, pitch, roll }
    }
}

/// Change of basis between camera axes (y down, z forward) and head axes
/// (y up, z toward the viewer): `diag(1,-1,-1) * m * diag(1,-1,-1)`.
fn flip_yz(m: &Mat3) -> Mat3 {
    const SIGN: [f64; 3] = [1.0, -1.0, -1.0];
    let mut out = *m;
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v *= SIGN[i] * SIGN[j];
        }
    }
    out
}

/// Head pose of a camera rotation.
///
/// The camera rotation is mapped into head axes by conjugation,
/// `F * cam_r * F` with `F = diag(1, -1, -1)`, so the identity camera is the
/// neutral pose `(0, pitch_offset, 0)`. A frontal camera expressed as
/// `cam_r = F` therefore reads as yaw 180, roll 180; callers that apply `F`
/// on one side only must convert first.
///
/// `pitch_offset` (degrees) is added to the extracted pitch. Near pitch ±90°
/// yaw and roll are coupled and individually unreliable.
pub fn decompose_camera_rotation(cam_r: &Mat3, pitch_offset: f64) -> HeadPose {
    let head = flip_yz(cam_r);
    let [yaw, pitch, roll] = EulerAngles::from_matrix(&head, AxisOrder::YXZ).to_degrees();
    HeadPose {
        yaw,
        pitch: pitch + pitch_offset,
        roll,
    }
}

/// Camera rotation of a head pose; inverse of [`decompose_camera_rotation`].
pub fn compose_camera_rotation(pose: &HeadPose, pitch_offset: f64) -> Mat3 {
    let head = EulerAngles::new(
        pose.yaw.to_radians(),
        (pose.pitch - pitch_offset).to_radians(),
        pose.roll.to_radians(),
        AxisOrder::YXZ,
    )
    .to_matrix();
    flip_yz(&head)
}
