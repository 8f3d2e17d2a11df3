//! QR and RQ factorizations for the small shapes camera decomposition needs.
//!
//! Both factorizations are only unique up to the sign of each diagonal entry
//! of the triangular factor. `fix_qr_signs` / `fix_rq_signs` pin that choice
//! to a non-negative diagonal.

use super::{dot, IDENTITY3, Mat2, Mat3, SINGULAR_EPS};

/// Householder QR of a 3x3 matrix: `m = q * r`, `q` orthogonal, `r` upper-triangular.
///
/// Diagonal signs of `r` are whatever the reflections produce; callers that
/// need a convention apply [`fix_qr_signs`].
pub fn qr_3x3(m: &Mat3) -> (Mat3, Mat3) {
    let mut r = *m;
    let mut q = IDENTITY3;

    for k in 0..2 {
        let mut v = [0.0f64; 3];
        for i in k..3 {
            v[i] = r[i][k];
        }
        let col_norm = (k..3).map(|i| v[i] * v[i]).sum::<f64>().sqrt();
        if col_norm < SINGULAR_EPS {
            continue;
        }

        // Reflect onto -sign(x_k) * |x| e_k to avoid cancellation
        let alpha = if v[k] > 0.0 { -col_norm } else { col_norm };
        v[k] -= alpha;
        let vv = dot(&v, &v);
        if vv < SINGULAR_EPS * SINGULAR_EPS {
            continue;
        }

        // r <- H r
        for j in 0..3 {
            let s = (k..3).map(|i| v[i] * r[i][j]).sum::<f64>();
            let f = 2.0 * s / vv;
            for i in k..3 {
                r[i][j] -= f * v[i];
            }
        }

        // q <- q H
        for i in 0..3 {
            let s = (k..3).map(|l| q[i][l] * v[l]).sum::<f64>();
            let f = 2.0 * s / vv;
            for l in k..3 {
                q[i][l] -= f * v[l];
            }
        }
    }

    for i in 1..3 {
        for j in 0..i {
            r[i][j] = 0.0;
        }
    }

    (q, r)
}

/// RQ of a 2x3 matrix with full row rank: `a = r * q`, `r` 2x2 upper-triangular,
/// `q` 2x3 with orthonormal rows.
///
/// Works from the last row up, so row 1 of `q` is row 1 of `a` normalized.
/// Returns `None` when the rows are (nearly) linearly dependent.
pub fn rq_2x3(a: &[[f64; 3]; 2]) -> Option<(Mat2, [[f64; 3]; 2])> {
    let r11 = dot(&a[1], &a[1]).sqrt();
    if r11 < SINGULAR_EPS {
        return None;
    }
    let q1 = [a[1][0] / r11, a[1][1] / r11, a[1][2] / r11];

    let r01 = dot(&a[0], &q1);
    let resid = [
        a[0][0] - r01 * q1[0],
        a[0][1] - r01 * q1[1],
        a[0][2] - r01 * q1[2],
    ];
    let r00 = dot(&resid, &resid).sqrt();
    if r00 < SINGULAR_EPS {
        return None;
    }
    let q0 = [resid[0] / r00, resid[1] / r00, resid[2] / r00];

    Some(([[r00, r01], [0.0, r11]], [q0, q1]))
}

/// Force a non-negative diagonal on `r` in `m = q * r`: `q <- q S`, `r <- S r`
/// with `S = diag(sign(diag(r)))`. A zero diagonal entry counts as positive.
pub fn fix_qr_signs(q: &mut Mat3, r: &mut Mat3) {
    for k in 0..3 {
        if r[k][k] < 0.0 {
            for i in 0..3 {
                q[i][k] = -q[i][k];
            }
            for j in 0..3 {
                r[k][j] = -r[k][j];
            }
        }
    }
}

/// Force a non-negative diagonal on `r` in `m = r * q`: `r <- r S`, `q <- S q`.
pub fn fix_rq_signs(r: &mut Mat2, q: &mut [[f64; 3]; 2]) {
    for k in 0..2 {
        if r[k][k] < 0.0 {
            for i in 0..2 {
                r[i][k] = -r[i][k];
            }
            for j in 0..3 {
                q[k][j] = -q[k][j];
            }
        }
    }
}
