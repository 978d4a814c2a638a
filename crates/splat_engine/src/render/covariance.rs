//! Screen-space covariance projection
//!
//! Turns a particle's anisotropy (`sigma`) and orientation (quaternion vector
//! part) into the inverse 2x2 screen-space covariance matrix the anisotropic
//! shading profile evaluates per fragment. Recomputed whenever the camera or
//! the particle orientation changes; never stored across frames.

use log::warn;

use crate::foundation::math::{Mat2, Mat3, Mat4, Vec3, Vec4};
use crate::geometry::orientation::quatvec_to_matrix;
use crate::render::camera::CameraFrame;

/// Determinants below this are treated as singular and fall back to the
/// isotropic case instead of propagating NaN into shading.
pub const MIN_DETERMINANT: f32 = 1e-12;

/// Oriented 3-D covariance of a particle: `Q^T * diag(sqrt(sigma)) * Q`.
pub fn oriented_covariance(sigma: Vec3, quatvec: Vec3) -> Mat3 {
    let rot = quatvec_to_matrix(quatvec);
    let diag = Mat3::from_diagonal(&Vec3::new(
        sigma.x.max(0.0).sqrt(),
        sigma.y.max(0.0).sqrt(),
        sigma.z.max(0.0).sqrt(),
    ));
    rot.transpose() * diag * rot
}

/// Project a particle's covariance ellipsoid to the inverse 2x2 screen-space
/// covariance.
///
/// The covariance's action on the three world axes is pushed through camera
/// space, the three images assembled into a 3x3 basis, and the leading 2x2
/// block of the transformed covariance inverted in closed form. A singular
/// block falls back to the identity (isotropic shading) for that particle.
pub fn project_covariance(frame: &CameraFrame, sigma: Vec3, quatvec: Vec3) -> Mat2 {
    let cov3 = oriented_covariance(sigma, quatvec);
    let cov4: Mat4 = cov3.to_homogeneous();

    let ex = axis_image(frame, &cov4, Vec4::new(1.0, 0.0, 0.0, 0.0));
    let ey = axis_image(frame, &cov4, Vec4::new(0.0, 1.0, 0.0, 0.0));
    let ez = axis_image(frame, &cov4, Vec4::new(0.0, 0.0, 1.0, 0.0));

    let basis = Mat3::from_columns(&[ex, ey, ez]);
    let screen = basis.transpose() * cov3 * basis;
    let block = Mat2::new(
        screen[(0, 0)],
        screen[(0, 1)],
        screen[(1, 0)],
        screen[(1, 1)],
    );

    invert_2x2(&block).unwrap_or_else(|| {
        warn!("singular screen covariance (det below {MIN_DETERMINANT:e}), using isotropic fallback");
        Mat2::identity()
    })
}

/// Image of one world axis under `view * cov * view_inv`.
fn axis_image(frame: &CameraFrame, cov4: &Mat4, axis: Vec4) -> Vec3 {
    (frame.view * (cov4 * (frame.view_inv * axis))).xyz()
}

/// Closed-form 2x2 inverse, `adj(M) / det(M)`; `None` when singular.
pub fn invert_2x2(m: &Mat2) -> Option<Mat2> {
    let det = m[(0, 0)] * m[(1, 1)] - m[(0, 1)] * m[(1, 0)];
    if det.abs() < MIN_DETERMINANT {
        return None;
    }
    Some(Mat2::new(m[(1, 1)], -m[(0, 1)], -m[(1, 0)], m[(0, 0)]) / det)
}
