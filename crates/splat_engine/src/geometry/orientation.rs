//! Orientation encoding
//!
//! Particles carry their orientation as an axis-angle rotation vector
//! (direction = axis, magnitude = angle). For the GPU-facing buffers this is
//! converted once into the imaginary part of a unit quaternion; the real part
//! is cheap to reconstruct wherever it is needed, so only three floats travel
//! per vertex.
//!
//! Callers must keep the vector part within unit length; the reconstruction
//! clamps at zero so an out-of-range input degrades to a half-turn rather
//! than a NaN.

use crate::foundation::math::{Mat3, Quat, Quaternion, Unit, Vec3};

/// Rotation angles below this are treated as the identity, avoiding a
/// division by a near-zero norm.
pub const MIN_ROTATION_ANGLE: f32 = 1e-8;

/// Convert an axis-angle rotation vector to the quaternion vector part.
///
/// The angle is the vector norm and the axis its direction. A zero (or
/// near-zero) vector maps to the identity rotation, whose vector part is
/// `(0, 0, 0)`.
pub fn rotvec_to_quatvec(rotvec: Vec3) -> Vec3 {
    let angle = rotvec.norm();
    if angle < MIN_ROTATION_ANGLE {
        return Vec3::zeros();
    }
    rotvec * ((0.5 * angle).sin() / angle)
}

/// Batch form of [`rotvec_to_quatvec`].
pub fn rotvecs_to_quatvecs(rotvecs: &[Vec3]) -> Vec<Vec3> {
    rotvecs.iter().map(|&r| rotvec_to_quatvec(r)).collect()
}

/// Reconstruct the real (scalar) part of a unit quaternion from its vector
/// part: `w = sqrt(max(0, 1 - |xyz|^2))`.
pub fn quatvec_real(quatvec: Vec3) -> f32 {
    (1.0 - quatvec.norm_squared()).max(0.0).sqrt()
}

/// Rebuild the full unit quaternion from its stored vector part.
pub fn quatvec_to_quat(quatvec: Vec3) -> Quat {
    Unit::new_unchecked(Quaternion::new(
        quatvec_real(quatvec),
        quatvec.x,
        quatvec.y,
        quatvec.z,
    ))
}

/// Rotation matrix of the quaternion encoded by `quatvec`.
pub fn quatvec_to_matrix(quatvec: Vec3) -> Mat3 {
    quatvec_to_quat(quatvec).to_rotation_matrix().into_inner()
}

/// Compose two rotations given as quaternion vector parts, returning the
/// vector part of the product `p * q`.
pub fn quatvec_multiply(p: Vec3, q: Vec3) -> Vec3 {
    let pw = quatvec_real(p);
    let qw = quatvec_real(q);
    pw * q + qw * p + p.cross(&q)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_zero_rotation_is_identity() {
        let qv = rotvec_to_quatvec(Vec3::zeros());
        assert_relative_eq!(qv, Vec3::zeros(), epsilon = EPSILON);
        assert_relative_eq!(quatvec_real(qv), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_tiny_rotation_does_not_divide_by_zero() {
        let qv = rotvec_to_quatvec(Vec3::new(1e-12, 0.0, 0.0));
        assert!(qv.iter().all(|c| c.is_finite()));
        assert_relative_eq!(qv, Vec3::zeros(), epsilon = EPSILON);
    }

    #[test]
    fn test_quarter_turn_about_z() {
        let qv = rotvec_to_quatvec(Vec3::new(0.0, 0.0, FRAC_PI_2));
        assert_relative_eq!(qv, Vec3::new(0.0, 0.0, FRAC_PI_4.sin()), epsilon = EPSILON);
        assert_relative_eq!(quatvec_real(qv), FRAC_PI_4.cos(), epsilon = EPSILON);
    }

    #[test]
    fn test_matrix_rotates_vector() {
        // quarter turn about z sends x to y
        let m = quatvec_to_matrix(rotvec_to_quatvec(Vec3::new(0.0, 0.0, FRAC_PI_2)));
        let rotated = m * Vec3::new(1.0, 0.0, 0.0);
        assert_relative_eq!(rotated, Vec3::new(0.0, 1.0, 0.0), epsilon = 1e-5);
    }

    #[test]
    fn test_multiply_with_identity() {
        let qv = rotvec_to_quatvec(Vec3::new(0.3, -0.2, 0.9));
        assert_relative_eq!(quatvec_multiply(qv, Vec3::zeros()), qv, epsilon = EPSILON);
        assert_relative_eq!(quatvec_multiply(Vec3::zeros(), qv), qv, epsilon = EPSILON);
    }

    #[test]
    fn test_multiply_matches_double_angle() {
        let half = rotvec_to_quatvec(Vec3::new(0.0, 0.0, FRAC_PI_4));
        let full = rotvec_to_quatvec(Vec3::new(0.0, 0.0, FRAC_PI_2));
        assert_relative_eq!(quatvec_multiply(half, half), full, epsilon = EPSILON);
    }

    #[test]
    fn test_overlong_vector_part_clamps() {
        let w = quatvec_real(Vec3::new(0.8, 0.8, 0.8));
        assert_relative_eq!(w, 0.0, epsilon = EPSILON);
    }
}
