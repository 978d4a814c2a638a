//! Math utilities and types
//!
//! Provides fundamental math types for the billboard and splat pipeline.

pub use nalgebra::{Matrix2, Matrix3, Matrix4, Quaternion, Unit, Vector2, Vector3, Vector4};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 3D vector type
pub type Vec3 = Vector3<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 2x2 matrix type
pub type Mat2 = Matrix2<f32>;

/// 3x3 matrix type
pub type Mat3 = Matrix3<f32>;

/// 4x4 matrix type
pub type Mat4 = Matrix4<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// 3D point type
pub type Point3 = nalgebra::Point3<f32>;

/// Quaternion type for rotations
pub type Quat = Unit<Quaternion<f32>>;

/// Apply a homogeneous transform to a 3D point (w = 1), without the divide.
///
/// The caller decides what to do with the resulting `w` component; the
/// billboard stages need both the raw clip coordinates and the divided
/// normalized device coordinates.
#[inline]
pub fn transform_point(m: &Mat4, p: Vec3) -> Vec4 {
    m * Vec4::new(p.x, p.y, p.z, 1.0)
}

/// Apply a homogeneous transform to a direction (w = 0).
#[inline]
pub fn transform_direction(m: &Mat4, d: Vec3) -> Vec3 {
    (m * Vec4::new(d.x, d.y, d.z, 0.0)).xyz()
}
