//! 3D camera and per-frame transform snapshot
//!
//! The camera is a collaborator of the splat core rather than part of it: the
//! billboard stages only need the forward and inverse view/projection
//! transforms. [`Camera`] is a convenience implementation; hosts with their
//! own camera can build a [`CameraFrame`] directly from matrices.

use log::warn;

use crate::foundation::math::{transform_direction, Mat4, Point3, Vec3};
use crate::render::RenderError;

/// Camera basis vectors shorter than this are considered degenerate and
/// replaced by world axes for the frame.
const MIN_BASIS_LENGTH: f32 = 1e-12;

/// 3D camera for perspective projection
///
/// Uses a standard right-handed Y-up coordinate system. Matrix calculations
/// are performed on demand; [`Camera::frame`] captures everything the
/// per-frame stages need in one snapshot.
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Point the camera is looking at in world space
    pub target: Vec3,
    /// Up vector for camera orientation (typically [0, 1, 0])
    pub up: Vec3,
    /// Field of view angle in radians
    pub fov: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
    /// Distance to near clipping plane
    pub near: f32,
    /// Distance to far clipping plane
    pub far: f32,
}

impl Camera {
    /// Create a new perspective camera looking at the origin with Y-up
    /// orientation.
    pub fn perspective(position: Vec3, fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position,
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: fov_degrees.to_radians(),
            aspect,
            near,
            far,
        }
    }

    /// Update camera position in world space.
    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    /// Point the camera at a target with a custom up vector.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        self.target = target;
        self.up = up;
    }

    /// Update the aspect ratio after a viewport resize.
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        self.aspect = aspect;
    }

    /// World-to-camera view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(
            &Point3::from(self.position),
            &Point3::from(self.target),
            &self.up,
        )
    }

    /// Perspective projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::new_perspective(self.aspect, self.fov, self.near, self.far)
    }

    /// Combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Capture the per-frame transform snapshot for the billboard stages.
    ///
    /// # Errors
    /// [`RenderError::DegenerateGeometry`] when the view or view-projection
    /// matrix is not invertible.
    pub fn frame(&self) -> Result<CameraFrame, RenderError> {
        CameraFrame::from_matrices(self.view_matrix(), self.projection_matrix())
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 3.0, 3.0),
            target: Vec3::zeros(),
            up: Vec3::new(0.0, 1.0, 0.0),
            fov: std::f32::consts::FRAC_PI_4,
            aspect: 16.0 / 9.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Per-frame camera state consumed by the vertex and covariance stages.
///
/// Recomputed whenever the camera changes, which in practice means every
/// frame. The right/up basis is the image of the world X/Y axes under the
/// inverse view transform; its shared magnitude before normalization encodes
/// the current zoom scale.
#[derive(Debug, Clone)]
pub struct CameraFrame {
    /// World-to-camera view matrix
    pub view: Mat4,
    /// Camera-to-world inverse view matrix
    pub view_inv: Mat4,
    /// Full world-to-clip transform
    pub view_projection: Mat4,
    /// Clip-to-world inverse transform
    pub view_projection_inv: Mat4,
    /// Unnormalized camera right vector in world space
    pub camera_right: Vec3,
    /// Unnormalized camera up vector in world space
    pub camera_up: Vec3,
    /// Shared magnitude of the basis vectors; 1.0 for unscaled views
    pub zoom: f32,
}

impl CameraFrame {
    /// Build a frame snapshot from explicit view and projection matrices.
    ///
    /// # Errors
    /// [`RenderError::DegenerateGeometry`] when either matrix chain cannot be
    /// inverted.
    pub fn from_matrices(view: Mat4, projection: Mat4) -> Result<Self, RenderError> {
        let view_projection = projection * view;
        let view_projection_inv = view_projection.try_inverse().ok_or_else(|| {
            RenderError::DegenerateGeometry("view-projection matrix is not invertible".into())
        })?;
        let view_inv = view
            .try_inverse()
            .ok_or_else(|| RenderError::DegenerateGeometry("view matrix is not invertible".into()))?;

        let mut camera_right = transform_direction(&view_inv, Vec3::new(1.0, 0.0, 0.0));
        let mut camera_up = transform_direction(&view_inv, Vec3::new(0.0, 1.0, 0.0));
        let mut zoom = camera_right.norm();
        if zoom < MIN_BASIS_LENGTH {
            // Recoverable: fall back to world axes rather than aborting the frame.
            warn!("camera basis degenerate (|right| = {zoom:e}), falling back to world axes");
            camera_right = Vec3::new(1.0, 0.0, 0.0);
            camera_up = Vec3::new(0.0, 1.0, 0.0);
            zoom = 1.0;
        }

        Ok(Self {
            view,
            view_inv,
            view_projection,
            view_projection_inv,
            camera_right,
            camera_up,
            zoom,
        })
    }

    /// Normalized camera right vector.
    pub fn right_normalized(&self) -> Vec3 {
        self.camera_right / self.zoom
    }

    /// Normalized camera up vector.
    pub fn up_normalized(&self) -> Vec3 {
        self.camera_up / self.zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::transform_point;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_identity_view_basis() {
        let frame = CameraFrame::from_matrices(Mat4::identity(), Mat4::identity()).unwrap();
        assert_relative_eq!(frame.camera_right, Vec3::new(1.0, 0.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(frame.camera_up, Vec3::new(0.0, 1.0, 0.0), epsilon = EPSILON);
        assert_relative_eq!(frame.zoom, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_scaled_view_encodes_zoom() {
        // A view that scales by 0.5 has an inverse scaling by 2: zoomed out.
        let view = Mat4::new_nonuniform_scaling(&Vec3::new(0.5, 0.5, 0.5));
        let frame = CameraFrame::from_matrices(view, Mat4::identity()).unwrap();
        assert_relative_eq!(frame.zoom, 2.0, epsilon = EPSILON);
        assert_relative_eq!(frame.right_normalized().norm(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_degenerate_projection_is_an_error() {
        let err = CameraFrame::from_matrices(Mat4::identity(), Mat4::zeros()).unwrap_err();
        assert!(matches!(err, RenderError::DegenerateGeometry(_)));
    }

    #[test]
    fn test_view_projection_round_trip() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 45.0, 1.0, 0.1, 100.0);
        let frame = camera.frame().unwrap();
        let p = Vec3::new(1.0, -2.0, 3.0);
        let clip = transform_point(&frame.view_projection, p);
        let back = frame.view_projection_inv * clip;
        let back3 = back.xyz() / back.w;
        assert_relative_eq!(back3, p, epsilon = 1e-3);
    }

    #[test]
    fn test_camera_looks_down_negative_z_by_default() {
        let camera = Camera::perspective(Vec3::new(0.0, 0.0, 10.0), 45.0, 1.0, 0.1, 100.0);
        let view = camera.view_matrix();
        // the origin target ends up in front of the camera (negative z in view space)
        let v = transform_point(&view, Vec3::zeros());
        assert!(v.z < 0.0);
    }
}
