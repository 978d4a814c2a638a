//! Camera-facing vertex stage
//!
//! Runs once per visible vertex per frame: orients the quad toward the
//! camera, measures the billboard's on-screen size and applies the
//! distance-based level-of-detail rule. When a particle shrinks below the
//! configured `antialias` threshold its apparent size is frozen and the
//! overshoot is reported as `scale_intensity`, which the fragment stage uses
//! to dim the splat (`freeze-without-resample` policy: texture coordinates
//! are left untouched and the compensation happens entirely in shading).
//!
//! Depth is taken from the projected particle *center*, not the quad corner,
//! so overlapping billboards depth-sort by their true centers.

use crate::foundation::math::{transform_point, Vec2, Vec3, Vec4};
use crate::render::camera::CameraFrame;

/// Minimum on-screen distance used when computing the LOD scale factor, so a
/// particle exactly behind the center never divides by zero.
pub const MIN_SCREEN_DISTANCE: f32 = 1e-6;

/// Per-vertex outputs of the camera-facing stage.
///
/// Matches what the host renderer's vertex shader hook is expected to write:
/// clip-space position, a forced fragment depth, and the LOD intensity scale
/// consumed by the shading stage.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexOutput {
    /// Clip-space position of this quad corner
    pub clip_position: Vec4,
    /// Fragment depth, from the projected particle center (`z/w`)
    pub depth: f32,
    /// LOD scale factor; 1.0 when the particle was not size-locked
    pub scale_intensity: f32,
    /// Texture coordinate, passed through unmodified
    pub texcoord: Vec2,
}

/// Camera-facing billboard transform with a configurable LOD threshold.
///
/// `antialias` is the on-screen size (in normalized device units) below which
/// a particle is size-locked; `0.0` disables the behavior entirely.
#[derive(Debug, Clone, Copy)]
pub struct VertexStage {
    antialias: f32,
}

impl VertexStage {
    /// Create a vertex stage with the given antialias threshold.
    pub fn new(antialias: f32) -> Self {
        Self { antialias }
    }

    /// The configured antialias threshold.
    pub fn antialias(&self) -> f32 {
        self.antialias
    }

    /// Transform one quad vertex for the current frame.
    ///
    /// `center` is the owning particle's position, `offset` the stored local
    /// corner offset (already scaled by particle size).
    pub fn transform(
        &self,
        frame: &CameraFrame,
        center: Vec3,
        offset: Vec2,
        texcoord: Vec2,
    ) -> VertexOutput {
        let mut right = frame.right_normalized();
        let mut up = frame.up_normalized();
        let mut scale_intensity = 1.0;

        // On-screen size of the billboard: distance in NDC between the
        // camera-facing corner candidate and the bare center.
        let candidate = center + right * offset.x + up * offset.y;
        let p1 = transform_point(&frame.view_projection, candidate);
        let p2 = transform_point(&frame.view_projection, center);
        let dist = (p1.xy() / p1.w - p2.xy() / p2.w).norm();

        if self.antialias > 0.0 && dist.is_finite() && dist < self.antialias {
            // Too small to sample the profile: freeze the apparent size and
            // let the fragment stage compensate the brightness.
            let scale = self.antialias / dist.max(MIN_SCREEN_DISTANCE);
            right *= scale;
            up *= scale;
            scale_intensity = scale;
        }

        let position = center + right * offset.x + up * offset.y;
        let clip_position = transform_point(&frame.view_projection, position);
        let depth = p2.z / p2.w;

        VertexOutput {
            clip_position,
            depth,
            scale_intensity,
            texcoord,
        }
    }
}
