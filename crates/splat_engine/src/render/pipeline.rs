//! Per-frame splat pipeline
//!
//! Bundles the vertex stage, the covariance projection and the fragment
//! stage into the two callbacks the renderer contract asks for, and runs the
//! vertex half over a whole attribute buffer in one frame-synchronous pass.

use log::trace;

use crate::config::SplatConfig;
use crate::foundation::math::{Mat2, Vec2, Vec4};
use crate::render::camera::CameraFrame;
use crate::render::covariance::project_covariance;
use crate::render::facing::VertexStage;
use crate::render::particles::AttributeBuffers;
use crate::render::shading::{FragmentStage, ShadingProfile};
use crate::render::RenderError;

/// Everything the fragment stage needs, computed per vertex per frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameVertex {
    /// Clip-space position
    pub clip_position: Vec4,
    /// Forced fragment depth from the projected particle center
    pub depth: f32,
    /// LOD intensity scale (1.0 when not size-locked)
    pub scale_intensity: f32,
    /// Texture coordinate
    pub texcoord: Vec2,
    /// Inverse screen-space covariance of the owning particle
    pub covariance_inv: Mat2,
    /// Scalar value for color mapping
    pub value: f32,
}

/// The complete splat pipeline: profile, LOD threshold and tunables, fixed
/// at construction.
#[derive(Debug, Clone, Copy)]
pub struct SplatPipeline {
    vertex_stage: VertexStage,
    fragment_stage: FragmentStage,
}

impl SplatPipeline {
    /// Build a pipeline from a parsed configuration.
    ///
    /// # Errors
    /// [`RenderError::UnknownProfile`] when the configured profile name is
    /// not registered.
    pub fn new(config: &SplatConfig) -> Result<Self, RenderError> {
        let profile = ShadingProfile::from_name(&config.profile)?;
        Ok(Self {
            vertex_stage: VertexStage::new(config.antialias),
            fragment_stage: FragmentStage::new(profile)
                .with_distance_intensity(config.distance_intensity_increase),
        })
    }

    /// Build a pipeline directly from a profile and antialias threshold.
    pub fn from_parts(profile: ShadingProfile, antialias: f32) -> Self {
        Self {
            vertex_stage: VertexStage::new(antialias),
            fragment_stage: FragmentStage::new(profile),
        }
    }

    /// The vertex stage (the renderer contract's vertex hook).
    pub fn vertex_stage(&self) -> &VertexStage {
        &self.vertex_stage
    }

    /// The fragment stage (the renderer contract's fragment hook).
    pub fn fragment_stage(&self) -> &FragmentStage {
        &self.fragment_stage
    }

    /// Run the per-vertex half of the pipeline over the published buffers.
    ///
    /// Returns one [`FrameVertex`] per buffer entry; an empty buffer yields
    /// an empty frame (the "skip this frame" case). Single-threaded and
    /// allocation-bounded by the visible vertex count.
    pub fn process_frame(&self, frame: &CameraFrame, buffers: &AttributeBuffers) -> Vec<FrameVertex> {
        if buffers.is_empty() {
            return Vec::new();
        }
        trace!("processing frame: {} vertices", buffers.len());

        (0..buffers.len())
            .map(|i| {
                let out = self.vertex_stage.transform(
                    frame,
                    buffers.centers[i],
                    buffers.offsets[i],
                    buffers.texcoords[i],
                );
                let covariance_inv =
                    project_covariance(frame, buffers.sigmas[i], buffers.quatvecs[i]);
                FrameVertex {
                    clip_position: out.clip_position,
                    depth: out.depth,
                    scale_intensity: out.scale_intensity,
                    texcoord: out.texcoord,
                    covariance_inv,
                    value: buffers.values[i],
                }
            })
            .collect()
    }

    /// Shade one fragment of a processed vertex (see
    /// [`FragmentStage::shade`]).
    pub fn shade(&self, local: Vec2, vertex: &FrameVertex) -> Option<f32> {
        self.fragment_stage
            .shade(local, &vertex.covariance_inv, vertex.scale_intensity, 0.0)
    }
}
