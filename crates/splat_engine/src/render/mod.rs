//! Per-frame rendering stages
//!
//! The camera-dependent half of the pipeline: the camera frame snapshot, the
//! camera-facing vertex stage, the screen-space covariance projection, the
//! shading profile registry and the particle set that owns the GPU-facing
//! attribute buffers.
//!
//! Everything here is frame-synchronous and single threaded; per-particle
//! numerical degeneracies (zero distance, singular covariance) are clamped
//! locally so one bad particle never aborts a frame.

pub mod camera;
pub mod covariance;
pub mod facing;
pub mod particles;
pub mod pipeline;
pub mod shading;

use thiserror::Error;

/// Rendering errors
#[derive(Error, Debug)]
pub enum RenderError {
    /// Requested shading profile name is not registered.
    ///
    /// Raised at construction time, never at render time.
    #[error("unknown shading profile: '{0}'")]
    UnknownProfile(String),

    /// A camera transform could not be derived (non-invertible matrix).
    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),
}
