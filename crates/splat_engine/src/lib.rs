//! # Splat Engine
//!
//! A billboarded particle renderer core: turns large point sets (10^3 to 10^6
//! particles) into camera-facing quads whose on-screen footprint approximates an
//! oriented, anisotropic 3-D Gaussian or another analytic splat profile.
//!
//! ## Features
//!
//! - **Billboard Geometry**: Point cloud + sizes to quad vertices/faces/texcoords
//! - **Orientation Encoding**: Rotation vectors to compact unit quaternions
//! - **Screen-Space Covariance**: Projected 2x2 covariance for anisotropic shading
//! - **Distance LOD**: Size-locking with intensity compensation for sub-pixel splats
//! - **Shading Profiles**: Fixed registry of analytic intensity functions
//!
//! ## Quick Start
//!
//! ```rust
//! use splat_engine::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let coords = vec![Vec3::new(0.0, 0.0, 0.0), Vec3::new(0.0, 4.0, 2.0)];
//!     let particles = ParticleSetBuilder::new(Points::Spatial(coords))
//!         .size(2.0)
//!         .build()?;
//!
//!     let camera = Camera::perspective(Vec3::new(0.0, 0.0, 20.0), 45.0, 16.0 / 9.0, 0.1, 100.0);
//!     let pipeline = SplatPipeline::from_parts(ShadingProfile::Gaussian, 0.05);
//!     let frame = camera.frame()?;
//!     let outputs = pipeline.process_frame(&frame, particles.buffers());
//!     assert_eq!(outputs.len(), particles.buffers().len());
//!     Ok(())
//! }
//! ```
//!
//! The host renderer owns the camera lifecycle and the actual draw; this crate
//! supplies the mesh, the per-vertex attribute buffers, and the vertex/fragment
//! stage math as plain functions over those buffers.

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod config;
pub mod foundation;
pub mod geometry;
pub mod render;

/// Common imports for engine users
pub mod prelude {
    pub use crate::config::{ConfigError, SplatConfig};
    pub use crate::foundation::math::{Mat2, Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
    pub use crate::geometry::{
        billboard::{generate_billboards, BillboardMesh},
        orientation::{quatvec_real, rotvec_to_quatvec},
        Points, Scalars, ShapeError, Vectors,
    };
    pub use crate::render::{
        camera::{Camera, CameraFrame},
        particles::{AttributeBuffers, ParticleSet, ParticleSetBuilder, SplatVertex},
        pipeline::{FrameVertex, SplatPipeline},
        shading::{FragmentStage, ShadingProfile},
        RenderError,
    };
}
