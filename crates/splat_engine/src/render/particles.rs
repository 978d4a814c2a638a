//! Particle sets and GPU-facing attribute buffers
//!
//! [`ParticleSet`] owns the validated per-particle data, the static billboard
//! mesh, and the per-vertex attribute buffers the per-frame stages read.
//! Buffers are plain owned arrays rebuilt wholesale by an explicit
//! [`ParticleSet::rebuild`] / [`ParticleSet::update_visible_subset`] call;
//! there are no hidden attach-state flags and nothing mutates them
//! incrementally.

use log::debug;

use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::billboard::{generate_billboards, BillboardMesh, QUAD_CORNERS};
use crate::geometry::orientation::rotvecs_to_quatvecs;
use crate::geometry::{Points, Scalars, ShapeError, Vectors};

/// Interleaved per-vertex attribute layout for GPU upload.
///
/// `#[repr(C)]` with only `f32` fields, so the struct is padding-free and the
/// byte layout matches a tightly packed vertex buffer. Cast a
/// `&[SplatVertex]` with `bytemuck::cast_slice` for upload.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SplatVertex {
    /// Owning particle center (copied to all four corners)
    pub center: [f32; 3],
    /// Local corner offset, already scaled by particle size
    pub offset: [f32; 2],
    /// Texture coordinate in [0, 1]^2
    pub texcoord: [f32; 2],
    /// Anisotropy scales of the owning particle
    pub sigma: [f32; 3],
    /// Quaternion vector part of the owning particle orientation
    pub quatvec: [f32; 3],
    /// Scalar value driving color/intensity mapping
    pub value: f32,
}

/// Per-vertex-expanded attribute arrays consumed by the per-frame stages.
///
/// Holds either the full expansion (four vertices per particle) or, after
/// [`ParticleSet::update_visible_subset`], the expansion of exactly the
/// visible faces (three entries per face, six per fully visible particle).
#[derive(Debug, Clone, Default)]
pub struct AttributeBuffers {
    /// Particle centers, one per vertex
    pub centers: Vec<Vec3>,
    /// Local corner offsets, one per vertex
    pub offsets: Vec<Vec2>,
    /// Texture coordinates, one per vertex
    pub texcoords: Vec<Vec2>,
    /// Anisotropy scales, one per vertex
    pub sigmas: Vec<Vec3>,
    /// Quaternion vector parts, one per vertex
    pub quatvecs: Vec<Vec3>,
    /// Scalar values, one per vertex
    pub values: Vec<f32>,
}

impl AttributeBuffers {
    /// Number of vertices in the buffers.
    pub fn len(&self) -> usize {
        self.centers.len()
    }

    /// Whether the buffers are empty.
    pub fn is_empty(&self) -> bool {
        self.centers.is_empty()
    }

    /// Pack the columnar arrays into the interleaved GPU layout.
    pub fn interleaved(&self) -> Vec<SplatVertex> {
        (0..self.len())
            .map(|i| SplatVertex {
                center: self.centers[i].into(),
                offset: self.offsets[i].into(),
                texcoord: self.texcoords[i].into(),
                sigma: self.sigmas[i].into(),
                quatvec: self.quatvecs[i].into(),
                value: self.values[i],
            })
            .collect()
    }
}

/// Builder for [`ParticleSet`] following the loader contract: every
/// non-coordinate attribute is broadcastable from a scalar or single vector.
#[derive(Debug, Clone)]
pub struct ParticleSetBuilder {
    coords: Points,
    size: Scalars,
    sigma: Vectors,
    rotation: Vectors,
    values: Scalars,
}

impl ParticleSetBuilder {
    /// Start a builder with default size 10, isotropic sigma, zero rotation
    /// and unit values.
    pub fn new(coords: impl Into<Points>) -> Self {
        Self {
            coords: coords.into(),
            size: Scalars::Uniform(10.0),
            sigma: Vectors::Uniform(Vec3::new(1.0, 1.0, 1.0)),
            rotation: Vectors::Uniform(Vec3::zeros()),
            values: Scalars::Uniform(1.0),
        }
    }

    /// Particle sizes (world units of the quad edge).
    #[must_use]
    pub fn size(mut self, size: impl Into<Scalars>) -> Self {
        self.size = size.into();
        self
    }

    /// Relative anisotropy scales; a single scalar `s` means `(s, s, s)`.
    #[must_use]
    pub fn sigma(mut self, sigma: impl Into<Vectors>) -> Self {
        self.sigma = sigma.into();
        self
    }

    /// Axis-angle rotation vectors (encoded to quaternions at build time).
    #[must_use]
    pub fn rotation(mut self, rotation: impl Into<Vectors>) -> Self {
        self.rotation = rotation.into();
        self
    }

    /// Scalar values driving color/intensity mapping.
    #[must_use]
    pub fn values(mut self, values: impl Into<Scalars>) -> Self {
        self.values = values.into();
        self
    }

    /// Validate, broadcast and build the particle set.
    ///
    /// # Errors
    /// [`ShapeError`] when any per-particle array disagrees with the
    /// coordinate count; nothing is built in that case.
    pub fn build(self) -> Result<ParticleSet, ShapeError> {
        let n = self.coords.len();
        let size = self.size.resolve(n, "size")?;
        let sigma = self.sigma.resolve(n, "sigma")?;
        let rotation = self.rotation.resolve(n, "rotation")?;
        let values = self.values.resolve(n, "value")?;

        let coords = self.coords.to_spatial();
        let quatvecs = rotvecs_to_quatvecs(&rotation);
        let mesh = generate_billboards(&Points::Spatial(coords.clone()), &Scalars::PerParticle(size.clone()))?;

        let mut set = ParticleSet {
            coords,
            size,
            sigma,
            quatvecs,
            values,
            mesh,
            buffers: AttributeBuffers::default(),
        };
        set.rebuild();
        Ok(set)
    }
}

/// A renderable particle set: validated attributes, static quad mesh and the
/// currently published per-vertex buffers.
///
/// The particle count is fixed for the lifetime of one set; attribute values
/// may be replaced wholesale, which triggers a deterministic rebuild.
#[derive(Debug, Clone)]
pub struct ParticleSet {
    coords: Vec<Vec3>,
    size: Vec<f32>,
    sigma: Vec<Vec3>,
    quatvecs: Vec<Vec3>,
    values: Vec<f32>,
    mesh: BillboardMesh,
    buffers: AttributeBuffers,
}

impl ParticleSet {
    /// Number of particles.
    pub fn len(&self) -> usize {
        self.coords.len()
    }

    /// Whether the set is empty.
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// The static billboard mesh (vertices, faces, texcoords) for the host
    /// surface renderer.
    pub fn mesh(&self) -> &BillboardMesh {
        &self.mesh
    }

    /// The currently published per-vertex attribute buffers.
    pub fn buffers(&self) -> &AttributeBuffers {
        &self.buffers
    }

    /// Per-particle scalar values.
    pub fn values(&self) -> &[f32] {
        &self.values
    }

    /// Replace all per-particle values and republish the buffers.
    ///
    /// # Errors
    /// [`ShapeError`] on a length mismatch; the previous buffers stay
    /// published in that case.
    pub fn set_values(&mut self, values: impl Into<Scalars>) -> Result<(), ShapeError> {
        let resolved = values.into().resolve(self.len(), "value")?;
        self.values = resolved;
        self.rebuild();
        Ok(())
    }

    /// Replace all per-particle sizes, rebuild the mesh and republish the
    /// buffers.
    ///
    /// # Errors
    /// [`ShapeError`] on a length mismatch; the previous mesh and buffers
    /// stay published in that case.
    pub fn set_sizes(&mut self, size: impl Into<Scalars>) -> Result<(), ShapeError> {
        let resolved = size.into().resolve(self.len(), "size")?;
        self.size = resolved;
        self.mesh = generate_billboards(
            &Points::Spatial(self.coords.clone()),
            &Scalars::PerParticle(self.size.clone()),
        )?;
        self.rebuild();
        Ok(())
    }

    /// Rebuild the full per-vertex expansion (all particles visible).
    ///
    /// Deterministic: identical attributes produce identical buffers.
    pub fn rebuild(&mut self) {
        let n = self.len();
        let mut buffers = AttributeBuffers {
            centers: Vec::with_capacity(4 * n),
            offsets: Vec::with_capacity(4 * n),
            texcoords: Vec::with_capacity(4 * n),
            sigmas: Vec::with_capacity(4 * n),
            quatvecs: Vec::with_capacity(4 * n),
            values: Vec::with_capacity(4 * n),
        };
        for i in 0..n {
            for (k, corner) in QUAD_CORNERS.iter().enumerate() {
                buffers.centers.push(self.coords[i]);
                buffers
                    .offsets
                    .push(Vec2::new(self.size[i] * corner[0], self.size[i] * corner[1]));
                buffers.texcoords.push(self.mesh.texcoords[4 * i + k]);
                buffers.sigmas.push(self.sigma[i]);
                buffers.quatvecs.push(self.quatvecs[i]);
                buffers.values.push(self.values[i]);
            }
        }
        debug!("rebuilt attribute buffers: {} vertices", buffers.len());
        self.buffers = buffers;
    }

    /// Republish the buffers for exactly the given visible faces.
    ///
    /// `visible_faces` are indices into [`BillboardMesh::faces`]. Each face
    /// contributes its three vertices, so the cost is proportional to the
    /// visible count, never the total count. An empty subset skips the
    /// update and leaves the previous buffers published. Out-of-range face
    /// indices are ignored.
    pub fn update_visible_subset(&mut self, visible_faces: &[u32]) {
        if visible_faces.is_empty() {
            debug!("visible subset empty, skipping buffer update");
            return;
        }

        let mut buffers = AttributeBuffers {
            centers: Vec::with_capacity(3 * visible_faces.len()),
            offsets: Vec::with_capacity(3 * visible_faces.len()),
            texcoords: Vec::with_capacity(3 * visible_faces.len()),
            sigmas: Vec::with_capacity(3 * visible_faces.len()),
            quatvecs: Vec::with_capacity(3 * visible_faces.len()),
            values: Vec::with_capacity(3 * visible_faces.len()),
        };
        for &f in visible_faces {
            let Some(face) = self.mesh.faces.get(f as usize) else {
                continue;
            };
            for &idx in face {
                let v = idx as usize;
                let particle = v / 4;
                let corner = QUAD_CORNERS[v % 4];
                buffers.centers.push(self.coords[particle]);
                buffers.offsets.push(Vec2::new(
                    self.size[particle] * corner[0],
                    self.size[particle] * corner[1],
                ));
                buffers.texcoords.push(self.mesh.texcoords[v]);
                buffers.sigmas.push(self.sigma[particle]);
                buffers.quatvecs.push(self.quatvecs[particle]);
                buffers.values.push(self.values[particle]);
            }
        }
        debug!(
            "updated visible subset: {} faces, {} vertices",
            visible_faces.len(),
            buffers.len()
        );
        self.buffers = buffers;
    }

    /// Data extent as `(min, max)` corners of `coords +- size/2` on the two
    /// quad-spanning axes (the leading axis extends by the bare coordinate).
    ///
    /// `None` for an empty set. Hosts use this to frame the camera.
    pub fn extent(&self) -> Option<(Vec3, Vec3)> {
        if self.is_empty() {
            return None;
        }
        let mut min = Vec3::repeat(f32::INFINITY);
        let mut max = Vec3::repeat(f32::NEG_INFINITY);
        for (c, s) in self.coords.iter().zip(&self.size) {
            let half = Vec3::new(0.0, 0.5 * s, 0.5 * s);
            min = min.inf(&(c - half));
            max = max.sup(&(c + half));
        }
        Some((min, max))
    }
}
