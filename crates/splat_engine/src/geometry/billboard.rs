//! Billboard quad generation
//!
//! Expands a point set plus per-particle sizes into the static quad mesh
//! consumed by the host surface renderer: four vertices, two triangles and
//! four texture coordinates per particle.
//!
//! Vertex positions follow the (depth, y, x) axis convention from
//! [`crate::geometry::Points`]: the quad corner offsets occupy the two
//! trailing components and the leading component carries the particle's extra
//! depth/time coordinate, broadcast across the four corners. The in-plane
//! particle center is deliberately *not* baked into the vertex position; the
//! camera-facing vertex stage reconstructs the final position from the
//! per-vertex center attribute every frame.

use log::debug;

use crate::foundation::math::{Vec2, Vec3};
use crate::geometry::{Points, Scalars, ShapeError};

/// Unit square corner offsets, scaled by particle size at build time.
pub const QUAD_CORNERS: [[f32; 2]; 4] = [[-0.5, -0.5], [0.5, -0.5], [0.5, 0.5], [-0.5, 0.5]];

/// Canonical texture coordinates matching [`QUAD_CORNERS`] order.
pub const QUAD_TEXCOORDS: [[f32; 2]; 4] = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];

/// Static billboard mesh for a particle set.
///
/// For `n` particles: `4n` vertices, `2n` faces, `4n` texture coordinates.
/// Vertices of particle `i` are contiguous at indices `4i..4i+4` and its two
/// faces reference only that block.
#[derive(Debug, Clone, PartialEq)]
pub struct BillboardMesh {
    /// Quad vertex positions, (depth, offset.y, offset.x) per the module docs
    pub vertices: Vec<Vec3>,
    /// Triangle indices, two faces per particle
    pub faces: Vec<[u32; 3]>,
    /// Texture coordinates in [0, 1]^2
    pub texcoords: Vec<Vec2>,
}

impl BillboardMesh {
    /// Number of particles this mesh was built for.
    pub fn particle_count(&self) -> usize {
        self.vertices.len() / 4
    }
}

/// Generate the billboard quad mesh for a point set.
///
/// `size` is either one value broadcast to every particle or one value per
/// particle; a length mismatch is a [`ShapeError`] and nothing is built.
/// Zero-sized particles produce four coincident vertices, which is valid
/// geometry with zero screen footprint.
///
/// Rebuilding with identical inputs yields identical output.
pub fn generate_billboards(coords: &Points, size: &Scalars) -> Result<BillboardMesh, ShapeError> {
    let n = coords.len();
    let sizes = size.resolve(n, "size")?;
    let spatial = coords.to_spatial();

    let mut vertices = Vec::with_capacity(4 * n);
    let mut faces = Vec::with_capacity(2 * n);
    let mut texcoords = Vec::with_capacity(4 * n);

    for (i, (center, s)) in spatial.iter().zip(&sizes).enumerate() {
        for corner in &QUAD_CORNERS {
            vertices.push(Vec3::new(center.x, s * corner[0], s * corner[1]));
        }
        for tc in &QUAD_TEXCOORDS {
            texcoords.push(Vec2::new(tc[0], tc[1]));
        }
        let i0 = u32::try_from(4 * i).unwrap_or(u32::MAX);
        faces.push([i0, i0 + 1, i0 + 2]);
        faces.push([i0, i0 + 3, i0 + 2]);
    }

    debug!(
        "generated billboard mesh: {} particles, {} vertices, {} faces",
        n,
        vertices.len(),
        faces.len()
    );

    Ok(BillboardMesh {
        vertices,
        faces,
        texcoords,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    fn spatial(coords: Vec<Vec3>) -> Points {
        Points::Spatial(coords)
    }

    #[test]
    fn test_vertex_and_face_counts() {
        for n in [0usize, 1, 3, 17] {
            let coords = spatial(vec![Vec3::new(0.0, 1.0, 2.0); n]);
            let mesh = generate_billboards(&coords, &Scalars::Uniform(1.0)).unwrap();
            assert_eq!(mesh.vertices.len(), 4 * n);
            assert_eq!(mesh.faces.len(), 2 * n);
            assert_eq!(mesh.texcoords.len(), 4 * n);
            assert_eq!(mesh.particle_count(), n);
        }
    }

    #[test]
    fn test_faces_stay_within_their_particle_block() {
        let coords = spatial(vec![Vec3::zeros(); 5]);
        let mesh = generate_billboards(&coords, &Scalars::Uniform(1.0)).unwrap();
        for (f, face) in mesh.faces.iter().enumerate() {
            let particle = f / 2;
            let lo = u32::try_from(4 * particle).unwrap();
            for &idx in face {
                assert!(idx >= lo && idx < lo + 4, "face {f} index {idx} escapes particle {particle}");
            }
        }
    }

    #[test]
    fn test_single_particle_scenario() {
        // coords=[(0,0,0)], size=2: a 2x2 quad centered at origin
        let mesh =
            generate_billboards(&spatial(vec![Vec3::zeros()]), &Scalars::Uniform(2.0)).unwrap();
        let expected = [
            Vec3::new(0.0, -1.0, -1.0),
            Vec3::new(0.0, 1.0, -1.0),
            Vec3::new(0.0, 1.0, 1.0),
            Vec3::new(0.0, -1.0, 1.0),
        ];
        for (v, e) in mesh.vertices.iter().zip(&expected) {
            assert_relative_eq!(v, e, epsilon = EPSILON);
        }
        assert_eq!(mesh.faces, vec![[0, 1, 2], [0, 3, 2]]);
        let expected_tc = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        for (tc, e) in mesh.texcoords.iter().zip(&expected_tc) {
            assert_relative_eq!(tc, e, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_planar_coords_pad_leading_axis() {
        let mesh = generate_billboards(
            &Points::Planar(vec![Vec2::new(5.0, 7.0)]),
            &Scalars::Uniform(1.0),
        )
        .unwrap();
        for v in &mesh.vertices {
            assert_relative_eq!(v.x, 0.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_extra_coordinate_broadcast_across_corners() {
        let mesh = generate_billboards(
            &spatial(vec![Vec3::new(9.0, 1.0, 2.0)]),
            &Scalars::Uniform(1.0),
        )
        .unwrap();
        for v in &mesh.vertices {
            assert_relative_eq!(v.x, 9.0, epsilon = EPSILON);
        }
    }

    #[test]
    fn test_rebuild_is_deterministic() {
        let coords = spatial(vec![Vec3::new(1.0, 2.0, 3.0), Vec3::new(-4.0, 0.5, 0.0)]);
        let size = Scalars::PerParticle(vec![1.0, 3.0]);
        let a = generate_billboards(&coords, &size).unwrap();
        let b = generate_billboards(&coords, &size).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_zero_size_yields_coincident_vertices() {
        let mesh = generate_billboards(
            &spatial(vec![Vec3::new(0.0, 3.0, 4.0)]),
            &Scalars::Uniform(0.0),
        )
        .unwrap();
        for v in &mesh.vertices {
            assert!(v.iter().all(|c| c.is_finite()));
            assert_relative_eq!(v, &Vec3::new(0.0, 0.0, 0.0), epsilon = EPSILON);
        }
    }

    #[test]
    fn test_size_length_mismatch() {
        let coords = spatial(vec![Vec3::zeros(); 3]);
        let err = generate_billboards(&coords, &Scalars::PerParticle(vec![1.0])).unwrap_err();
        assert!(matches!(err, ShapeError::LengthMismatch { name: "size", .. }));
    }
}
