//! Static particle geometry
//!
//! Everything here is camera independent: billboard quad generation and the
//! compact quaternion encoding of per-particle orientations. The per-frame,
//! camera-dependent stages live in [`crate::render`].

pub mod billboard;
pub mod orientation;

use thiserror::Error;

use crate::foundation::math::{Vec2, Vec3};

/// Structural errors raised while validating per-particle input arrays.
///
/// These are fatal to the call that produced them and are always raised
/// before any buffer is published.
#[derive(Error, Debug)]
pub enum ShapeError {
    /// A per-particle array disagrees with the particle count
    #[error("length mismatch for '{name}': expected {expected} entries, got {actual}")]
    LengthMismatch {
        /// Name of the offending input array
        name: &'static str,
        /// Expected number of entries (the particle count)
        expected: usize,
        /// Actual number of entries supplied
        actual: usize,
    },
}

/// Particle coordinates, either planar (a zero depth axis is pre-pended) or
/// full 3-D.
///
/// The axis convention follows image-style (depth, row, column) ordering: the
/// billboard quad spans the two trailing axes, and the leading axis is the
/// extra depth/time coordinate. Planar input therefore pads a zero *leading*
/// coordinate, not a trailing one.
#[derive(Debug, Clone)]
pub enum Points {
    /// 2-D coordinates; a zero leading axis is added on expansion
    Planar(Vec<Vec2>),
    /// Full 3-D coordinates in (depth, y, x) order
    Spatial(Vec<Vec3>),
}

impl Points {
    /// Number of particles described by these coordinates.
    pub fn len(&self) -> usize {
        match self {
            Self::Planar(v) => v.len(),
            Self::Spatial(v) => v.len(),
        }
    }

    /// Whether the point set is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Expand to 3-D coordinates, pre-pending a zero axis for planar input.
    pub fn to_spatial(&self) -> Vec<Vec3> {
        match self {
            Self::Planar(v) => v.iter().map(|p| Vec3::new(0.0, p.x, p.y)).collect(),
            Self::Spatial(v) => v.clone(),
        }
    }
}

impl From<Vec<Vec3>> for Points {
    fn from(coords: Vec<Vec3>) -> Self {
        Self::Spatial(coords)
    }
}

impl From<Vec<Vec2>> for Points {
    fn from(coords: Vec<Vec2>) -> Self {
        Self::Planar(coords)
    }
}

/// A scalar per-particle attribute that may be given once and broadcast.
#[derive(Debug, Clone)]
pub enum Scalars {
    /// One value shared by every particle
    Uniform(f32),
    /// One value per particle
    PerParticle(Vec<f32>),
}

impl Scalars {
    /// Resolve to one value per particle, validating the length.
    pub fn resolve(&self, n: usize, name: &'static str) -> Result<Vec<f32>, ShapeError> {
        match self {
            Self::Uniform(v) => Ok(vec![*v; n]),
            Self::PerParticle(values) => {
                if values.len() == n {
                    Ok(values.clone())
                } else {
                    Err(ShapeError::LengthMismatch {
                        name,
                        expected: n,
                        actual: values.len(),
                    })
                }
            }
        }
    }
}

impl From<f32> for Scalars {
    fn from(v: f32) -> Self {
        Self::Uniform(v)
    }
}

impl From<Vec<f32>> for Scalars {
    fn from(v: Vec<f32>) -> Self {
        Self::PerParticle(v)
    }
}

/// A 3-vector per-particle attribute that may be given once and broadcast.
#[derive(Debug, Clone)]
pub enum Vectors {
    /// One vector shared by every particle
    Uniform(Vec3),
    /// One vector per particle
    PerParticle(Vec<Vec3>),
}

impl Vectors {
    /// Resolve to one vector per particle, validating the length.
    pub fn resolve(&self, n: usize, name: &'static str) -> Result<Vec<Vec3>, ShapeError> {
        match self {
            Self::Uniform(v) => Ok(vec![*v; n]),
            Self::PerParticle(values) => {
                if values.len() == n {
                    Ok(values.clone())
                } else {
                    Err(ShapeError::LengthMismatch {
                        name,
                        expected: n,
                        actual: values.len(),
                    })
                }
            }
        }
    }
}

impl From<Vec3> for Vectors {
    fn from(v: Vec3) -> Self {
        Self::Uniform(v)
    }
}

impl From<f32> for Vectors {
    fn from(v: f32) -> Self {
        Self::Uniform(Vec3::repeat(v))
    }
}

impl From<Vec<Vec3>> for Vectors {
    fn from(v: Vec<Vec3>) -> Self {
        Self::PerParticle(v)
    }
}
