//! Analytic shading profiles
//!
//! A fixed registry of pure intensity functions over normalized local quad
//! coordinates `(u, v) in [-1, 1]^2`. The profile is selected once at
//! construction (an unknown name fails immediately, never at render time)
//! and evaluated per covered pixel by the host renderer's fragment hook.
//!
//! The gaussian profile is the anisotropic one: it evaluates through the
//! inverse screen-space covariance from
//! [`crate::render::covariance::project_covariance`] and reduces to the
//! isotropic `exp(-(2r)^2)` when that matrix is the identity.

use crate::foundation::math::{Mat2, Vec2};
use crate::render::RenderError;

/// Named analytic splat profiles.
///
/// `intensity` returns `None` when the fragment is discarded (contributes
/// nothing), `Some(v)` with `v` in `[0, 1]` otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShadingProfile {
    /// Anisotropic gaussian, `exp(-(2r)^2)` in the isotropic case
    Gaussian,
    /// Soft point-light falloff, `0.05 / (max(r, .01) - .01 + .05)`
    Particle,
    /// Airy-like diffraction rings, `|sin(8r) / (8r)|`
    Airy,
    /// Flat core with a damped oscillating skirt
    Fresnel,
    /// Orthographic sphere cap, discarded outside radius 0.8
    Sphere,
    /// Hollow shell ring between radii 0.8 and 0.9
    Bubble,
    /// Gaussian ring at radius 0.9 with a quadratic interior floor
    Bubble2,
    /// Constant 1
    None,
}

/// All registered profiles, in registry order.
pub const ALL_PROFILES: [ShadingProfile; 8] = [
    ShadingProfile::Gaussian,
    ShadingProfile::Particle,
    ShadingProfile::Airy,
    ShadingProfile::Fresnel,
    ShadingProfile::Sphere,
    ShadingProfile::Bubble,
    ShadingProfile::Bubble2,
    ShadingProfile::None,
];

impl ShadingProfile {
    /// Look up a profile by its registry name.
    ///
    /// # Errors
    /// [`RenderError::UnknownProfile`] for names not in the registry; this is
    /// a construction-time failure by design.
    pub fn from_name(name: &str) -> Result<Self, RenderError> {
        match name {
            "gaussian" => Ok(Self::Gaussian),
            "particle" => Ok(Self::Particle),
            "airy" => Ok(Self::Airy),
            "fresnel" => Ok(Self::Fresnel),
            "sphere" => Ok(Self::Sphere),
            "bubble" => Ok(Self::Bubble),
            "bubble2" => Ok(Self::Bubble2),
            "none" => Ok(Self::None),
            other => Err(RenderError::UnknownProfile(other.to_string())),
        }
    }

    /// Registry name of this profile.
    pub fn name(self) -> &'static str {
        match self {
            Self::Gaussian => "gaussian",
            Self::Particle => "particle",
            Self::Airy => "airy",
            Self::Fresnel => "fresnel",
            Self::Sphere => "sphere",
            Self::Bubble => "bubble",
            Self::Bubble2 => "bubble2",
            Self::None => "none",
        }
    }

    /// Evaluate the isotropic profile at local coordinates.
    pub fn intensity(self, local: Vec2) -> Option<f32> {
        let r = local.norm();
        match self {
            Self::Gaussian => Some((-(2.0 * r) * (2.0 * r)).exp()),
            Self::Particle => Some(0.05 / (r.max(0.01) - 0.01 + 0.05)),
            Self::Airy => {
                let x = 8.0 * r;
                if x < 1e-6 {
                    Some(1.0)
                } else {
                    Some((x.sin() / x).abs())
                }
            }
            Self::Fresnel => {
                if r <= 0.7 {
                    Some(1.0)
                } else {
                    let d = r - 0.7;
                    Some((-4.0 * d).exp() * (1000.0 * d * d).cos())
                }
            }
            Self::Sphere => {
                const R0: f32 = 0.8;
                if r < R0 {
                    Some((R0 * R0 - r * r).max(0.0).sqrt())
                } else {
                    None
                }
            }
            Self::Bubble => {
                const R1: f32 = 0.8;
                const R2: f32 = 0.9;
                let norm = (R2 * R2 - R1 * R1).sqrt();
                if r < R1 {
                    Some(((R2 * R2 - r * r).sqrt() - (R1 * R1 - r * r).sqrt()) / norm)
                } else if r < R2 {
                    Some((R2 * R2 - r * r).sqrt() / norm)
                } else {
                    None
                }
            }
            Self::Bubble2 => {
                const R0: f32 = 0.9;
                let d = r - R0;
                let val = (-400.0 * d * d).exp();
                if r < R0 {
                    Some(val.max(r * r / (R0 * R0)))
                } else {
                    Some(val)
                }
            }
            Self::None => Some(1.0),
        }
    }

    /// Evaluate the profile with the inverse screen-space covariance.
    ///
    /// Only the gaussian is anisotropic; every other profile ignores the
    /// matrix. With `cov_inv` the identity this equals [`Self::intensity`].
    pub fn intensity_with_covariance(self, local: Vec2, cov_inv: &Mat2) -> Option<f32> {
        match self {
            Self::Gaussian => {
                let q = local.dot(&(cov_inv * local));
                Some((-4.0 * q).exp())
            }
            _ => self.intensity(local),
        }
    }
}

/// Fragment-stage evaluation: profile plus the LOD and view-angle
/// compensation terms.
#[derive(Debug, Clone, Copy)]
pub struct FragmentStage {
    profile: ShadingProfile,
    distance_intensity_increase: f32,
}

impl FragmentStage {
    /// Create a fragment stage for a profile, with the optional
    /// distance-intensity ramp disabled.
    pub fn new(profile: ShadingProfile) -> Self {
        Self {
            profile,
            distance_intensity_increase: 0.0,
        }
    }

    /// Enable the optional brightness ramp driven by the screen-space
    /// texcoord derivative magnitude (compensates under-sampling at shallow
    /// viewing angles). A gain of 0 disables it.
    pub fn with_distance_intensity(mut self, gain: f32) -> Self {
        self.distance_intensity_increase = gain;
        self
    }

    /// The profile this stage evaluates.
    pub fn profile(&self) -> ShadingProfile {
        self.profile
    }

    /// Shade one fragment.
    ///
    /// `local` is the texcoord mapped to `[-1, 1]^2` (see
    /// [`local_from_texcoord`]), `scale_intensity` comes from the vertex
    /// stage and `texcoord_deriv` is the host-supplied derivative magnitude
    /// (pass 0 when unavailable). Returns `None` for discarded fragments.
    pub fn shade(
        &self,
        local: Vec2,
        cov_inv: &Mat2,
        scale_intensity: f32,
        texcoord_deriv: f32,
    ) -> Option<f32> {
        let mut val = self.profile.intensity_with_covariance(local, cov_inv)?;
        // size-locked far-away particles would otherwise appear over-bright
        val /= scale_intensity.max(1.0).sqrt();
        if self.distance_intensity_increase > 0.0 {
            val *= 1.0 + self.distance_intensity_increase * texcoord_deriv;
        }
        Some(val)
    }
}

/// Map a texture coordinate in `[0, 1]^2` to local profile coordinates in
/// `[-1, 1]^2`.
pub fn local_from_texcoord(texcoord: Vec2) -> Vec2 {
    2.0 * (texcoord - Vec2::new(0.5, 0.5))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f32 = 1e-6;

    #[test]
    fn test_registry_round_trips_every_name() {
        for profile in ALL_PROFILES {
            assert_eq!(ShadingProfile::from_name(profile.name()).unwrap(), profile);
        }
    }

    #[test]
    fn test_unknown_profile_fails_at_lookup() {
        let err = ShadingProfile::from_name("nonesuch").unwrap_err();
        assert!(matches!(err, RenderError::UnknownProfile(_)));
    }

    #[test]
    fn test_gaussian_center_and_falloff() {
        let g = ShadingProfile::Gaussian;
        assert_relative_eq!(g.intensity(Vec2::zeros()).unwrap(), 1.0, epsilon = EPSILON);
        let r = 0.5;
        assert_relative_eq!(
            g.intensity(Vec2::new(r, 0.0)).unwrap(),
            (-4.0 * r * r).exp(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_anisotropic_gaussian_reduces_to_isotropic() {
        let g = ShadingProfile::Gaussian;
        let local = Vec2::new(0.3, -0.4);
        assert_relative_eq!(
            g.intensity_with_covariance(local, &Mat2::identity()).unwrap(),
            g.intensity(local).unwrap(),
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_anisotropic_gaussian_stretches() {
        // small inverse covariance along x = wide splat along x
        let cov_inv = Mat2::new(0.25, 0.0, 0.0, 4.0);
        let g = ShadingProfile::Gaussian;
        let along_x = g
            .intensity_with_covariance(Vec2::new(0.5, 0.0), &cov_inv)
            .unwrap();
        let along_y = g
            .intensity_with_covariance(Vec2::new(0.0, 0.5), &cov_inv)
            .unwrap();
        assert!(along_x > along_y);
    }

    #[test]
    fn test_particle_is_one_at_center() {
        assert_relative_eq!(
            ShadingProfile::Particle.intensity(Vec2::zeros()).unwrap(),
            1.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_airy_limit_at_origin() {
        assert_relative_eq!(
            ShadingProfile::Airy.intensity(Vec2::zeros()).unwrap(),
            1.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_fresnel_flat_core() {
        let f = ShadingProfile::Fresnel;
        assert_relative_eq!(f.intensity(Vec2::new(0.7, 0.0)).unwrap(), 1.0, epsilon = EPSILON);
        assert_relative_eq!(f.intensity(Vec2::new(0.1, 0.2)).unwrap(), 1.0, epsilon = EPSILON);
        // skirt is bounded by the exponential envelope
        let skirt = f.intensity(Vec2::new(0.9, 0.0)).unwrap();
        assert!(skirt.abs() <= (-4.0_f32 * 0.2).exp() + EPSILON);
    }

    #[test]
    fn test_sphere_height_and_discard() {
        let s = ShadingProfile::Sphere;
        assert_relative_eq!(s.intensity(Vec2::zeros()).unwrap(), 0.8, epsilon = EPSILON);
        assert!(s.intensity(Vec2::new(0.81, 0.0)).is_none());
        assert!(s.intensity(Vec2::new(1.0, 1.0)).is_none());
    }

    #[test]
    fn test_bubble_ring() {
        let b = ShadingProfile::Bubble;
        // shell is brightest in the ring band, discarded outside
        let inner = b.intensity(Vec2::zeros()).unwrap();
        let ring = b.intensity(Vec2::new(0.85, 0.0)).unwrap();
        assert!(ring > inner);
        assert!(b.intensity(Vec2::new(0.95, 0.0)).is_none());
    }

    #[test]
    fn test_bubble2_floor_inside() {
        let b = ShadingProfile::Bubble2;
        let r = 0.5;
        let val = b.intensity(Vec2::new(r, 0.0)).unwrap();
        assert!(val >= r * r / 0.81 - EPSILON);
        // outside the ring the gaussian tail survives without a floor
        let out = b.intensity(Vec2::new(1.0, 0.0)).unwrap();
        assert_relative_eq!(out, (-400.0_f32 * 0.01).exp(), epsilon = 1e-4);
    }

    #[test]
    fn test_none_is_constant() {
        assert_relative_eq!(
            ShadingProfile::None.intensity(Vec2::new(0.9, 0.9)).unwrap(),
            1.0,
            epsilon = EPSILON
        );
    }

    #[test]
    fn test_scale_intensity_compensation() {
        let stage = FragmentStage::new(ShadingProfile::None);
        let base = stage.shade(Vec2::zeros(), &Mat2::identity(), 1.0, 0.0).unwrap();
        let locked = stage.shade(Vec2::zeros(), &Mat2::identity(), 5.0, 0.0).unwrap();
        assert_relative_eq!(locked, base / 5.0_f32.sqrt(), epsilon = EPSILON);
    }

    #[test]
    fn test_compensation_never_brightens() {
        // scale below 1 must not amplify
        let stage = FragmentStage::new(ShadingProfile::None);
        let val = stage.shade(Vec2::zeros(), &Mat2::identity(), 0.25, 0.0).unwrap();
        assert_relative_eq!(val, 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_distance_intensity_ramp() {
        let stage = FragmentStage::new(ShadingProfile::None).with_distance_intensity(10.0);
        let val = stage.shade(Vec2::zeros(), &Mat2::identity(), 1.0, 0.1).unwrap();
        assert_relative_eq!(val, 2.0, epsilon = EPSILON);
    }

    #[test]
    fn test_discard_propagates_through_stage() {
        let stage = FragmentStage::new(ShadingProfile::Sphere);
        assert!(stage
            .shade(Vec2::new(0.9, 0.0), &Mat2::identity(), 1.0, 0.0)
            .is_none());
    }

    #[test]
    fn test_local_from_texcoord() {
        assert_relative_eq!(
            local_from_texcoord(Vec2::new(0.5, 0.5)),
            Vec2::zeros(),
            epsilon = EPSILON
        );
        assert_relative_eq!(
            local_from_texcoord(Vec2::new(1.0, 0.0)),
            Vec2::new(1.0, -1.0),
            epsilon = EPSILON
        );
    }
}
