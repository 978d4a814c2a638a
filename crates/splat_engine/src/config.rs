//! Render configuration
//!
//! Settings for the splat pipeline, loadable from TOML the same way hosts
//! configure the rest of their renderer. Profile name validation is
//! deferred to [`crate::render::pipeline::SplatPipeline::new`], which is
//! where an unknown name becomes a construction-time error.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to parse a TOML configuration string
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Failed to serialize the configuration
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Splat pipeline settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SplatConfig {
    /// Shading profile name (see the profile registry)
    pub profile: String,

    /// On-screen size threshold (NDC units) below which particles are
    /// size-locked; 0 disables the LOD behavior
    pub antialias: f32,

    /// Gain of the optional brightness ramp against texcoord derivative
    /// magnitude; 0 disables it
    pub distance_intensity_increase: f32,
}

impl Default for SplatConfig {
    fn default() -> Self {
        Self {
            profile: "gaussian".to_string(),
            antialias: 0.0,
            distance_intensity_increase: 0.0,
        }
    }
}

impl SplatConfig {
    /// Parse a configuration from a TOML string.
    ///
    /// # Errors
    /// [`ConfigError::Parse`] on malformed TOML.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Serialize the configuration to a TOML string.
    ///
    /// # Errors
    /// [`ConfigError::Serialize`] when serialization fails.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SplatConfig::default();
        assert_eq!(config.profile, "gaussian");
        assert_eq!(config.antialias, 0.0);
    }

    #[test]
    fn test_parse_partial_toml() {
        let config = SplatConfig::from_toml_str("profile = \"sphere\"\nantialias = 0.05\n").unwrap();
        assert_eq!(config.profile, "sphere");
        assert_eq!(config.antialias, 0.05);
        assert_eq!(config.distance_intensity_increase, 0.0);
    }

    #[test]
    fn test_round_trip() {
        let config = SplatConfig {
            profile: "bubble2".to_string(),
            antialias: 0.1,
            distance_intensity_increase: 15.0,
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(SplatConfig::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_malformed_toml_is_an_error() {
        assert!(matches!(
            SplatConfig::from_toml_str("profile = ["),
            Err(ConfigError::Parse(_))
        ));
    }
}
