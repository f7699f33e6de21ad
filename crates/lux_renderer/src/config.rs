//! Render configuration.
//!
//! Every field has a default, so a JSON config only needs the values it
//! changes.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::RenderResult;
use crate::Color;

/// How surfaces are lit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShadingMode {
    /// Point light with specular highlight, falloff and hard shadows
    #[default]
    Direct,
    /// Photon map density estimate
    Indirect,
}

/// Distribution of photon directions leaving the light.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirectionSampling {
    /// Normalized point in a cube, denser towards the diagonals
    #[default]
    Cube,
    /// Uniform over the sphere
    Sphere,
}

/// Photon emission settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhotonConfig {
    /// Photons emitted from the light
    pub count: usize,
    /// Intensity multiplier applied after every deposit
    pub decay: f32,
    /// Probability a photon keeps bouncing after a deposit
    pub survival: f32,
    /// Hard limit on deposits per photon
    pub max_bounces: u32,
    pub sampling: DirectionSampling,
}

impl Default for PhotonConfig {
    fn default() -> Self {
        Self {
            count: 1_000_000,
            decay: 0.4,
            survival: 0.5,
            max_bounces: 20,
            sampling: DirectionSampling::Cube,
        }
    }
}

/// Radiance estimate settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Candidates further than this from the shading point are ignored
    pub cutoff: f32,
    /// Standard deviation of the Gaussian distance kernel
    pub spread: f32,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            cutoff: 0.05,
            spread: 0.4,
        }
    }
}

/// Render configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: u32,
    pub height: u32,
    pub mode: ShadingMode,
    /// Colour of rays that leave the scene
    pub background: [f32; 3],
    pub photons: PhotonConfig,
    pub estimator: EstimatorConfig,
    /// Seed for photon emission; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            mode: ShadingMode::Direct,
            background: [0.0; 3],
            photons: PhotonConfig::default(),
            estimator: EstimatorConfig::default(),
            seed: None,
        }
    }
}

impl RenderConfig {
    /// Parse a JSON config.
    pub fn from_json(json: &str) -> RenderResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn load<P: AsRef<Path>>(path: P) -> RenderResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn background_color(&self) -> Color {
        Color::from_array(self.background)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!((config.width, config.height), (800, 600));
        assert_eq!(config.mode, ShadingMode::Direct);
        assert_eq!(config.photons.count, 1_000_000);
        assert_eq!(config.photons.decay, 0.4);
        assert_eq!(config.photons.survival, 0.5);
        assert_eq!(config.photons.max_bounces, 20);
        assert_eq!(config.estimator.cutoff, 0.05);
        assert_eq!(config.estimator.spread, 0.4);
        assert_eq!(config.background_color(), Color::ZERO);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let config = RenderConfig::from_json(
            r#"{ "width": 320, "mode": "indirect", "photons": { "count": 10, "sampling": "sphere" } }"#,
        )
        .unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
        assert_eq!(config.mode, ShadingMode::Indirect);
        assert_eq!(config.photons.count, 10);
        assert_eq!(config.photons.sampling, DirectionSampling::Sphere);
        assert_eq!(config.photons.decay, 0.4);
        assert_eq!(config.estimator, EstimatorConfig::default());
    }

    #[test]
    fn test_json_round_trip() {
        let config = RenderConfig {
            seed: Some(99),
            background: [0.1, 0.2, 0.3],
            ..RenderConfig::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(RenderConfig::from_json(&json).unwrap(), config);
    }

    #[test]
    fn test_invalid_json() {
        assert!(RenderConfig::from_json(r#"{ "mode": "sideways" }"#).is_err());
        assert!(RenderConfig::load("/no/such/config.json").is_err());
    }
}
