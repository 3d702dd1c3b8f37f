use crate::core::geometry::kabsch::SvdOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid value for '{name}': {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default, deny_unknown_fields)]
pub struct GeometryConfig {
    /// Whether frames built along a chain are scaled to unit axes.
    pub normalize_frames: bool,
    pub svd: SvdOptions,
}

impl Default for GeometryConfig {
    fn default() -> Self {
        Self {
            normalize_frames: true,
            svd: SvdOptions::default(),
        }
    }
}

impl GeometryConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::Toml {
            path: path.to_string_lossy().to_string(),
            source: e,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.svd.epsilon.is_finite() && self.svd.epsilon > 0.0) {
            return Err(ConfigError::InvalidParameter {
                name: "svd.epsilon",
                reason: format!("must be a positive finite number, got {}", self.svd.epsilon),
            });
        }
        if self.svd.max_iterations == 0 {
            return Err(ConfigError::InvalidParameter {
                name: "svd.max-iterations",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct GeometryConfigBuilder {
    normalize_frames: Option<bool>,
    svd_epsilon: Option<f64>,
    svd_max_iterations: Option<usize>,
}

impl GeometryConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn normalize_frames(mut self, normalize: bool) -> Self {
        self.normalize_frames = Some(normalize);
        self
    }
    pub fn svd_epsilon(mut self, epsilon: f64) -> Self {
        self.svd_epsilon = Some(epsilon);
        self
    }
    pub fn svd_max_iterations(mut self, iterations: usize) -> Self {
        self.svd_max_iterations = Some(iterations);
        self
    }

    pub fn build(self) -> Result<GeometryConfig, ConfigError> {
        let defaults = GeometryConfig::default();
        let config = GeometryConfig {
            normalize_frames: self.normalize_frames.unwrap_or(defaults.normalize_frames),
            svd: SvdOptions {
                epsilon: self.svd_epsilon.unwrap_or(defaults.svd.epsilon),
                max_iterations: self
                    .svd_max_iterations
                    .unwrap_or(defaults.svd.max_iterations),
            },
        };
        config.validate()?;
        Ok(config)
    }
}
