use super::config::ConfigError;
use crate::core::error::GeometryError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Geometry kernel failed: {source}")]
    Geometry {
        #[from]
        source: GeometryError,
    },

    #[error("Configuration error: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error("Chain has {found} points but at least {required} are required")]
    InsufficientPoints { required: usize, found: usize },
}
