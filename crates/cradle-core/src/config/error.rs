//! # Cradle Config Errors
//!
//! Errors raised while locating, reading or binding configuration files.
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to open config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unsupported configuration format: {0}")]
    UnsupportedFormat(PathBuf),

    #[error("Failed to parse config file as {format}: {source}")]
    Deserialize {
        format: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("Path resolution failed for '{path}': {reason}")]
    PathResolution { path: PathBuf, reason: String },
}

impl ConfigError {
    pub fn io(source: std::io::Error, path: PathBuf) -> Self {
        ConfigError::Io { path, source }
    }

    pub fn deserialize<E>(format: impl Into<String>, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        ConfigError::Deserialize {
            format: format.into(),
            source: Box::new(source),
        }
    }
}
