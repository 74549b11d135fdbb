use std::fmt;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::error::ConfigError;
use crate::utils::json::{strip_json_comments, StripOptions};

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json), comments allowed
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" | "jsonc" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

impl fmt::Display for ConfigFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// Bind configuration text to `T`.
///
/// JSON text goes through the comment stripper first. Comments are blanked rather
/// than removed so that parser error positions still point at the original text.
pub fn parse_config<T: DeserializeOwned>(text: &str, format: ConfigFormat) -> Result<T, ConfigError> {
    match format {
        ConfigFormat::Json => {
            let cleaned = strip_json_comments(text, StripOptions::default());
            serde_json::from_str(&cleaned).map_err(|e| ConfigError::deserialize("json", e))
        }
        #[cfg(feature = "yaml-config")]
        ConfigFormat::Yaml => serde_yaml::from_str(text).map_err(|e| ConfigError::deserialize("yaml", e)),
        #[cfg(feature = "toml-config")]
        ConfigFormat::Toml => toml::from_str(text).map_err(|e| ConfigError::deserialize("toml", e)),
    }
}

/// Read `path` and bind it to `T`, picking the format from the extension.
pub fn load_config<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::io(e, path.to_path_buf()))?;
    log::debug!("Loaded {} bytes of {} config from {}", content.len(), format, path.display());
    parse_config(&content, format)
}
