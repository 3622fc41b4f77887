//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use thiserror::Error;

use crate::config::schema::RoutingConfiguration;
use crate::config::settings::ServiceSettings;
use crate::config::validation::{validate_value, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("unsupported configuration format for '{0}' (expected .json or .toml)")]
    UnsupportedFormat(PathBuf),

    #[error("validation failed: {0}")]
    Validation(#[from] ValidationError),
}

/// On-disk encodings accepted for a routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from a file extension.
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Self::Json),
            "toml" => Some(Self::Toml),
            _ => None,
        }
    }
}

/// Load and validate a routing table from a JSON or TOML file.
pub fn load_routing_config(path: &Path) -> Result<RoutingConfiguration, ConfigError> {
    let format = ConfigFormat::from_path(path)
        .ok_or_else(|| ConfigError::UnsupportedFormat(path.to_path_buf()))?;
    let content = read(path)?;
    parse_routing_config(&content, format)
}

/// Parse and validate a routing table from an in-memory document.
pub fn parse_routing_config(
    content: &str,
    format: ConfigFormat,
) -> Result<RoutingConfiguration, ConfigError> {
    let raw: Value = match format {
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };

    Ok(validate_value(&raw)?)
}

/// Load service settings from a TOML file. Missing fields take their defaults.
pub fn load_settings(path: &Path) -> Result<ServiceSettings, ConfigError> {
    let content = read(path)?;
    Ok(toml::from_str(&content)?)
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })
}
