//! Settings loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::schema::ShellSettings;
use crate::config::validation::{validate_settings, ValidationError};

/// Error type for settings loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {}", join(.0))]
    Validation(Vec<ValidationError>),
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate settings from a TOML file.
pub fn load_settings(path: &Path) -> Result<ShellSettings, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let settings = parse_settings(&content)?;

    tracing::debug!(path = %path.display(), "Settings file loaded");
    Ok(settings)
}

/// Parse and validate settings from TOML text.
pub fn parse_settings(content: &str) -> Result<ShellSettings, ConfigError> {
    let settings: ShellSettings = toml::from_str(content)?;

    validate_settings(&settings).map_err(ConfigError::Validation)?;

    Ok(settings)
}

/// Load `path` when given, otherwise use defaults.
pub fn load_or_default(path: Option<&Path>) -> Result<ShellSettings, ConfigError> {
    match path {
        Some(path) => load_settings(path),
        None => Ok(ShellSettings::default()),
    }
}
