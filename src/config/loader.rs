//! Configuration loading from disk.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::config::schema::LoaderConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Dedicated configuration file looked up in the project root.
pub const CONFIG_FILE: &str = ".api-loader.toml";

/// Manifest whose `[package.metadata.api-loader]` table is used as a fallback.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Parse error in {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
///
/// A `config` key redirects to another file, resolved relative to the
/// directory of the file naming it. Only one redirect is followed.
pub fn load_config(path: &Path) -> Result<LoaderConfig, ConfigError> {
    let mut config = read_config(path)?;

    if let Some(redirect) = config.config.take() {
        let target = path.parent().unwrap_or(Path::new(".")).join(redirect);
        tracing::debug!(from = %path.display(), to = %target.display(), "Following config redirect");
        config = read_config(&target)?;
        config.config = None;
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Find the configuration for a project rooted at `root`.
///
/// Looks for [`CONFIG_FILE`] first, then for a `[package.metadata.api-loader]`
/// table in the project's `Cargo.toml`. Returns the default configuration when
/// neither exists.
pub fn discover_config(root: &Path) -> Result<LoaderConfig, ConfigError> {
    let dedicated = root.join(CONFIG_FILE);
    if dedicated.is_file() {
        tracing::debug!(path = %dedicated.display(), "Using dedicated config file");
        return load_config(&dedicated);
    }

    let manifest = root.join(MANIFEST_FILE);
    if manifest.is_file() {
        if let Some(mut config) = read_manifest(&manifest)? {
            tracing::debug!(path = %manifest.display(), "Using manifest metadata");
            if let Some(redirect) = config.config.take() {
                return load_config(&root.join(redirect));
            }
            validate_config(&config).map_err(ConfigError::Validation)?;
            return Ok(config);
        }
    }

    tracing::debug!(root = %root.display(), "No config found, using defaults");
    Ok(LoaderConfig::default())
}

fn read_config(path: &Path) -> Result<LoaderConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))
}

fn read_manifest(path: &Path) -> Result<Option<LoaderConfig>, ConfigError> {
    #[derive(Deserialize)]
    struct Manifest {
        package: Option<Package>,
    }

    #[derive(Deserialize)]
    struct Package {
        metadata: Option<Metadata>,
    }

    #[derive(Deserialize)]
    struct Metadata {
        #[serde(rename = "api-loader")]
        api_loader: Option<LoaderConfig>,
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
    let manifest: Manifest =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

    Ok(manifest
        .package
        .and_then(|p| p.metadata)
        .and_then(|m| m.api_loader))
}
