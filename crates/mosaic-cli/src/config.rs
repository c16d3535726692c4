//! Layout configuration discovery for the CLI.
//!
//! A configuration file is looked up in this order, and the first one found
//! is the only one read:
//!
//! 1. the `--config` path, which must exist
//! 2. `mosaic/config.toml` under the working directory
//! 3. `config.toml` in the platform config directory
//!
//! Without any file the layout defaults apply. A file is decoded from TOML
//! and its values are range-checked before the compiler sees them.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use mosaic::{MosaicError, config::AppConfig};

const LOCAL_CONFIG: &str = "mosaic/config.toml";

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid configuration in {path}: {reason}")]
    Validation { path: PathBuf, reason: String },
}

impl From<ConfigError> for MosaicError {
    fn from(err: ConfigError) -> Self {
        MosaicError::Io(io::Error::other(err.to_string()))
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Origin {
    Explicit,
    Local,
    System,
}

impl Origin {
    fn as_str(self) -> &'static str {
        match self {
            Self::Explicit => "explicit",
            Self::Local => "local",
            Self::System => "system",
        }
    }
}

/// Loads the layout configuration for a CLI run.
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - The chosen file cannot be read or decoded
/// - A layout value is out of range
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, MosaicError> {
    let explicit = explicit_path.map(|path| path.as_ref().to_path_buf());
    let Some((path, origin)) = locate(explicit) else {
        debug!("No configuration file found, using default configuration");
        return Ok(AppConfig::default());
    };

    info!(path = path.display().to_string(), origin = origin.as_str(); "Loading configuration");
    if !path.exists() {
        return Err(ConfigError::MissingFile(path).into());
    }
    let content = fs::read_to_string(&path)?;
    Ok(decode(&path, &content)?)
}

/// Picks the configuration file to read, if any.
///
/// An explicit path is returned even when it does not exist so the caller
/// can report it.
fn locate(explicit: Option<PathBuf>) -> Option<(PathBuf, Origin)> {
    if let Some(path) = explicit {
        return Some((path, Origin::Explicit));
    }

    let local = PathBuf::from(LOCAL_CONFIG);
    if local.exists() {
        return Some((local, Origin::Local));
    }

    match ProjectDirs::from("com", "mosaic", "mosaic") {
        Some(dirs) => {
            let system = dirs.config_dir().join("config.toml");
            if system.exists() {
                return Some((system, Origin::System));
            }
            debug!(path = system.display().to_string(); "System configuration file not found");
        }
        None => debug!("Could not determine platform-specific config directory"),
    }
    None
}

fn decode(path: &Path, content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig =
        toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
    config
        .validate()
        .map_err(|err| ConfigError::Validation {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })?;
    Ok(config)
}
