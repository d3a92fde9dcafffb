//! Configuration discovery and loading

use crate::config::error::{ConfigError, ConfigResult};
use crate::config::types::Config;
use std::path::{Path, PathBuf};

/// File name looked up in the project root and the user config directory
pub const DEFAULT_CONFIG_FILE: &str = "lucidshark.toml";

/// Read and validate a configuration file
pub async fn load_from_file(path: &Path) -> ConfigResult<Config> {
    let contents = tokio::fs::read_to_string(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConfigError::Io {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: Some(path.to_path_buf()),
        message: e.to_string(),
    })?;
    config.validate()?;

    log::debug!("Loaded configuration from {}", path.display());
    Ok(config)
}

/// Locate and load the configuration for `project_root`
///
/// An explicit path must exist. Otherwise `<project_root>/lucidshark.toml`
/// is tried, then `<user config dir>/lucidshark/lucidshark.toml`; when
/// neither exists the defaults are used.
pub async fn discover(project_root: &Path, explicit: Option<&Path>) -> ConfigResult<Config> {
    if let Some(path) = explicit {
        return load_from_file(path).await;
    }

    let candidates = [
        Some(project_root.join(DEFAULT_CONFIG_FILE)),
        dirs::config_dir().map(|d| d.join("lucidshark").join(DEFAULT_CONFIG_FILE)),
    ];
    for candidate in candidates.into_iter().flatten() {
        if is_file(&candidate).await {
            return load_from_file(&candidate).await;
        }
    }

    log::debug!("No configuration file found, using defaults");
    Ok(Config::default())
}

async fn is_file(path: &PathBuf) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|m| m.is_file())
        .unwrap_or(false)
}
