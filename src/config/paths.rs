//! Path management for the banksapi client
//!
//! ## Path Resolution Order
//!
//! 1. `BANKSAPI_CLIENT_DIR` environment variable (if set)
//! 2. Unix (Linux/macOS): `$XDG_CONFIG_HOME/banksapi-client` or `~/.config/banksapi-client`
//! 3. Windows: `%APPDATA%\banksapi-client`

use std::path::{Path, PathBuf};

use crate::error::BanksapiError;

/// Environment variable overriding the base directory
pub const CLIENT_DIR_ENV: &str = "BANKSAPI_CLIENT_DIR";

const APP_DIR_NAME: &str = "banksapi-client";

/// Manages the paths used by the client
#[derive(Debug, Clone)]
pub struct ClientPaths {
    base_dir: PathBuf,
}

impl ClientPaths {
    /// Resolve the base directory from the environment
    ///
    /// # Errors
    ///
    /// Returns an error if no home or application data directory is known.
    pub fn new() -> Result<Self, BanksapiError> {
        let base_dir = match std::env::var(CLIENT_DIR_ENV) {
            Ok(custom) => PathBuf::from(custom),
            Err(_) => resolve_default_path()?,
        };

        Ok(Self { base_dir })
    }

    /// Create ClientPaths with a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Get the path to the settings file
    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    /// Resolve a path from the settings file relative to the base directory
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Ensure the base directory exists
    pub fn ensure_directories(&self) -> Result<(), BanksapiError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| BanksapiError::Io(format!("Failed to create base directory: {}", e)))
    }
}

#[cfg(not(windows))]
fn resolve_default_path() -> Result<PathBuf, BanksapiError> {
    let config_base = match std::env::var("XDG_CONFIG_HOME") {
        Ok(xdg) => PathBuf::from(xdg),
        Err(_) => {
            let home = std::env::var("HOME").map_err(|_| {
                BanksapiError::Config("HOME environment variable not set".into())
            })?;
            PathBuf::from(home).join(".config")
        }
    };
    Ok(config_base.join(APP_DIR_NAME))
}

#[cfg(windows)]
fn resolve_default_path() -> Result<PathBuf, BanksapiError> {
    let appdata = std::env::var("APPDATA")
        .map_err(|_| BanksapiError::Config("Could not determine APPDATA directory".into()))?;
    Ok(PathBuf::from(appdata).join(APP_DIR_NAME))
}
