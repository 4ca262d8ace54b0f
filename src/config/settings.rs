//! Client settings
//!
//! Persisted as JSON in the client's base directory. Both entries are
//! optional: the base URL falls back to the environment and the default,
//! and the trust material can be supplied per invocation instead.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::api::ApiConfig;
use super::paths::ClientPaths;
use crate::crypto::{
    load_from_certificate_file, load_from_keystore_with_password, CredentialEncryptor,
    KeyStoreSource, PublicKeyHandle,
};
use crate::error::{BanksapiError, BanksapiResult};

/// Where the service's public key comes from
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TrustMaterial {
    /// A PEM encoded X.509 certificate
    Certificate { certificate: PathBuf },

    /// A certificate entry inside a PKCS#12 key store
    KeyStore {
        keystore: PathBuf,
        alias: String,
        /// Store password; the empty password when absent
        #[serde(default, skip_serializing_if = "Option::is_none")]
        password: Option<String>,
    },
}

impl TrustMaterial {
    pub fn certificate(path: impl Into<PathBuf>) -> Self {
        Self::Certificate {
            certificate: path.into(),
        }
    }

    pub fn keystore(path: impl Into<PathBuf>, alias: impl Into<String>) -> Self {
        Self::KeyStore {
            keystore: path.into(),
            alias: alias.into(),
            password: None,
        }
    }

    /// Load the public key, resolving relative paths against `base_dir`
    pub fn load(&self, base_dir: &Path) -> BanksapiResult<PublicKeyHandle> {
        let paths = ClientPaths::with_base_dir(base_dir.to_path_buf());
        match self {
            Self::Certificate { certificate } => {
                load_from_certificate_file(paths.resolve(certificate))
            }
            Self::KeyStore {
                keystore,
                alias,
                password,
            } => {
                let mut source = KeyStoreSource::new(paths.resolve(keystore), alias.as_str());
                if let Some(password) = password {
                    source = source.with_password(password.as_str());
                }
                load_from_keystore_with_password(&source)
            }
        }
    }
}

// Paths and alias only; never the store password
impl fmt::Display for TrustMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Certificate { certificate } => {
                write!(f, "certificate {}", certificate.display())
            }
            Self::KeyStore {
                keystore, alias, ..
            } => write!(f, "key store {} (alias '{}')", keystore.display(), alias),
        }
    }
}

impl fmt::Debug for TrustMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TrustMaterial({})", self)
    }
}

/// Client settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Base URL override; see [`ApiConfig`] for the fallback order
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Trust material holding the service's public key
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trust: Option<TrustMaterial>,
}

fn default_schema_version() -> u32 {
    1
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            base_url: None,
            trust: None,
        }
    }
}

impl Settings {
    /// Load settings from disk, or return defaults if the file doesn't exist
    pub fn load_or_create(paths: &ClientPaths) -> Result<Self, BanksapiError> {
        let settings_path = paths.settings_file();

        if !settings_path.exists() {
            return Ok(Settings::default());
        }

        let contents = std::fs::read_to_string(&settings_path)
            .map_err(|e| BanksapiError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BanksapiError::Config(format!("Failed to parse settings file: {}", e)))
    }

    /// Save settings to disk
    pub fn save(&self, paths: &ClientPaths) -> Result<(), BanksapiError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BanksapiError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| BanksapiError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }

    /// Resolve the API base URL: settings, then environment, then default
    pub fn api_config(&self) -> BanksapiResult<ApiConfig> {
        match self.base_url.as_deref() {
            Some(url) if !super::api::is_blank(url) => ApiConfig::parse(url),
            _ => ApiConfig::from_env(),
        }
    }

    /// Build an encryptor from the configured trust material
    pub fn encryptor(&self, paths: &ClientPaths) -> BanksapiResult<CredentialEncryptor> {
        let trust = self.trust.as_ref().ok_or_else(|| {
            BanksapiError::Config(
                "No trust material configured; set 'trust' in the settings file".into(),
            )
        })?;

        trust.load(paths.base_dir()).map(CredentialEncryptor::new)
    }
}
