//! Base URL of the banking API
//!
//! Resolution order:
//!
//! 1. An explicit URL handed to [`ApiConfig::parse`] or [`ApiConfig::resolve`]
//! 2. `BANKSAPI_BASE_URL` environment variable
//! 3. `https://banksapi.io`
//!
//! Blank values (empty or without any visible character) count as unset.
//! The resolved config is an ordinary value passed to whoever builds
//! requests; there is no process-wide instance.

use tracing::warn;
use url::Url;

use crate::error::{BanksapiError, BanksapiResult};

/// Environment variable overriding the base URL
pub const BASE_URL_ENV: &str = "BANKSAPI_BASE_URL";

/// Production base URL
pub const DEFAULT_BASE_URL: &str = "https://banksapi.io";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    base_url: Url,
}

impl ApiConfig {
    pub fn new(base_url: Url) -> Self {
        Self { base_url }
    }

    /// Parse an explicit base URL
    pub fn parse(base_url: &str) -> BanksapiResult<Self> {
        Url::parse(base_url.trim())
            .map(Self::new)
            .map_err(|e| BanksapiError::Config(format!("Invalid URL '{}': {}", base_url, e)))
    }

    /// Use `value` unless it is missing or blank, then fall back to the default
    pub fn resolve(value: Option<&str>) -> BanksapiResult<Self> {
        match value.filter(|v| !is_blank(v)) {
            Some(url) => Self::parse(url),
            None => Self::parse(DEFAULT_BASE_URL),
        }
    }

    /// Resolve from `BANKSAPI_BASE_URL`
    pub fn from_env() -> BanksapiResult<Self> {
        let value = std::env::var(BASE_URL_ENV).ok();
        if value.as_deref().is_some_and(is_blank) {
            warn!("{} is set but blank, using {}", BASE_URL_ENV, DEFAULT_BASE_URL);
        }
        Self::resolve(value.as_deref())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve an API path against the base URL
    pub fn endpoint(&self, path: &str) -> BanksapiResult<Url> {
        self.base_url
            .join(path)
            .map_err(|e| BanksapiError::Config(format!("Invalid endpoint path '{}': {}", path, e)))
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
        }
    }
}

/// True when the string has no visible ASCII character
pub fn is_blank(value: &str) -> bool {
    !value.chars().any(|c| c.is_ascii_graphic())
}
