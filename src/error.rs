//! Custom error types for banksapi-crypto
//!
//! This module defines the error hierarchy for the crate using thiserror.
//! The three cryptographic kinds are kept apart so callers can tell
//! "fix your trust material" from "fix your runtime" from "this one value
//! could not be encrypted".

use thiserror::Error;

/// Boxed underlying cause attached to cryptographic errors
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for banksapi-crypto operations
#[derive(Error, Debug)]
pub enum BanksapiError {
    /// Certificate or key store missing, unreadable, malformed, or alias absent
    #[error("Key material error: {message}")]
    KeyMaterial {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A required algorithm is not available for the supplied material
    #[error("Unsupported algorithm: {message}")]
    UnsupportedAlgorithm {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// A single encryption call failed
    #[error("Encryption error: {message}")]
    Encryption {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),
}

impl BanksapiError {
    /// Create a key material error without an underlying cause
    pub fn key_material(message: impl Into<String>) -> Self {
        Self::KeyMaterial {
            message: message.into(),
            source: None,
        }
    }

    /// Create a key material error wrapping its cause
    pub fn key_material_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::KeyMaterial {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an unsupported algorithm error
    pub fn unsupported_algorithm(message: impl Into<String>) -> Self {
        Self::UnsupportedAlgorithm {
            message: message.into(),
            source: None,
        }
    }

    /// Create an unsupported algorithm error wrapping its cause
    pub fn unsupported_algorithm_caused_by(
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::UnsupportedAlgorithm {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create an encryption error without an underlying cause
    pub fn encryption(message: impl Into<String>) -> Self {
        Self::Encryption {
            message: message.into(),
            source: None,
        }
    }

    /// Create an encryption error wrapping its cause
    pub fn encryption_caused_by(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Encryption {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Check if this is a key material error
    pub fn is_key_material(&self) -> bool {
        matches!(self, Self::KeyMaterial { .. })
    }

    /// Check if this is an unsupported algorithm error
    pub fn is_unsupported_algorithm(&self) -> bool {
        matches!(self, Self::UnsupportedAlgorithm { .. })
    }

    /// Check if this is an encryption error
    pub fn is_encryption(&self) -> bool {
        matches!(self, Self::Encryption { .. })
    }
}

impl From<std::io::Error> for BanksapiError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BanksapiError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

/// Result type alias for banksapi-crypto operations
pub type BanksapiResult<T> = Result<T, BanksapiError>;
