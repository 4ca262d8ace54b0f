//! banksapi-crypto - client-side encryption of banking credentials
//!
//! Credentials sent to the BANKSapi aggregation API are encrypted with the
//! service's RSA public key (OAEP, SHA-1, MGF1) and Base64 encoded before
//! they leave the caller's process. This crate loads that key from a
//! certificate or PKCS#12 key store and applies the encryption to single
//! values, credential sets and whole login maps.
//!
//! # Architecture
//!
//! - `crypto`: key loading and the credential encryptor
//! - `models`: credential payload types
//! - `config`: base URL, paths and persisted settings
//! - `error`: custom error types
//! - `cli`: command handlers for the `banksapi-crypt` binary
//!
//! # Example
//!
//! ```rust,ignore
//! use banksapi_crypto::crypto::CredentialEncryptor;
//! use banksapi_crypto::models::{CredentialSet, LoginCredentials, LoginCredentialsMap};
//!
//! let encryptor = CredentialEncryptor::from_certificate_file("banksapi.pem")?;
//!
//! let credentials: CredentialSet = [("user", "alice"), ("pin", "1234")].into_iter().collect();
//! let mut logins = LoginCredentialsMap::new();
//! logins.insert("acc-1", LoginCredentials::new("bankX", credentials, true));
//!
//! let encrypted = encryptor.encrypt_login_credentials_map(&logins)?;
//! ```

pub mod cli;
pub mod config;
pub mod crypto;
pub mod error;
pub mod models;

pub use crypto::{CredentialEncryptor, PublicKeyHandle};
pub use error::{BanksapiError, BanksapiResult};
