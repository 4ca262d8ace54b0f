//! Data models for the credential payloads
//!
//! The shapes here are what the HTTP layer serializes into request bodies,
//! both before and after encryption.

pub mod credentials;

pub use credentials::{try_map_values, CredentialSet, LoginCredentials, LoginCredentialsMap};
