//! Configuration module for the banksapi client
//!
//! This module provides configuration management including:
//! - API base URL resolution
//! - XDG-compliant path resolution
//! - Persisted settings naming the trust material

pub mod api;
pub mod paths;
pub mod settings;

pub use api::ApiConfig;
pub use paths::ClientPaths;
pub use settings::{Settings, TrustMaterial};
