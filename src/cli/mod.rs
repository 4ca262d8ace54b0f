//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the library.

pub mod config;
pub mod encrypt;

pub use config::handle_config_command;
pub use encrypt::{handle_encrypt_command, EncryptCommands, KeySourceArgs};
