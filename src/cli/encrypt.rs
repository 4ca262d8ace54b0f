//! Encryption CLI commands
//!
//! Reads plaintext credentials from an argument, a file or stdin and prints
//! the encrypted result, ready to be placed in a request body.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use serde::Serialize;

use crate::config::{paths::ClientPaths, settings::Settings, TrustMaterial};
use crate::crypto::CredentialEncryptor;
use crate::error::{BanksapiError, BanksapiResult};
use crate::models::{CredentialSet, LoginCredentialsMap};

/// Encryption commands
#[derive(Subcommand, Debug)]
pub enum EncryptCommands {
    /// Encrypt a single value (read from stdin when omitted)
    Value {
        /// Plaintext to encrypt
        text: Option<String>,
    },

    /// Encrypt a JSON object of credential fields
    Set {
        /// JSON file (stdin when omitted)
        file: Option<PathBuf>,
    },

    /// Encrypt a JSON map of bank access ids to login credentials
    #[command(alias = "logins")]
    Credentials {
        /// JSON file (stdin when omitted)
        file: Option<PathBuf>,
    },
}

/// Where to load the service's public key from, overriding the settings file
#[derive(Args, Debug, Default, Clone)]
pub struct KeySourceArgs {
    /// PEM certificate holding the service's public key
    #[arg(long, global = true, conflicts_with = "keystore")]
    pub cert: Option<PathBuf>,

    /// PKCS#12 key store holding the certificate
    #[arg(long, global = true, requires = "alias")]
    pub keystore: Option<PathBuf>,

    /// Alias of the certificate entry in the key store
    #[arg(long, global = true)]
    pub alias: Option<String>,

    /// Key store password (the empty password when omitted)
    #[arg(long, global = true, env = "BANKSAPI_KEYSTORE_PASSWORD", hide_env_values = true)]
    pub keystore_password: Option<String>,
}

impl KeySourceArgs {
    /// Trust material named on the command line, if any
    pub fn trust_material(&self) -> Option<TrustMaterial> {
        if let Some(cert) = &self.cert {
            return Some(TrustMaterial::certificate(cert.clone()));
        }

        match (&self.keystore, &self.alias) {
            (Some(keystore), Some(alias)) => Some(TrustMaterial::KeyStore {
                keystore: keystore.clone(),
                alias: alias.clone(),
                password: self.keystore_password.clone(),
            }),
            _ => None,
        }
    }
}

/// Handle encryption commands
pub fn handle_encrypt_command(
    paths: &ClientPaths,
    settings: &Settings,
    keys: &KeySourceArgs,
    cmd: EncryptCommands,
) -> BanksapiResult<()> {
    let encryptor = build_encryptor(paths, settings, keys)?;
    let stdout = std::io::stdout();
    run_encrypt(&encryptor, cmd, std::io::stdin().lock(), &mut stdout.lock())
}

/// Command-line paths are relative to the working directory, settings paths
/// to the client's base directory
fn build_encryptor(
    paths: &ClientPaths,
    settings: &Settings,
    keys: &KeySourceArgs,
) -> BanksapiResult<CredentialEncryptor> {
    match keys.trust_material() {
        Some(trust) => trust.load(Path::new("")).map(CredentialEncryptor::new),
        None => settings.encryptor(paths),
    }
}

fn run_encrypt<R: Read, W: Write>(
    encryptor: &CredentialEncryptor,
    cmd: EncryptCommands,
    input: R,
    out: &mut W,
) -> BanksapiResult<()> {
    match cmd {
        EncryptCommands::Value { text } => {
            let text = match text {
                Some(text) => text,
                None => read_value(input)?,
            };
            let ciphertext = encryptor.encrypt_string(&text)?;
            writeln!(out, "{}", ciphertext)?;
        }
        EncryptCommands::Set { file } => {
            let set: CredentialSet = read_json(file.as_deref(), input)?;
            write_json(out, &encryptor.encrypt_credentials(&set)?)?;
        }
        EncryptCommands::Credentials { file } => {
            let logins: LoginCredentialsMap = read_json(file.as_deref(), input)?;
            write_json(out, &encryptor.encrypt_login_credentials_map(&logins)?)?;
        }
    }
    Ok(())
}

/// Read a single value, dropping the trailing line break
fn read_value<R: Read>(mut input: R) -> BanksapiResult<String> {
    let mut text = String::new();
    input.read_to_string(&mut text)?;
    let trimmed = text.strip_suffix('\n').unwrap_or(&text);
    Ok(trimmed.strip_suffix('\r').unwrap_or(trimmed).to_string())
}

fn read_json<T, R>(file: Option<&Path>, mut input: R) -> BanksapiResult<T>
where
    T: serde::de::DeserializeOwned,
    R: Read,
{
    let contents = match file {
        Some(path) => std::fs::read_to_string(path).map_err(|e| {
            BanksapiError::Io(format!("Failed to read {}: {}", path.display(), e))
        })?,
        None => {
            let mut contents = String::new();
            input.read_to_string(&mut contents)?;
            contents
        }
    };

    Ok(serde_json::from_str(&contents)?)
}

fn write_json<T: Serialize, W: Write>(out: &mut W, value: &T) -> BanksapiResult<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}
