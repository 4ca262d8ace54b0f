use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use banksapi_crypto::cli::{
    handle_config_command, handle_encrypt_command, EncryptCommands, KeySourceArgs,
};
use banksapi_crypto::config::{paths::ClientPaths, settings::Settings};

#[derive(Parser)]
#[command(
    name = "banksapi-crypt",
    version,
    about = "Encrypt banking credentials for the BANKSapi aggregation API",
    long_about = "banksapi-crypt encrypts credential values with the service's RSA public \
                  key (OAEP with SHA-1 and MGF1) and prints them Base64 encoded, ready \
                  to be placed in a request body."
)]
struct Cli {
    #[command(flatten)]
    keys: KeySourceArgs,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encrypt credential values
    #[command(subcommand)]
    Encrypt(EncryptCommands),

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    // Logs go to stderr so stdout stays machine-readable; RUST_LOG overrides the level
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let paths = ClientPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    match cli.command {
        Commands::Encrypt(cmd) => handle_encrypt_command(&paths, &settings, &cli.keys, cmd)?,
        Commands::Config => handle_config_command(&paths, &settings)?,
    }

    Ok(())
}
