//! Configuration CLI command
//!
//! Shows resolved paths, the API base URL and the trust material in use.

use std::io::Write;

use crate::config::{paths::ClientPaths, settings::Settings};
use crate::error::BanksapiResult;

/// Handle the config command
pub fn handle_config_command(paths: &ClientPaths, settings: &Settings) -> BanksapiResult<()> {
    let stdout = std::io::stdout();
    write_config(paths, settings, &mut stdout.lock())
}

fn write_config<W: Write>(
    paths: &ClientPaths,
    settings: &Settings,
    out: &mut W,
) -> BanksapiResult<()> {
    let api = settings.api_config()?;

    writeln!(out, "banksapi client configuration")?;
    writeln!(out, "=============================")?;
    writeln!(out, "Base directory: {}", paths.base_dir().display())?;
    writeln!(out, "Settings file:  {}", paths.settings_file().display())?;
    writeln!(out, "Base URL:       {}", api.base_url())?;
    match &settings.trust {
        Some(trust) => writeln!(out, "Trust material: {}", trust)?,
        None => writeln!(out, "Trust material: (not configured)")?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TrustMaterial;
    use tempfile::TempDir;

    #[test]
    fn test_write_config() {
        let temp_dir = TempDir::new().unwrap();
        let paths = ClientPaths::with_base_dir(temp_dir.path().to_path_buf());
        let settings = Settings {
            base_url: Some("https://sandbox.banksapi.io".into()),
            trust: Some(TrustMaterial::keystore("store.p12", "banksapi")),
            ..Settings::default()
        };

        let mut out = Vec::new();
        write_config(&paths, &settings, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("https://sandbox.banksapi.io/"));
        assert!(text.contains("key store store.p12 (alias 'banksapi')"));
        assert!(text.contains("config.json"));
    }
}
