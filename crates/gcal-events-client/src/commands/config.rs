//! Configuration commands.

use std::path::Path;

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// Renders the effective configuration as TOML.
pub fn render(config: &ClientConfig, config_path: &Path) -> ClientResult<String> {
    let toml_str = toml::to_string_pretty(config)
        .map_err(|e| ClientError::Config(format!("failed to serialize config: {}", e)))?;
    Ok(format!("# config.toml ({})\n{}", config_path.display(), toml_str))
}

/// Dump the current configuration to stdout.
pub fn dump(config: &ClientConfig, config_path: &Path) -> ClientResult<()> {
    println!("{}", render(config, config_path)?);
    Ok(())
}

/// Show the configuration, credential and token file paths.
pub fn path(config: &ClientConfig, config_path: &Path) -> ClientResult<()> {
    println!("config: {}", config_path.display());
    println!("credentials: {}", config.credentials_path.display());
    println!("token: {}", config.token_path.display());
    Ok(())
}
