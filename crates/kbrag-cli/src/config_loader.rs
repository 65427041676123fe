//! Configuration loading utilities for CLI commands

use anyhow::{Context, Result};
use kbrag_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::Path;

/// Name of the optional config file looked up in the current directory
pub const CONFIG_FILE: &str = "kbrag.toml";

/// Load layered configuration: defaults, then `kbrag.toml` if present,
/// then KBRAG_* environment variables.
pub fn load_config() -> Result<LayeredConfig> {
    let mut config = LayeredConfig::with_defaults();

    if Path::new(CONFIG_FILE).exists() {
        config = config
            .load_from_file(CONFIG_FILE)
            .with_context(|| format!("Failed to load {}", CONFIG_FILE))?;
    }

    Ok(config.load_from_env())
}

/// Load layered configuration with CLI overrides applied on top
pub fn load_config_with_overrides(overrides: CliConfigOverrides) -> Result<LayeredConfig> {
    let mut config = load_config()?;
    config.update_from_cli(overrides);
    Ok(config)
}
