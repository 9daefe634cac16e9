//! Configuration loading utilities for CLI commands

use crate::cli::Cli;
use anyhow::{Context, Result};
use geogate_core::config::{CliConfigOverrides, LayeredConfig};
use std::path::{Path, PathBuf};

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "geogate.toml";

/// Load layered configuration: defaults, then file, then environment
///
/// An explicitly named file must exist; the default file is optional.
pub fn load_config(explicit: Option<&Path>) -> Result<LayeredConfig> {
    let config = LayeredConfig::with_defaults();

    let config = match config_path(explicit) {
        Some(path) => config
            .load_from_file(&path)
            .with_context(|| format!("Failed to load configuration file {}", path.display()))?,
        None => config,
    };

    Ok(config.load_from_env())
}

/// Load layered configuration with the global CLI overrides on top
pub fn load_config_with_overrides(cli: &Cli) -> Result<LayeredConfig> {
    let mut config = load_config(cli.config.as_deref())?;
    config.update_from_cli(CliConfigOverrides {
        fallback_radius: cli.fallback_radius,
        api_url: cli.api_url.clone(),
        target_binding: cli.binding,
    });
    Ok(config)
}

fn config_path(explicit: Option<&Path>) -> Option<PathBuf> {
    match explicit {
        Some(path) => Some(path.to_path_buf()),
        None => {
            let default = PathBuf::from(DEFAULT_CONFIG_FILE);
            default.is_file().then_some(default)
        }
    }
}
