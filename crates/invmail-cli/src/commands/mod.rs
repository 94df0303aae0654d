//! CLI subcommands.

pub mod config;
pub mod parse;
pub mod render;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::Context;
use tracing::debug;

use invmail_core::InvmailConfig;

/// Read an input file, or stdin when `input` is `-`.
pub fn read_input(input: &Path) -> anyhow::Result<String> {
    if input == Path::new("-") {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read stdin")?;
        return Ok(text);
    }

    if !input.exists() {
        anyhow::bail!("Input file not found: {}", input.display());
    }
    std::fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("invmail")
        .join("config.json")
}

/// Resolve the config file: the `--config` path, else the default location.
pub fn config_path(explicit: Option<&str>) -> PathBuf {
    explicit.map(PathBuf::from).unwrap_or_else(default_config_path)
}

/// Load the explicit config, the default file when it exists, or defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<InvmailConfig> {
    let path = config_path(explicit);
    if explicit.is_none() && !path.exists() {
        debug!("No config at {}, using defaults", path.display());
        return Ok(InvmailConfig::default());
    }

    InvmailConfig::from_file(&path)
        .with_context(|| format!("Failed to load config from {}", path.display()))
}
