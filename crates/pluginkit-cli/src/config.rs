//! Configuration loading from TOML files.
//!
//! Lookup order:
//! 1. `$PLUGINKIT_CONFIG` environment variable
//! 2. `~/.config/pluginkit/config.toml`
//! 3. The platform config directory (`directories`)
//! 4. Built-in defaults (everything is optional)

use std::path::PathBuf;

use anyhow::{Context, Result};
use pluginkit_core::SubtopicKeys;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub topics: TopicsConfig,
    pub generate: GenerateConfig,
    pub known_commands: KnownCommandsConfig,
}

/// Topic tree layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct TopicsConfig {
    /// `full-path` (default) or `segment`.
    pub subtopic_keys: SubtopicKeys,
}

/// Stub generation defaults.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Generate a NUT without `--nuts`.
    pub nuts: bool,
    /// Generate a unit test without `--unit`.
    pub unit: bool,
    /// Directory with template overrides, looked up by file name.
    pub templates_dir: Option<String>,
    /// Copyright holder stamped into internal plugins' files.
    pub copyright_holder: String,
}

/// Where the registered command listing comes from.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct KnownCommandsConfig {
    /// Saved `sf commands --json` output. Overridden by `--commands-file`.
    pub file: Option<String>,
}

// --- Defaults ---

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            nuts: false,
            unit: false,
            templates_dir: None,
            copyright_holder: "salesforce.com, inc.".into(),
        }
    }
}

/// Load config from disk. Returns defaults if no config file exists.
pub fn load_config() -> Result<Config> {
    let path = config_path();

    if let Some(p) = &path {
        if p.exists() {
            let content =
                std::fs::read_to_string(p).with_context(|| format!("reading {}", p.display()))?;
            let config: Config =
                toml::from_str(&content).with_context(|| format!("parsing {}", p.display()))?;
            tracing::debug!("loaded config from {}", p.display());
            return Ok(config);
        }
    }

    Ok(Config::default())
}

/// Resolve the config file path.
fn config_path() -> Option<PathBuf> {
    // 1. Environment variable
    if let Ok(p) = std::env::var("PLUGINKIT_CONFIG") {
        return Some(PathBuf::from(p));
    }

    let home = directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(".config"));
    let platform = directories::ProjectDirs::from("dev", "pluginkit", "pluginkit")
        .map(|dirs| dirs.config_dir().to_path_buf());
    resolve_config_path(home, platform)
}

/// `<home>/.config/pluginkit/config.toml` if it exists, else the platform
/// config dir's file. The home path is still reported when neither exists.
fn resolve_config_path(home: Option<PathBuf>, platform: Option<PathBuf>) -> Option<PathBuf> {
    // 2. ~/.config/pluginkit/config.toml
    let home = home.map(|dir| dir.join("pluginkit").join("config.toml"));
    if let Some(p) = home.as_ref().filter(|p| p.exists()) {
        return Some(p.clone());
    }

    // 3. Platform config dir
    let platform = platform.map(|dir| dir.join("config.toml"));
    match platform {
        Some(p) if p.exists() => Some(p),
        other => home.or(other),
    }
}

/// Show the active config path (for `pluginkit config`).
pub fn show_config_path() -> String {
    match config_path() {
        Some(p) if p.exists() => format!("{} (loaded)", p.display()),
        Some(p) => format!("{} (not found, using defaults)", p.display()),
        None => "no config path resolved (using defaults)".into(),
    }
}
