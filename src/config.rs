use crate::color::Color;
use crate::color_policy::{default_location_rules, HealthGradient, LocationPalette, LocationRule};
use crate::logging::LogSink;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Directory name under the user config dir.
pub const APP_NAME_LOWER: &str = "ds4-lightbar";

/// Highest `version` this build understands.
const CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightbarConfig {
    /// Layout version of the file
    pub version: u32,
    /// `tracing` filter used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Color for locations no rule matches
    pub default_color: Color,
    /// Location rules, highest priority first
    pub locations: Vec<LocationRule>,
    pub health: HealthGradient,
}

impl Default for LightbarConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            log_filter: "info".to_string(),
            default_color: Color::WHITE,
            locations: default_location_rules(),
            health: HealthGradient::default(),
        }
    }
}

impl LightbarConfig {
    pub fn palette(&self) -> LocationPalette {
        LocationPalette::new(self.locations.clone(), self.default_color)
    }
}

/// Returns the path to the config file: ~/.config/ds4-lightbar/config.toml
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join(APP_NAME_LOWER).join("config.toml"))
}

/// Load the config from the default location, or defaults if there is none.
pub fn load_config(log: &dyn LogSink) -> Result<LightbarConfig> {
    match config_path() {
        Some(path) => load_config_from(&path, log),
        None => Ok(LightbarConfig::default()),
    }
}

/// Load the config at `path`.
/// Falls back to the `.bak` copy next to it when the main file is missing or corrupted.
pub fn load_config_from(path: &Path, log: &dyn LogSink) -> Result<LightbarConfig> {
    let bak_path = path.with_extension("toml.bak");

    if !path.exists() {
        if bak_path.exists() {
            log.warn(&format!(
                "Main config missing, loading from backup: {}",
                bak_path.display()
            ));
            return load_from_path(&bak_path, log);
        }
        return Ok(LightbarConfig::default());
    }

    match load_from_path(path, log) {
        Ok(config) => Ok(config),
        Err(e) => {
            if bak_path.exists() {
                log.warn(&format!("Main config corrupted ({:#}), loading from backup", e));
                return load_from_path(&bak_path, log);
            }
            Err(e)
        }
    }
}

fn load_from_path(path: &Path, log: &dyn LogSink) -> Result<LightbarConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config = parse_config(&contents)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

    if config.version > CONFIG_VERSION {
        log.warn(&format!(
            "Config version {} is newer than {}, unknown keys are ignored",
            config.version, CONFIG_VERSION
        ));
    }

    Ok(config)
}

/// Parse a config document. Missing keys take their default values.
pub fn parse_config(contents: &str) -> Result<LightbarConfig> {
    toml::from_str(contents).context("Invalid lightbar config")
}
