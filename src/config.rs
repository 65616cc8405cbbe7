use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::i18n::{default_multipliers, LengthMultipliers};
use crate::storage::ResourceLayout;

/// Config file used when `CONFIG_FILE` is not set.
pub const DEFAULT_CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    // Storage
    pub props_dir: PathBuf,
    pub base_filename: String,

    // Placeholder generation
    pub length_multipliers: LengthMultipliers,

    // Display
    pub show_translations: bool,

    // Server
    pub port: u16,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            props_dir: PathBuf::from("resources"),
            base_filename: "messages".to_string(),
            length_multipliers: default_multipliers(),
            show_translations: true,
            port: 8080,
        }
    }
}

impl Config {
    /// Path of the config file, from `CONFIG_FILE` or the default.
    pub fn path_from_env() -> PathBuf {
        std::env::var("CONFIG_FILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE))
    }

    /// Load the config file, then apply environment overrides.
    ///
    /// A missing file is created with the default configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let config = Self::from_file(path)?;
            info!("Loaded configuration from '{}'", path.display());
            config
        } else {
            info!("Config file not found. Creating default '{}'", path.display());
            let config = Self::default();
            config.save(path)?;
            config
        };

        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to open config file '{}'", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file '{}'", path.display()))
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("Failed to encode config")?;
        std::fs::write(path, json + "\n")
            .with_context(|| format!("Failed to write config file '{}'", path.display()))
    }

    /// Update only `showTranslations` in the file at `path`.
    ///
    /// Other settings are taken from the file as stored, so environment
    /// overrides in effect for this run are never written back.
    pub fn save_show_translations(path: &Path, show: bool) -> Result<()> {
        let mut stored = if path.exists() {
            Self::from_file(path)?
        } else {
            Self::default()
        };
        stored.show_translations = show;
        stored.save(path)
    }

    /// Storage layout described by this config.
    pub fn layout(&self) -> ResourceLayout {
        ResourceLayout::new(&self.props_dir, &self.base_filename)
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(dir) = std::env::var("PROPS_DIR") {
            self.props_dir = PathBuf::from(dir);
        }
        if let Ok(stem) = std::env::var("BASE_FILENAME") {
            self.base_filename = stem;
        }
        if let Ok(show) = std::env::var("SHOW_TRANSLATIONS") {
            self.show_translations = show
                .parse()
                .with_context(|| format!("SHOW_TRANSLATIONS must be true or false, got '{}'", show))?;
        }
        if let Ok(port) = std::env::var("PORT") {
            self.port = port
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Ok(raw) = std::env::var("LENGTH_MULTIPLIERS") {
            self.length_multipliers = parse_multipliers(&raw)?;
        }
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.base_filename.is_empty() {
            bail!("baseFilename cannot be empty");
        }
        for (code, multiplier) in self.length_multipliers.iter() {
            if !(multiplier.is_finite() && multiplier > 0.0) {
                bail!(
                    "Length multiplier for '{}' must be a positive number, got {}",
                    code,
                    multiplier
                );
            }
        }
        Ok(())
    }
}

/// Parse `fr=1.2,es=1.25` into a multiplier table.
pub fn parse_multipliers(raw: &str) -> Result<LengthMultipliers> {
    raw.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| -> Result<(String, f64)> {
            let (code, value) = pair
                .split_once('=')
                .with_context(|| format!("Invalid multiplier '{}'. Expected code=number", pair))?;
            let multiplier: f64 = value
                .trim()
                .parse()
                .with_context(|| format!("Invalid multiplier value in '{}'", pair))?;
            Ok((code.trim().to_string(), multiplier))
        })
        .collect()
}
