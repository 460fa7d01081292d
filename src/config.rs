//! Configuration management for the application.
//!
//! This module handles loading, validating, and saving application configuration
//! in TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::APP_CONFIG_DIR;

/// Path configuration for file system locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct PathConfig {
    /// Directory searched first for external templates.
    pub templates_dir: Option<PathBuf>,
}

/// Generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Directory profile folders are written into.
    pub output_dir: PathBuf,
    /// Write a README.md into every profile folder.
    pub write_readme: bool,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("profiles"),
            write_readme: true,
        }
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Path settings
    pub paths: PathConfig,
    /// Generation settings
    pub build: BuildConfig,
}

impl Config {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/padforge/`
    /// - macOS: `~/Library/Application Support/padforge/`
    /// - Windows: `%APPDATA%\padforge\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_CONFIG_DIR);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the platform config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file; missing file means defaults.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::new());
        }

        let content = fs::read_to_string(config_path).context(format!(
            "Failed to read config file: {}",
            config_path.display()
        ))?;

        let config: Self = toml::from_str(&content).context(format!(
            "Failed to parse config file: {}",
            config_path.display()
        ))?;

        config.validate()?;
        Ok(config)
    }

    /// Saves configuration to the platform config file.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_file_path()?)
    }

    /// Saves configuration to a specific file using atomic write.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(config_dir) = config_path.parent() {
            fs::create_dir_all(config_dir).context(format!(
                "Failed to create config directory: {}",
                config_dir.display()
            ))?;
        }

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        // Atomic rename
        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    ///
    /// A configured templates directory must exist and be a directory.
    pub fn validate(&self) -> Result<()> {
        if let Some(dir) = &self.paths.templates_dir {
            if !dir.is_dir() {
                anyhow::bail!("Templates directory does not exist: {}", dir.display());
            }
        }
        if self.build.output_dir.as_os_str().is_empty() {
            anyhow::bail!("Output directory must not be empty");
        }
        Ok(())
    }

    /// Sets a value by dotted key, as used by `padforge config set`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "paths.templates_dir" => {
                self.paths.templates_dir = (!value.is_empty()).then(|| PathBuf::from(value));
            }
            "build.output_dir" => self.build.output_dir = PathBuf::from(value),
            "build.write_readme" => {
                self.build.write_readme = value
                    .parse()
                    .context(format!("Expected true or false, got '{value}'"))?;
            }
            _ => anyhow::bail!("Unknown config key: {key}"),
        }
        Ok(())
    }

    /// Reads a value by dotted key.
    pub fn get(&self, key: &str) -> Result<String> {
        Ok(match key {
            "paths.templates_dir" => self
                .paths
                .templates_dir
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
            "build.output_dir" => self.build.output_dir.display().to_string(),
            "build.write_readme" => self.build.write_readme.to_string(),
            _ => anyhow::bail!("Unknown config key: {key}"),
        })
    }
}
