//! Configuration management for the codec.
//!
//! This module handles loading, validating, and saving codec settings in
//! TOML format with platform-specific directory resolution.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::constants::APP_NAME;

/// Output formatting of written project files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Indentation per nesting level (spaces or tabs)
    pub indent: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            indent: "  ".to_string(),
        }
    }
}

/// Locale used when a project has none and the system locale is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocaleConfig {
    /// ISO 639-1 language code (e.g., "en")
    pub language: String,
    /// ISO 3166 country code (e.g., "GB")
    pub country: String,
}

/// Codec configuration.
///
/// # Validation
///
/// - `output.indent` may only contain spaces and tabs
/// - `fallback_locale` codes must be two characters long
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CodecConfig {
    /// Output formatting
    pub output: OutputConfig,
    /// Fallback document locale
    pub fallback_locale: Option<LocaleConfig>,
}

impl CodecConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets the platform-specific config directory path.
    ///
    /// - Linux: `~/.config/ywcodec/`
    /// - macOS: `~/Library/Application Support/ywcodec/`
    /// - Windows: `%APPDATA%\ywcodec\`
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to determine config directory")?
            .join(APP_NAME);

        Ok(config_dir)
    }

    /// Gets the full path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Loads configuration from the user's config file.
    ///
    /// If the file doesn't exist, returns default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the config directory cannot be determined or the
    /// file is unreadable or invalid.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    /// Loads configuration from a specific file.
    ///
    /// If the file doesn't exist, returns default configuration.
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

    /// Saves configuration to a specific file.
    ///
    /// Uses temp file + rename pattern for atomic writes.
    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        self.validate()?;

        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;
        let temp_path = config_path.with_extension("toml.tmp");

        fs::write(&temp_path, content).context(format!(
            "Failed to write temp config file: {}",
            temp_path.display()
        ))?;

        fs::rename(&temp_path, config_path).context(format!(
            "Failed to rename temp config file to: {}",
            config_path.display()
        ))?;

        Ok(())
    }

    /// Validates configuration values.
    pub fn validate(&self) -> Result<()> {
        if !self.output.indent.chars().all(|c| c == ' ' || c == '\t') {
            anyhow::bail!(
                "Indent {:?} may only contain spaces and tabs",
                self.output.indent
            );
        }

        if let Some(locale) = &self.fallback_locale {
            for (kind, code) in [("language", &locale.language), ("country", &locale.country)] {
                if code.chars().count() != 2 {
                    anyhow::bail!("Fallback {kind} code '{code}' must have two characters");
                }
            }
        }

        Ok(())
    }

    /// The fallback locale as `(language, country)`.
    pub fn fallback_locale(&self) -> Option<(String, String)> {
        self.fallback_locale
            .as_ref()
            .map(|locale| (locale.language.clone(), locale.country.clone()))
    }
}
