//! Configuration module for mfind-exif
//!
//! Holds user-defined tag aliases and the default verbosity. Configuration is
//! stored as TOML in the user's config directory
//! (`~/.config/mfind-exif/config.toml` on Linux):
//!
//! ```toml
//! verbosity = 1
//!
//! [aliases]
//! fnumber = "Exif.Photo.FNumber"
//! orientation = "Exif.Image.Orientation"
//! ```

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use config::{Config, ConfigError, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::aliases::AliasTable;

/// Extension configuration
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, Eq)]
pub struct ExifConfig {
    /// Extra short names, layered over the built-in aliases
    #[serde(default)]
    pub aliases: HashMap<String, String>,

    /// Diagnostic level used when the host does not pass one
    #[serde(default)]
    pub verbosity: u8,
}

impl ExifConfig {
    /// Get the path to the config file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the system config directory cannot be determined.
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| ConfigError::Message("Could not determine config directory".to_string()))?;

        Ok(config_dir.join("mfind-exif").join("config.toml"))
    }

    /// Load configuration from the default location
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the config directory is unknown or the file cannot be parsed.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load configuration from `path`, falling back to defaults when it does not exist
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the file exists but cannot be read or parsed.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let settings = Config::builder()
            .add_source(File::from(path).format(FileFormat::Toml))
            .build()?;

        settings.try_deserialize()
    }

    /// Parse configuration from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the text is not valid configuration TOML.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(text, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Save configuration to `path`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the parent directory cannot be created, the configuration
    /// cannot be serialized to TOML, or the file cannot be written.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Message(format!("Failed to create config directory: {e}")))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::Message(format!("Failed to serialize config: {e}")))?;

        fs::write(path, toml_string)
            .map_err(|e| ConfigError::Message(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Built-in aliases merged with the configured ones
    #[must_use]
    pub fn alias_table(&self) -> AliasTable {
        AliasTable::with_overrides(
            self.aliases
                .iter()
                .map(|(short, key)| (short.clone(), key.clone())),
        )
    }
}
