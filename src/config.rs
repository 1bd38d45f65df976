//! User configuration and preferences

use crate::error::{DocshelfError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct UserConfig {
    /// Whether the welcome dialog has been shown
    pub welcome_shown: bool,
    /// Overrides the bundled documents directory
    pub bundle_dir: Option<PathBuf>,
    /// Overrides the writable documents directory
    pub documents_dir: Option<PathBuf>,
    /// List everything in one section instead of Bundle/Imported
    pub flat: bool,
}

impl UserConfig {
    /// Get the config file path (~/.config/docshelf/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docshelf").join("config.json"))
    }

    /// Load config from file, or create default if doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            DocshelfError::ConfigError("Could not determine config directory".to_string())
        })?;
        Self::load_from(&path)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path).map_err(|e| {
            DocshelfError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        serde_json::from_str(&contents).map_err(|e| {
            DocshelfError::ConfigError(format!("Failed to parse config file: {}", e))
        })
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            DocshelfError::ConfigError("Could not determine config directory".to_string())
        })?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                DocshelfError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self).map_err(|e| {
            DocshelfError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        fs::write(path, contents).map_err(|e| {
            DocshelfError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }
}

/// Root of the application's own data (~/.local/share/docshelf on Linux)
fn data_root() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("docshelf")
}

/// Default location of the read-only bundled documents
pub fn default_bundle_dir() -> PathBuf {
    data_root().join("Bundle")
}

/// Default location of the user's imported documents
pub fn default_documents_dir() -> PathBuf {
    data_root().join("Documents")
}

/// Where the interactive browser writes its log
pub fn default_log_path() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("docshelf")
        .join("docshelf.log")
}
