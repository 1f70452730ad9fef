//! Configuration module for pipeprune-rs
//!
//! This module handles engine configuration:
//! - Scalar bar policy consulted by the consistency updater
//! - Undo history depth
//! - Logging filter and log file for the command-line driver
//!
//! # Config Location
//!
//! The default config file lives in the platform config directory under
//! `dev.pipeprune`:
//! - **Linux**: `~/.config/dev.pipeprune/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.pipeprune/config.toml`
//! - **Windows**: `%APPDATA%\dev.pipeprune\config.toml`
//!
//! # Example
//!
//! ```ignore
//! use pipeprune_rs::config::{EngineConfig, ScalarBarMode};
//!
//! let mut config = EngineConfig::load_or_default();
//! config.general.scalar_bar_mode = ScalarBarMode::AutoShowHide;
//! config.save()?;
//! ```

pub mod settings;

pub use settings::*;

use crate::error::{PruneError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application identifier for config directories
pub const APP_ID: &str = "dev.pipeprune";

/// Config filename
pub const CONFIG_FILE: &str = "config.toml";

/// Default number of undo entries to keep
pub const DEFAULT_UNDO_DEPTH: usize = 100;

// ==================== Config Directory ====================

/// Get the application config directory path
pub fn config_dir() -> Option<PathBuf> {
    dirs_next::config_dir().map(|p| p.join(APP_ID))
}

/// Get the path to the default config file
pub fn config_path() -> Option<PathBuf> {
    config_dir().map(|p| p.join(CONFIG_FILE))
}

// ==================== Engine Config ====================

/// Persistent engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Version for future migration support
    #[serde(default = "default_config_version")]
    pub version: u32,

    #[serde(default)]
    pub general: GeneralSettings,

    #[serde(default)]
    pub undo: UndoSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

fn default_config_version() -> u32 {
    1
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            version: 1,
            general: GeneralSettings::default(),
            undo: UndoSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

impl EngineConfig {
    /// Load config from the default location, defaults if no file exists yet
    pub fn load() -> Result<Self> {
        let path = config_path().ok_or_else(|| {
            PruneError::Config("Could not determine config directory".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load config, returning defaults on any error
    pub fn load_or_default() -> Self {
        let (config, error) = Self::load_or_fallback();
        if let Some(e) = error {
            tracing::warn!("Failed to load config, using defaults: {}", e);
        }
        config
    }

    /// Load config, falling back to defaults and handing back the load error.
    ///
    /// For callers that can only log once the loaded settings have installed
    /// a subscriber.
    pub fn load_or_fallback() -> (Self, Option<PruneError>) {
        Self::or_fallback(Self::load())
    }

    fn or_fallback(loaded: Result<Self>) -> (Self, Option<PruneError>) {
        match loaded {
            Ok(config) => (config, None),
            Err(e) => (Self::default(), Some(e)),
        }
    }

    /// Load config from an explicit TOML file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            PruneError::Config(format!("Failed to read config {:?}: {}", path, e))
        })?;

        toml::from_str(&content)
            .map_err(|e| PruneError::Config(format!("Failed to parse config {:?}: {}", path, e)))
    }

    /// Save config to the default location
    pub fn save(&self) -> Result<()> {
        let path = config_path().ok_or_else(|| {
            PruneError::Config("Could not determine config directory".to_string())
        })?;
        self.save_to(path)
    }

    /// Save config as pretty TOML, creating parent directories
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                PruneError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| PruneError::Serialization(format!("Failed to serialize config: {}", e)))?;

        std::fs::write(path, content).map_err(|e| {
            PruneError::Config(format!("Failed to write config {:?}: {}", path, e))
        })
    }
}

// ==================== Tests ====================
