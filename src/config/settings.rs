//! General engine settings.
//!
//! These are the user preferences the deletion engine consults while it
//! runs. They are grouped by concern and persisted as part of
//! [`EngineConfig`](super::EngineConfig).
//!
//! # Main Types
//!
//! - [`GeneralSettings`] - Scalar bar policy
//! - [`UndoSettings`] - Undo history limits
//! - [`LoggingSettings`] - Log filter and optional log file

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Global policy for scalar bar (color legend) visibility.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ScalarBarMode {
    /// Scalar bars are only ever shown or hidden by the user.
    ManualOnly,
    /// Show scalar bars when a scalar-colored representation becomes visible,
    /// hide them when nothing uses them anymore.
    AutoShowHide,
    /// Only hide scalar bars that nothing uses anymore.
    #[default]
    AutoHideOnly,
}

impl ScalarBarMode {
    /// Whether unused scalar bars are hidden automatically.
    pub fn hides_unused(&self) -> bool {
        matches!(self, ScalarBarMode::AutoShowHide | ScalarBarMode::AutoHideOnly)
    }

    /// Whether scalar bars are shown automatically with their representation.
    pub fn shows_automatically(&self) -> bool {
        matches!(self, ScalarBarMode::AutoShowHide)
    }
}

impl std::fmt::Display for ScalarBarMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScalarBarMode::ManualOnly => write!(f, "Manual"),
            ScalarBarMode::AutoShowHide => write!(f, "Automatically show and hide"),
            ScalarBarMode::AutoHideOnly => write!(f, "Automatically hide"),
        }
    }
}

/// Application-wide preferences.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneralSettings {
    #[serde(default)]
    pub scalar_bar_mode: ScalarBarMode,
}

/// Undo history limits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UndoSettings {
    /// Maximum number of undo entries kept; the oldest are dropped first.
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

fn default_max_depth() -> usize {
    super::DEFAULT_UNDO_DEPTH
}

impl Default for UndoSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
        }
    }
}

/// Logging configuration used by the command-line driver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is not set.
    #[serde(default = "default_filter")]
    pub filter: String,

    /// Optional log file; logs go to stderr only when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_filter() -> String {
    "info,pipeprune_rs=debug".to_string()
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: default_filter(),
            file: None,
        }
    }
}
