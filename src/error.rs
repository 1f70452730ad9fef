//! Error handling for pipeprune-rs
//!
//! This module defines the crate-wide error type and a Result alias. Module
//! specific errors (`GraphError`, `PlanError`) convert into it with `?`.

use crate::deletion::PlanError;
use crate::pipeline::GraphError;
use thiserror::Error;

/// Main error type for pipeprune-rs operations
#[derive(Error, Debug)]
pub enum PruneError {
    /// A deletion was rejected during planning; nothing was mutated
    #[error("Deletion rejected: {0}")]
    Plan(#[from] PlanError),

    /// A graph mutation failed
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Errors related to configuration loading/saving
    #[error("Configuration error: {0}")]
    Config(String),

    /// Errors related to scene file contents
    #[error("Scene error: {0}")]
    Scene(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic errors with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<PruneError>,
    },
}

impl PruneError {
    /// Add context to an error
    pub fn with_context(self, context: impl Into<String>) -> Self {
        PruneError::WithContext {
            context: context.into(),
            source: Box::new(self),
        }
    }

    /// The planning rejection behind this error, looking through context layers
    pub fn as_plan_error(&self) -> Option<&PlanError> {
        match self {
            PruneError::Plan(err) => Some(err),
            PruneError::WithContext { source, .. } => source.as_plan_error(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for PruneError {
    fn from(err: serde_json::Error) -> Self {
        PruneError::Serialization(err.to_string())
    }
}

/// Result type alias for pipeprune-rs operations
pub type Result<T> = std::result::Result<T, PruneError>;

/// Extension trait for adding context to Results
pub trait ResultExt<T> {
    /// Add context to an error result
    fn context(self, context: impl Into<String>) -> Result<T>;

    /// Add context lazily to an error result
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<PruneError>,
{
    fn context(self, context: impl Into<String>) -> Result<T> {
        self.map_err(|e| e.into().with_context(context))
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| e.into().with_context(f()))
    }
}
