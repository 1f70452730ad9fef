//! Node kind enumeration.
//!
//! Sources produce data without inputs (readers, generators); filters consume
//! at least one upstream output.

use serde::{Deserialize, Serialize};

/// The two kinds of pipeline stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    /// A stage with no input ports (reader, generator).
    Source,
    /// A stage that consumes one or more upstream outputs.
    Filter,
}

impl NodeKind {
    /// Get the display name for this node kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Source => "Source",
            NodeKind::Filter => "Filter",
        }
    }

    /// Whether nodes of this kind have consumable inputs.
    pub fn is_filter(&self) -> bool {
        matches!(self, NodeKind::Filter)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
