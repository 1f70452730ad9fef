//! Undo log boundaries.
//!
//! The deletion engine only needs the transactional shape of the undo log:
//! named, nestable transactions, exclusion scopes that suppress recording,
//! and a way to wipe history. The storage format of entries is up to the
//! implementation.
//!
//! # Main Types
//!
//! - [`UndoStack`] - The collaborator trait the coordinator drives
//! - [`UndoHistory`] - In-memory implementation with a bounded entry list
//! - [`UndoScope`] - RAII guard closing a transaction or exclusion on drop
//! - [`GraphChange`] - One recorded state change

pub mod history;
pub mod scope;

pub use history::{UndoEntry, UndoHistory};
pub use scope::{ScopeKind, UndoScope};

use crate::pipeline::{NodeSnapshot, PortRef, ViewId};
use serde::{Deserialize, Serialize};

/// A single reversible change recorded inside a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GraphChange {
    /// A node was unregistered; the snapshot holds its identity and wiring.
    NodeRemoved(NodeSnapshot),
    ActivePortChanged {
        from: Option<PortRef>,
        to: Option<PortRef>,
    },
    VisibilityChanged {
        view: ViewId,
        port: PortRef,
        visible: bool,
    },
    ScalarBarShown { view: ViewId, port: PortRef },
}

/// Transactional interface of the undo log.
///
/// Begin/end calls are strictly nested. Prefer [`UndoScope`] over calling
/// them directly.
#[cfg_attr(test, mockall::automock)]
pub trait UndoStack {
    /// Open a named transaction. Nested transactions fold into the outermost.
    fn begin_transaction(&mut self, label: &str);

    fn end_transaction(&mut self);

    /// Open a scope in which nothing is recorded.
    fn begin_exclusion(&mut self);

    fn end_exclusion(&mut self);

    /// Record a change into the open transaction. Dropped when excluded or
    /// when no transaction is open.
    fn record(&mut self, change: GraphChange);

    /// Forget every undo entry.
    fn clear_history(&mut self);

    /// Number of undoable entries.
    fn depth(&self) -> usize;
}
