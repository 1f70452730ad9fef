//! RAII undo scopes.
//!
//! An `UndoScope` opens a transaction or exclusion on construction and closes
//! it exactly once on drop, so early returns through `?` cannot leave the
//! undo log with an unbalanced begin.

use super::{GraphChange, UndoStack};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Transaction,
    Exclusion,
}

/// Guard over an open undo transaction or exclusion.
pub struct UndoScope<'a> {
    stack: &'a mut dyn UndoStack,
    kind: ScopeKind,
}

impl<'a> UndoScope<'a> {
    /// Open a named transaction.
    pub fn transaction(stack: &'a mut dyn UndoStack, label: &str) -> Self {
        stack.begin_transaction(label);
        Self {
            stack,
            kind: ScopeKind::Transaction,
        }
    }

    /// Open a scope in which nothing is recorded.
    pub fn exclusion(stack: &'a mut dyn UndoStack) -> Self {
        stack.begin_exclusion();
        Self {
            stack,
            kind: ScopeKind::Exclusion,
        }
    }

    pub fn kind(&self) -> ScopeKind {
        self.kind
    }

    pub fn record(&mut self, change: GraphChange) {
        self.stack.record(change);
    }

    pub fn record_all(&mut self, changes: impl IntoIterator<Item = GraphChange>) {
        for change in changes {
            self.stack.record(change);
        }
    }
}

impl Drop for UndoScope<'_> {
    fn drop(&mut self) {
        match self.kind {
            ScopeKind::Transaction => self.stack.end_transaction(),
            ScopeKind::Exclusion => self.stack.end_exclusion(),
        }
    }
}
