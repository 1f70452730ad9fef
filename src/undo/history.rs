//! In-memory undo history.

use super::{GraphChange, UndoStack};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// One closed, undoable transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UndoEntry {
    pub label: String,
    pub changes: Vec<GraphChange>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug)]
struct OpenTransaction {
    label: String,
    changes: Vec<GraphChange>,
    nesting: usize,
}

/// Bounded undo history. The oldest entries are dropped past `max_depth`.
#[derive(Debug)]
pub struct UndoHistory {
    entries: VecDeque<UndoEntry>,
    open: Option<OpenTransaction>,
    exclusion_depth: usize,
    max_depth: usize,
}

impl Default for UndoHistory {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_UNDO_DEPTH)
    }
}

impl UndoHistory {
    pub fn new(max_depth: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            open: None,
            exclusion_depth: 0,
            max_depth,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &UndoEntry> {
        self.entries.iter()
    }

    /// Most recent entry.
    pub fn last(&self) -> Option<&UndoEntry> {
        self.entries.back()
    }

    pub fn in_transaction(&self) -> bool {
        self.open.is_some()
    }

    pub fn is_excluded(&self) -> bool {
        self.exclusion_depth > 0
    }

    /// Remove and return the most recent entry.
    pub fn pop(&mut self) -> Option<UndoEntry> {
        self.entries.pop_back()
    }

    fn push(&mut self, entry: UndoEntry) {
        if self.max_depth == 0 {
            return;
        }
        while self.entries.len() >= self.max_depth {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }
}

impl UndoStack for UndoHistory {
    fn begin_transaction(&mut self, label: &str) {
        match &mut self.open {
            Some(open) => open.nesting += 1,
            None => {
                self.open = Some(OpenTransaction {
                    label: label.to_string(),
                    changes: Vec::new(),
                    nesting: 1,
                });
            }
        }
    }

    fn end_transaction(&mut self) {
        let Some(open) = &mut self.open else {
            tracing::warn!("end_transaction without an open transaction");
            return;
        };
        open.nesting -= 1;
        if open.nesting > 0 {
            return;
        }

        if let Some(open) = self.open.take() {
            if open.changes.is_empty() {
                tracing::trace!("Dropping empty undo transaction '{}'", open.label);
                return;
            }
            tracing::debug!(
                "Recorded undo entry '{}' ({} changes)",
                open.label,
                open.changes.len()
            );
            self.push(UndoEntry {
                label: open.label,
                changes: open.changes,
                recorded_at: Utc::now(),
            });
        }
    }

    fn begin_exclusion(&mut self) {
        self.exclusion_depth += 1;
    }

    fn end_exclusion(&mut self) {
        if self.exclusion_depth == 0 {
            tracing::warn!("end_exclusion without an open exclusion");
            return;
        }
        self.exclusion_depth -= 1;
    }

    fn record(&mut self, change: GraphChange) {
        if self.is_excluded() {
            return;
        }
        if let Some(open) = &mut self.open {
            open.changes.push(change);
        }
    }

    fn clear_history(&mut self) {
        self.entries.clear();
    }

    fn depth(&self) -> usize {
        self.entries.len()
    }
}
