//! Transactional deletion.
//!
//! `DeletionCoordinator` borrows every piece of state a deletion touches for
//! the duration of one operation. A batch is validated up front, applied
//! inside a single undo transaction, and followed by exactly one redraw.

use super::consistency::ConsistencyUpdater;
use super::planner::{self, CandidateSet, DeletionPlan, PlanError};
use crate::error::Result;
use crate::events::EngineEvent;
use crate::pipeline::{NodeId, PipelineGraph, PortRef, ViewId};
use crate::selection::ActiveObjects;
use crate::undo::{GraphChange, UndoScope, UndoStack};
use crate::view::{RenderRequest, ViewLayer, ViewService};
use serde::Serialize;
use std::collections::BTreeSet;

/// Undo label for multi-node deletions.
pub const DELETE_SELECTION_LABEL: &str = "Delete Selection";

/// Outcome of a completed deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeletionReport {
    /// Undo label; empty when nothing was deleted.
    pub label: String,
    /// Removed nodes in removal order.
    pub removed: Vec<NodeId>,
    /// Active port after the deletion.
    pub active_port: Option<PortRef>,
    pub scalar_bars_hidden: usize,
    pub dirty_views: BTreeSet<ViewId>,
}

impl DeletionReport {
    pub fn is_empty(&self) -> bool {
        self.removed.is_empty()
    }
}

/// Outcome of a full reset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ResetReport {
    pub removed: usize,
}

pub struct DeletionCoordinator<'a> {
    graph: &'a mut PipelineGraph,
    active: &'a mut ActiveObjects,
    views: &'a mut dyn ViewLayer,
    undo: &'a mut dyn UndoStack,
}

impl<'a> DeletionCoordinator<'a> {
    pub fn new(
        graph: &'a mut PipelineGraph,
        active: &'a mut ActiveObjects,
        views: &'a mut dyn ViewLayer,
        undo: &'a mut dyn UndoStack,
    ) -> Self {
        Self {
            graph,
            active,
            views,
            undo,
        }
    }

    // ==================== Queries ====================

    pub fn plan_deletion(&self, candidates: &CandidateSet) -> std::result::Result<DeletionPlan, PlanError> {
        planner::plan_deletion(self.graph, candidates)
    }

    pub fn can_delete(&self, candidates: &CandidateSet) -> bool {
        planner::can_delete(self.graph, candidates)
    }

    /// Whether the current selection can be deleted as a whole.
    pub fn can_delete_selected(&self) -> bool {
        self.can_delete(&self.active.selection().candidate_set())
    }

    // ==================== Deletion ====================

    /// Delete `candidates` as one undoable operation.
    ///
    /// A rejected plan mutates nothing. An empty candidate set opens no
    /// transaction and requests no redraw.
    pub fn run_deletion(&mut self, candidates: &CandidateSet) -> Result<DeletionReport> {
        if candidates.is_empty() {
            return Ok(DeletionReport::default());
        }

        let plan = self.plan_deletion(candidates).inspect_err(|err| {
            tracing::warn!("Deletion of {} node(s) rejected: {}", candidates.len(), err);
        })?;
        self.apply(plan)
    }

    /// Delete whatever the selection model holds. Selected ports stand in for
    /// their owning node.
    pub fn delete_selected(&mut self) -> Result<DeletionReport> {
        let candidates = self.active.selection().candidate_set();
        if candidates.is_empty() {
            tracing::error!("Cannot delete: nothing is selected");
            return Ok(DeletionReport::default());
        }

        match self.plan_deletion(&candidates) {
            Ok(plan) => self.apply(plan),
            Err(err) => {
                tracing::error!("Cannot delete the selection: {}", err);
                Err(err.into())
            }
        }
    }

    pub fn delete_node(&mut self, node: NodeId) -> Result<DeletionReport> {
        self.run_deletion(&CandidateSet::single(node))
    }

    fn apply(&mut self, plan: DeletionPlan) -> Result<DeletionReport> {
        if plan.is_empty() {
            return Ok(DeletionReport::default());
        }

        let label = match plan.order() {
            [only] => format!("Delete {}", self.graph.name(*only).unwrap_or("node")),
            _ => DELETE_SELECTION_LABEL.to_string(),
        };

        let mut report = DeletionReport {
            label,
            ..Default::default()
        };

        {
            let mut scope = UndoScope::transaction(&mut *self.undo, &report.label);

            for node in plan {
                let adjustments = ConsistencyUpdater::before_removal(self.graph, self.active, self.views, node);
                scope.record_all(adjustments.changes());
                report.dirty_views.extend(adjustments.dirty_views);

                let removed = self.graph.unregister(node)?;
                self.views.forget_node(node);
                self.active.deselect_node(node);
                self.active.events_mut().publish(EngineEvent::NodeUnregistered(node));
                scope.record(GraphChange::NodeRemoved(removed.snapshot()));

                tracing::debug!("Removed {} '{}'", node, removed.name());
                report.removed.push(node);
            }

            report.scalar_bars_hidden = ConsistencyUpdater::sweep_scalar_bars(self.views);
        }

        self.request_render(report.dirty_views.clone());
        report.active_port = self.active.active_port();

        tracing::info!("{}: removed {} node(s)", report.label, report.removed.len());
        Ok(report)
    }

    // ==================== Reset ====================

    /// Remove every node without dependency checks and wipe undo history.
    pub fn run_full_reset(&mut self) -> ResetReport {
        let removed = {
            let _scope = UndoScope::exclusion(&mut *self.undo);
            let removed = self.graph.clear();
            self.views.forget_all();
            self.active.clear();
            removed
        };
        self.undo.clear_history();

        self.active.events_mut().publish(EngineEvent::GraphReset);
        let all_views = self.views.view_ids().into_iter().collect();
        self.request_render(all_views);

        tracing::info!("Reset pipeline, removed {} node(s)", removed.len());
        ResetReport {
            removed: removed.len(),
        }
    }

    fn request_render(&mut self, dirty_views: BTreeSet<ViewId>) {
        self.views.request_render(RenderRequest {
            dirty_views: dirty_views.clone(),
        });
        self.active
            .events_mut()
            .publish(EngineEvent::RenderRequested(dirty_views));
    }
}
