//! Process-wide engine state.
//!
//! `Workspace` owns the graph, active objects, views and undo history, and
//! lends them to a [`DeletionCoordinator`] for each operation.

use crate::config::EngineConfig;
use crate::deletion::{CandidateSet, DeleteActionState, DeleteMode, DeletionCoordinator, DeletionReport, ResetReport};
use crate::error::Result;
use crate::pipeline::{NodeId, PipelineGraph};
use crate::selection::ActiveObjects;
use crate::undo::UndoHistory;
use crate::view::ViewRegistry;

#[derive(Debug, Default)]
pub struct Workspace {
    pub graph: PipelineGraph,
    pub active: ActiveObjects,
    pub views: ViewRegistry,
    pub undo: UndoHistory,
    config: EngineConfig,
}

impl Workspace {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            graph: PipelineGraph::new(),
            active: ActiveObjects::new(),
            views: ViewRegistry::new(config.general.scalar_bar_mode),
            undo: UndoHistory::new(config.undo.max_depth),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Apply new settings. The undo depth applies to histories created later.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.views.set_scalar_bar_mode(config.general.scalar_bar_mode);
        self.config = config;
    }

    pub fn coordinator(&mut self) -> DeletionCoordinator<'_> {
        DeletionCoordinator::new(&mut self.graph, &mut self.active, &mut self.views, &mut self.undo)
    }

    /// A delete action wired to this workspace's events, with its initial
    /// enable state computed.
    pub fn delete_action(&mut self, mode: DeleteMode) -> DeleteActionState {
        let mut action = DeleteActionState::new(mode, self.active.subscribe());
        action.update_enable_state(&self.graph, self.active.selection());
        action
    }

    /// Poll `action` against current state.
    pub fn refresh_action(&self, action: &mut DeleteActionState) -> bool {
        action.poll(&self.graph, self.active.selection())
    }

    // ==================== Shortcuts ====================

    pub fn run_deletion(&mut self, candidates: &CandidateSet) -> Result<DeletionReport> {
        self.coordinator().run_deletion(candidates)
    }

    pub fn delete_selected(&mut self) -> Result<DeletionReport> {
        self.coordinator().delete_selected()
    }

    pub fn delete_node(&mut self, node: NodeId) -> Result<DeletionReport> {
        self.coordinator().delete_node(node)
    }

    pub fn run_full_reset(&mut self) -> ResetReport {
        self.coordinator().run_full_reset()
    }
}
