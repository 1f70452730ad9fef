//! Enable/disable state of the delete actions.
//!
//! The UI keeps one `DeleteActionState` per delete action. It listens on the
//! engine event bus and recomputes `enabled` whenever the selection, the
//! active port, or the graph changes.

use super::planner;
use crate::events::EngineEvent;
use crate::pipeline::PipelineGraph;
use crate::selection::SelectionModel;
use crossbeam_channel::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
    /// Delete the current selection.
    Selected,
    /// Reset the whole pipeline.
    All,
}

#[derive(Debug)]
pub struct DeleteActionState {
    mode: DeleteMode,
    enabled: bool,
    events: Receiver<EngineEvent>,
}

impl DeleteActionState {
    pub fn new(mode: DeleteMode, events: Receiver<EngineEvent>) -> Self {
        Self {
            mode,
            enabled: mode == DeleteMode::All,
            events,
        }
    }

    pub fn mode(&self) -> DeleteMode {
        self.mode
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    /// Drain pending events and refresh `enabled` if any arrived.
    ///
    /// Returns whether the state was refreshed.
    pub fn poll(&mut self, graph: &PipelineGraph, selection: &SelectionModel) -> bool {
        let mut pending = false;
        while self.events.try_recv().is_ok() {
            pending = true;
        }
        if pending {
            self.update_enable_state(graph, selection);
        }
        pending
    }

    pub fn update_enable_state(&mut self, graph: &PipelineGraph, selection: &SelectionModel) {
        self.enabled = match self.mode {
            DeleteMode::All => true,
            DeleteMode::Selected => planner::can_delete(graph, &selection.candidate_set()),
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::{NodeId, PortRef};
    use crate::selection::{ActiveObjects, SelectionItem};

    #[test]
    fn test_delete_selected_tracks_selection() {
        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");
        let f1 = graph.add_filter("F1", &[PortRef::primary(s1)]).unwrap();

        let mut active = ActiveObjects::new();
        let mut action = DeleteActionState::new(DeleteMode::Selected, active.subscribe());
        assert!(!action.enabled());

        active.select([SelectionItem::Node(f1)]);
        assert!(action.poll(&graph, active.selection()));
        assert!(action.enabled());

        active.select([SelectionItem::Node(s1)]);
        action.poll(&graph, active.selection());
        assert!(!action.enabled());

        assert!(!action.poll(&graph, active.selection()), "no new events");
    }

    #[test]
    fn test_delete_all_is_always_enabled() {
        let graph = PipelineGraph::new();
        let mut active = ActiveObjects::new();
        let mut action = DeleteActionState::new(DeleteMode::All, active.subscribe());
        assert!(action.enabled());

        active.select([SelectionItem::Node(NodeId(7))]);
        action.poll(&graph, active.selection());
        assert!(action.enabled());
        assert_eq!(action.mode(), DeleteMode::All);
    }
}
