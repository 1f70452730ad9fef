//! Active objects and selection.
//!
//! [`ActiveObjects`] is the explicit replacement for a process-wide "active
//! object" singleton: it holds the focused output port and the ordered
//! [`SelectionModel`], and publishes [`EngineEvent`]s whenever either changes.
//! It is passed by reference into the deletion coordinator.

pub mod model;

pub use model::{SelectionItem, SelectionModel};

use crate::events::{EngineEvent, EventBus};
use crate::pipeline::{NodeId, PortRef};
use crossbeam_channel::Receiver;

#[derive(Debug, Default)]
pub struct ActiveObjects {
    active_port: Option<PortRef>,
    selection: SelectionModel,
    events: EventBus,
}

impl ActiveObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active_port(&self) -> Option<PortRef> {
        self.active_port
    }

    pub fn active_node(&self) -> Option<NodeId> {
        self.active_port.map(|port| port.node)
    }

    /// Point the active selection at `port`. Publishes only on change.
    pub fn set_active_port(&mut self, port: Option<PortRef>) {
        if self.active_port == port {
            return;
        }
        self.active_port = port;
        self.events.publish(EngineEvent::ActivePortChanged(port));
    }

    pub fn selection(&self) -> &SelectionModel {
        &self.selection
    }

    /// Replace the selection.
    pub fn select(&mut self, items: impl IntoIterator<Item = SelectionItem>) {
        self.selection = items.into_iter().collect();
        self.events.publish(EngineEvent::SelectionChanged);
    }

    /// Drop `node` and its ports from the selection.
    pub fn deselect_node(&mut self, node: NodeId) {
        if self.selection.remove_node(node) {
            self.events.publish(EngineEvent::SelectionChanged);
        }
    }

    /// Null the active port and empty the selection.
    pub fn clear(&mut self) {
        self.set_active_port(None);
        if !self.selection.is_empty() {
            self.selection.clear();
            self.events.publish(EngineEvent::SelectionChanged);
        }
    }

    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        self.events.subscribe()
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_active_port_publishes_on_change_only() {
        let mut active = ActiveObjects::new();
        let rx = active.subscribe();
        let port = Some(PortRef::primary(NodeId(2)));

        active.set_active_port(port);
        active.set_active_port(port);

        assert_eq!(rx.try_recv().unwrap(), EngineEvent::ActivePortChanged(port));
        assert!(rx.try_recv().is_err());
        assert_eq!(active.active_node(), Some(NodeId(2)));
    }

    #[test]
    fn test_deselect_node_and_clear() {
        let mut active = ActiveObjects::new();
        active.select([
            SelectionItem::Node(NodeId(1)),
            SelectionItem::Port(PortRef::new(NodeId(2), 1)),
        ]);
        let rx = active.subscribe();

        active.deselect_node(NodeId(2));
        assert_eq!(rx.try_recv().unwrap(), EngineEvent::SelectionChanged);
        assert_eq!(active.selection().len(), 1);

        active.deselect_node(NodeId(9));
        assert!(rx.try_recv().is_err());

        active.set_active_port(Some(PortRef::primary(NodeId(1))));
        active.clear();
        assert!(active.active_port().is_none());
        assert!(active.selection().is_empty());
    }
}
