//! Engine notifications.
//!
//! State owners publish [`EngineEvent`]s on an [`EventBus`]; UI-side
//! observers such as the delete action subscribe and react on their own
//! schedule. Sends are fire-and-forget and disconnected subscribers are
//! pruned on the next publish.

use crate::pipeline::{NodeId, PortRef, ViewId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::BTreeSet;

/// Something observers may need to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    ActivePortChanged(Option<PortRef>),
    SelectionChanged,
    NodeUnregistered(NodeId),
    GraphReset,
    RenderRequested(BTreeSet<ViewId>),
}

#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Sender<EngineEvent>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Receiver<EngineEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.push(tx);
        rx
    }

    pub fn publish(&mut self, event: EngineEvent) {
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_all_subscribers() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        bus.publish(EngineEvent::NodeUnregistered(NodeId(3)));

        assert_eq!(a.try_recv().unwrap(), EngineEvent::NodeUnregistered(NodeId(3)));
        assert_eq!(b.try_recv().unwrap(), EngineEvent::NodeUnregistered(NodeId(3)));
    }

    #[test]
    fn test_dropped_subscriber_is_pruned() {
        let mut bus = EventBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        bus.publish(EngineEvent::GraphReset);

        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(kept.try_recv().unwrap(), EngineEvent::GraphReset);
    }
}
