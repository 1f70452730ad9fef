//! The pipeline graph registry.
//!
//! `PipelineGraph` is the single owner of every node. Slots are indexed by
//! `NodeId`; an empty slot is a removed node and its id is never reused.
//! Adjacency is maintained incrementally on every connect/disconnect so the
//! deletion path can query consumers and producers without scanning.

use crate::pipeline::error::{GraphError, GraphResult};
use crate::pipeline::id::{NodeId, PortRef};
use crate::pipeline::node::Node;
use crate::pipeline::node_type::NodeKind;
use crate::pipeline::port::{InputSlot, PortDescriptor};
use std::collections::{BTreeMap, BTreeSet};

/// Owner of all pipeline nodes and their edges.
#[derive(Debug, Default)]
pub struct PipelineGraph {
    slots: Vec<Option<Node>>,
    live: usize,
    /// Bumped on every topology change.
    generation: u64,
}

impl PipelineGraph {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Construction ──

    /// Add a node with the given port names. Sources must not declare inputs.
    pub fn add_node(
        &mut self,
        name: impl Into<String>,
        kind: NodeKind,
        inputs: &[&str],
        outputs: &[&str],
    ) -> GraphResult<NodeId> {
        let id = NodeId(self.slots.len() as u32);
        if kind == NodeKind::Source && !inputs.is_empty() {
            return Err(GraphError::NotAFilter(id));
        }

        let node = Node::new(
            id,
            name.into(),
            kind,
            inputs.iter().map(|n| InputSlot::new(*n)).collect(),
            outputs.iter().map(|n| PortDescriptor::output(*n)).collect(),
        );
        self.slots.push(Some(node));
        self.live += 1;
        self.generation += 1;
        tracing::trace!("Added {} node {:?}", kind, id);
        Ok(id)
    }

    /// Add a source with a single output port.
    pub fn add_source(&mut self, name: impl Into<String>) -> NodeId {
        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(Node::new(
            id,
            name.into(),
            NodeKind::Source,
            Vec::new(),
            vec![PortDescriptor::output("Output")],
        )));
        self.live += 1;
        self.generation += 1;
        id
    }

    /// Add a single-output filter whose inputs are wired to `producers`, in order.
    pub fn add_filter(&mut self, name: impl Into<String>, producers: &[PortRef]) -> GraphResult<NodeId> {
        for producer in producers {
            self.check_output(*producer)?;
        }

        let input_names: Vec<String> = (0..producers.len())
            .map(|i| if i == 0 { "Input".to_string() } else { format!("Input{}", i) })
            .collect();
        let input_refs: Vec<&str> = input_names.iter().map(String::as_str).collect();
        let id = self.add_node(name, NodeKind::Filter, &input_refs, &["Output"])?;

        for (index, producer) in producers.iter().enumerate() {
            self.connect(*producer, id, index)?;
        }
        Ok(id)
    }

    /// Wire `producer` into input `input` of `consumer`, replacing any previous producer.
    pub fn connect(&mut self, producer: PortRef, consumer: NodeId, input: usize) -> GraphResult<()> {
        self.check_output(producer)?;
        let consumer_node = self.node(consumer).ok_or(GraphError::UnknownNode(consumer))?;
        if !consumer_node.kind().is_filter() {
            return Err(GraphError::NotAFilter(consumer));
        }
        if input >= consumer_node.inputs().len() {
            return Err(GraphError::PortOutOfRange {
                node: consumer,
                direction: "input",
                index: input,
            });
        }
        if producer.node == consumer {
            return Err(GraphError::SelfLoop(consumer));
        }
        if self.reaches(consumer, producer.node) {
            return Err(GraphError::CycleDetected {
                producer: producer.node,
                consumer,
            });
        }

        self.disconnect(consumer, input)?;
        self.slot_mut(consumer)?.set_producer(input, Some(producer));
        self.slot_mut(producer.node)?.add_consumer(consumer);
        self.generation += 1;
        Ok(())
    }

    /// Clear input `input` of `consumer`. Returns the producer it was wired to.
    pub fn disconnect(&mut self, consumer: NodeId, input: usize) -> GraphResult<Option<PortRef>> {
        let node = self.slot_mut(consumer)?;
        if input >= node.inputs().len() {
            return Err(GraphError::PortOutOfRange {
                node: consumer,
                direction: "input",
                index: input,
            });
        }

        let previous = node.set_producer(input, None);
        if let Some(producer) = previous {
            if let Some(producer_node) = self.slots.get_mut(producer.node.index()).and_then(Option::as_mut) {
                producer_node.release_consumer(consumer);
            }
            self.generation += 1;
        }
        Ok(previous)
    }

    // ── Queries ──

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(Node::name)
    }

    /// First live node with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<NodeId> {
        self.iter().find(|node| node.name() == name).map(Node::id)
    }

    /// Distinct nodes reading any output of `id`. Empty for unknown nodes.
    pub fn consumers_of(&self, id: NodeId) -> BTreeSet<NodeId> {
        self.node(id)
            .map(|node| node.consumers().collect())
            .unwrap_or_default()
    }

    /// Producer output wired into input `port_index` of `id`.
    pub fn producer_input_of(&self, id: NodeId, port_index: usize) -> Option<PortRef> {
        self.node(id).and_then(|node| node.producer(port_index))
    }

    /// The producer feeding a filter's first input, i.e. its immediate upstream.
    pub fn first_input_producer(&self, id: NodeId) -> Option<PortRef> {
        let node = self.node(id)?;
        if !node.kind().is_filter() {
            return None;
        }
        node.producer(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().filter_map(Option::as_ref)
    }

    pub fn node_ids(&self) -> Vec<NodeId> {
        self.iter().map(Node::id).collect()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.live == 0
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Check that every input link has a matching consumer entry on its producer
    /// and vice versa.
    pub fn is_symmetric(&self) -> bool {
        let mut expected: BTreeMap<(NodeId, NodeId), u32> = BTreeMap::new();
        for node in self.iter() {
            for producer in node.producers() {
                if !self.contains(producer.node) {
                    return false;
                }
                *expected.entry((producer.node, node.id())).or_insert(0) += 1;
            }
        }

        for node in self.iter() {
            for consumer in node.consumers() {
                let links = node.consumer_links(consumer);
                if expected.remove(&(node.id(), consumer)) != Some(links) {
                    return false;
                }
            }
        }
        expected.is_empty()
    }

    // ── Removal ──

    /// Remove a node and all of its input edges.
    ///
    /// Fails with `PreconditionViolation` while anything still consumes it.
    pub(crate) fn unregister(&mut self, id: NodeId) -> GraphResult<Node> {
        let node = self.node(id).ok_or(GraphError::UnknownNode(id))?;
        if node.has_consumers() {
            return Err(GraphError::PreconditionViolation {
                node: id,
                consumers: node.consumers().collect(),
            });
        }

        let node = self.slots[id.index()].take().ok_or(GraphError::UnknownNode(id))?;
        for producer in node.producers() {
            if let Some(producer_node) = self.slots.get_mut(producer.node.index()).and_then(Option::as_mut) {
                producer_node.release_consumer(id);
            }
        }
        self.live -= 1;
        self.generation += 1;
        debug_assert!(self.is_symmetric());
        Ok(node)
    }

    /// Drop every node. Returns the removed ids.
    pub(crate) fn clear(&mut self) -> Vec<NodeId> {
        let removed = self.node_ids();
        for slot in &mut self.slots {
            *slot = None;
        }
        self.live = 0;
        self.generation += 1;
        removed
    }

    // ── Internals ──

    fn slot_mut(&mut self, id: NodeId) -> GraphResult<&mut Node> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .ok_or(GraphError::UnknownNode(id))
    }

    fn check_output(&self, port: PortRef) -> GraphResult<()> {
        let node = self.node(port.node).ok_or(GraphError::UnknownNode(port.node))?;
        if port.port as usize >= node.output_count() {
            return Err(GraphError::PortOutOfRange {
                node: port.node,
                direction: "output",
                index: port.port as usize,
            });
        }
        Ok(())
    }

    /// Whether `target` is downstream of (or equal to) `from`.
    fn reaches(&self, from: NodeId, target: NodeId) -> bool {
        let mut visited = BTreeSet::new();
        let mut stack = vec![from];

        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            if let Some(node) = self.node(current) {
                stack.extend(node.consumers());
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain() -> (PipelineGraph, NodeId, NodeId, NodeId) {
        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");
        let f1 = graph.add_filter("F1", &[PortRef::primary(s1)]).unwrap();
        let f2 = graph.add_filter("F2", &[PortRef::primary(f1)]).unwrap();
        (graph, s1, f1, f2)
    }

    #[test]
    fn test_consumers_and_producers() {
        let (graph, s1, f1, f2) = chain();

        assert_eq!(graph.consumers_of(s1), BTreeSet::from([f1]));
        assert_eq!(graph.consumers_of(f1), BTreeSet::from([f2]));
        assert!(graph.consumers_of(f2).is_empty());
        assert_eq!(graph.producer_input_of(f2, 0), Some(PortRef::primary(f1)));
        assert_eq!(graph.producer_input_of(s1, 0), None);
        assert_eq!(graph.first_input_producer(f1), Some(PortRef::primary(s1)));
        assert!(graph.is_symmetric());
    }

    #[test]
    fn test_unregister_requires_no_consumers() {
        let (mut graph, s1, f1, f2) = chain();

        let err = graph.unregister(f1).unwrap_err();
        assert_eq!(
            err,
            GraphError::PreconditionViolation {
                node: f1,
                consumers: vec![f2],
            }
        );
        assert_eq!(graph.len(), 3);

        graph.unregister(f2).unwrap();
        assert!(graph.consumers_of(f1).is_empty());
        graph.unregister(f1).unwrap();
        assert!(graph.consumers_of(s1).is_empty());
        assert_eq!(graph.len(), 1);
        assert!(graph.is_symmetric());
    }

    #[test]
    fn test_unregister_unknown_node() {
        let (mut graph, _, _, f2) = chain();
        graph.unregister(f2).unwrap();
        assert_eq!(graph.unregister(f2).unwrap_err(), GraphError::UnknownNode(f2));
    }

    #[test]
    fn test_double_link_counts_once_as_consumer() {
        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");
        let f1 = graph
            .add_filter("Append", &[PortRef::primary(s1), PortRef::primary(s1)])
            .unwrap();

        assert_eq!(graph.consumers_of(s1).len(), 1);

        graph.disconnect(f1, 0).unwrap();
        assert_eq!(graph.consumers_of(s1), BTreeSet::from([f1]));

        graph.disconnect(f1, 1).unwrap();
        assert!(graph.consumers_of(s1).is_empty());
        assert!(graph.is_symmetric());
    }

    #[test]
    fn test_connect_rejects_cycles_and_self_loops() {
        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");
        let a = graph.add_filter("A", &[PortRef::primary(s1)]).unwrap();
        let b = graph.add_filter("B", &[PortRef::primary(a)]).unwrap();

        assert_eq!(
            graph.connect(PortRef::primary(b), a, 0).unwrap_err(),
            GraphError::CycleDetected { producer: b, consumer: a }
        );
        assert_eq!(
            graph.connect(PortRef::primary(a), a, 0).unwrap_err(),
            GraphError::SelfLoop(a)
        );
        assert_eq!(
            graph.connect(PortRef::primary(a), s1, 0).unwrap_err(),
            GraphError::NotAFilter(s1)
        );
    }

    #[test]
    fn test_connect_replaces_previous_producer() {
        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");
        let s2 = graph.add_source("S2");
        let f1 = graph.add_filter("F1", &[PortRef::primary(s1)]).unwrap();

        graph.connect(PortRef::primary(s2), f1, 0).unwrap();

        assert!(graph.consumers_of(s1).is_empty());
        assert_eq!(graph.consumers_of(s2), BTreeSet::from([f1]));
        assert!(graph.is_symmetric());
    }

    #[test]
    fn test_port_bounds_are_checked() {
        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");

        let err = graph.add_filter("F1", &[PortRef::new(s1, 3)]).unwrap_err();
        assert!(matches!(err, GraphError::PortOutOfRange { direction: "output", .. }));
        assert_eq!(graph.len(), 1);

        assert!(graph.add_node("Reader", NodeKind::Source, &["Input"], &["Output"]).is_err());
    }

    #[test]
    fn test_ids_are_not_reused() {
        let (mut graph, _, _, f2) = chain();
        graph.unregister(f2).unwrap();
        let s2 = graph.add_source("S2");
        assert_ne!(s2, f2);
        assert!(!graph.contains(f2));
    }

    #[test]
    fn test_clear_and_find_by_name() {
        let (mut graph, _, f1, _) = chain();
        assert_eq!(graph.find_by_name("F1"), Some(f1));
        let generation = graph.generation();

        let removed = graph.clear();
        assert_eq!(removed.len(), 3);
        assert!(graph.is_empty());
        assert!(graph.generation() > generation);
        assert_eq!(graph.find_by_name("F1"), None);
    }

    // Planner behavior on adjacency the public API cannot produce.

    #[test]
    fn test_forged_back_edge_is_reported_as_cycle() {
        use crate::deletion::{plan_deletion, CandidateSet, PlanError, RejectionKind};

        let mut graph = PipelineGraph::new();
        let s1 = graph.add_source("S1");
        let a = graph.add_filter("A", &[PortRef::primary(s1)]).unwrap();
        let b = graph.add_filter("B", &[PortRef::primary(a)]).unwrap();
        graph.slots[b.index()].as_mut().unwrap().add_consumer(a);

        let candidates: CandidateSet = [a, b].into_iter().collect();
        let err = plan_deletion(&graph, &candidates).unwrap_err();

        assert_eq!(err, PlanError::Cycle { remaining: vec![a, b] });
        assert_eq!(err.kind(), RejectionKind::InternalInconsistency);
        assert!(!err.is_recoverable());
        assert_eq!(graph.len(), 3);
    }

    #[test]
    fn test_dangling_consumer_is_reported_as_stale_edge() {
        use crate::deletion::{plan_deletion, CandidateSet, PlanError, RejectionKind};

        let (mut graph, _, _, f2) = chain();
        let ghost = NodeId(99);
        graph.slots[f2.index()].as_mut().unwrap().add_consumer(ghost);

        let err = plan_deletion(&graph, &CandidateSet::single(f2)).unwrap_err();

        assert_eq!(err, PlanError::StaleEdge { node: f2, consumer: ghost });
        assert_eq!(err.kind(), RejectionKind::InternalInconsistency);
        assert!(!graph.is_symmetric());
    }
}
