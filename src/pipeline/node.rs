//! Pipeline node storage.
//!
//! A `Node` owns only its own ports. Links to other nodes are identifiers:
//! each input slot names the producer output it reads, and the producer keeps
//! a consumer multiplicity map so `consumers_of` never scans the graph.

use crate::pipeline::id::{NodeId, PortRef};
use crate::pipeline::node_type::NodeKind;
use crate::pipeline::port::{InputSlot, PortDescriptor};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One stage of the pipeline.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    kind: NodeKind,
    inputs: Vec<InputSlot>,
    outputs: Vec<PortDescriptor>,
    /// Consumer node -> number of input slots it wires to any of our outputs.
    consumers: BTreeMap<NodeId, u32>,
}

impl Node {
    pub(crate) fn new(
        id: NodeId,
        name: String,
        kind: NodeKind,
        inputs: Vec<InputSlot>,
        outputs: Vec<PortDescriptor>,
    ) -> Self {
        Self {
            id,
            name,
            kind,
            inputs,
            outputs,
            consumers: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn inputs(&self) -> &[InputSlot] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[PortDescriptor] {
        &self.outputs
    }

    pub fn output_count(&self) -> usize {
        self.outputs.len()
    }

    /// Producer wired into input `index`, if any.
    pub fn producer(&self, index: usize) -> Option<PortRef> {
        self.inputs.get(index).and_then(|slot| slot.producer)
    }

    /// Every connected producer, in input order.
    pub fn producers(&self) -> impl Iterator<Item = PortRef> + '_ {
        self.inputs.iter().filter_map(|slot| slot.producer)
    }

    pub fn consumers(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.consumers.keys().copied()
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    pub fn has_consumers(&self) -> bool {
        !self.consumers.is_empty()
    }

    pub(crate) fn set_producer(&mut self, index: usize, producer: Option<PortRef>) -> Option<PortRef> {
        std::mem::replace(&mut self.inputs[index].producer, producer)
    }

    pub(crate) fn add_consumer(&mut self, consumer: NodeId) {
        *self.consumers.entry(consumer).or_insert(0) += 1;
    }

    pub(crate) fn release_consumer(&mut self, consumer: NodeId) {
        if let Some(count) = self.consumers.get_mut(&consumer) {
            *count -= 1;
            if *count == 0 {
                self.consumers.remove(&consumer);
            }
        }
    }

    /// Number of input slots `consumer` wires to this node.
    pub(crate) fn consumer_links(&self, consumer: NodeId) -> u32 {
        self.consumers.get(&consumer).copied().unwrap_or(0)
    }

    /// Serializable capture of this node, used for undo records.
    pub fn snapshot(&self) -> NodeSnapshot {
        NodeSnapshot {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            inputs: self.inputs.clone(),
            outputs: self.outputs.clone(),
        }
    }
}

/// Detached copy of a node's identity and wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub id: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub inputs: Vec<InputSlot>,
    pub outputs: Vec<PortDescriptor>,
}
