//! Graph-model error types.

use crate::pipeline::id::NodeId;
use thiserror::Error;

/// Errors raised by graph construction and removal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Unknown node {0:?}")]
    UnknownNode(NodeId),

    #[error("Node {node:?} still has consumers {consumers:?}")]
    PreconditionViolation {
        node: NodeId,
        consumers: Vec<NodeId>,
    },

    #[error("Node {node:?} has no {direction} port {index}")]
    PortOutOfRange {
        node: NodeId,
        direction: &'static str,
        index: usize,
    },

    #[error("Connecting {producer:?} -> {consumer:?} would create a cycle")]
    CycleDetected { producer: NodeId, consumer: NodeId },

    #[error("Cannot connect node {0:?} to itself")]
    SelfLoop(NodeId),

    #[error("Node {0:?} is a source and accepts no input")]
    NotAFilter(NodeId),
}

pub type GraphResult<T> = std::result::Result<T, GraphError>;
