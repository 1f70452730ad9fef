//! Identity types for the pipeline graph.
//!
//! `NodeId` and `ViewId` are newtypes over `u32`. Node ids are never reused
//! within one graph, so a stale id held by a collaborator can be detected
//! instead of silently aliasing a newer node.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a pipeline node (source or filter).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Identity of a view (render surface).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ViewId(pub u32);

impl fmt::Debug for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ViewId({})", self.0)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Reference to one output port of a node.
///
/// This is what an input port points at, what a representation displays,
/// and what the active selection focuses.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PortRef {
    pub node: NodeId,
    pub port: u16,
}

impl PortRef {
    pub const fn new(node: NodeId, port: u16) -> Self {
        Self { node, port }
    }

    /// The first output port of `node`.
    pub const fn primary(node: NodeId) -> Self {
        Self { node, port: 0 }
    }
}

impl fmt::Debug for PortRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PortRef(node={}, port={})", self.node.0, self.port)
    }
}
