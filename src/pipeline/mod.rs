//! Pipeline graph model.
//!
//! Data flows from sources through filters. Each filter input reads one
//! producer output port; an output port may fan out to many consumers.
//!
//! # Architecture
//!
//! ```text
//! [Reader] ──► [Clip] ──► [Contour]
//!          └─► [Slice]
//! ```
//!
//! # Design
//!
//! - **Central registry**: `PipelineGraph` owns every `Node`; nodes refer to
//!   each other by `NodeId` only, never by reference.
//! - **Maintained adjacency**: producers keep a consumer multiplicity map,
//!   updated on connect/disconnect/unregister, so consumer and producer
//!   queries are O(1) amortized.
//! - **Single removal path**: `unregister` is crate-private and only reachable
//!   through the deletion coordinator.

pub mod error;
pub mod graph;
pub mod id;
pub mod node;
pub mod node_type;
pub mod port;

pub use error::{GraphError, GraphResult};
pub use graph::PipelineGraph;
pub use id::{NodeId, PortRef, ViewId};
pub use node::{Node, NodeSnapshot};
pub use node_type::NodeKind;
pub use port::{InputSlot, PortDescriptor, PortDirection};
