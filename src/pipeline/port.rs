//! Port descriptors for pipeline nodes.
//!
//! Each node declares its ports when it is constructed. Input ports carry the
//! producer they are wired to; output ports are only described, the graph
//! tracks who consumes them.

use crate::pipeline::id::PortRef;
use serde::{Deserialize, Serialize};

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PortDirection {
    Input,
    Output,
}

/// Descriptor for a node's port.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortDescriptor {
    pub name: String,
    pub direction: PortDirection,
}

impl PortDescriptor {
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Input,
        }
    }

    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PortDirection::Output,
        }
    }
}

/// An input port together with its current wiring.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputSlot {
    pub descriptor: PortDescriptor,
    /// Producer output feeding this input, if connected.
    pub producer: Option<PortRef>,
}

impl InputSlot {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            descriptor: PortDescriptor::input(name),
            producer: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.producer.is_some()
    }
}
