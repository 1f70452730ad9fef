//! Ordered selection model.

use crate::deletion::CandidateSet;
use crate::pipeline::{NodeId, PortRef};

/// A selected pipeline item. Ports stand in for their owning node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectionItem {
    Node(NodeId),
    Port(PortRef),
}

impl SelectionItem {
    pub fn node(&self) -> NodeId {
        match self {
            SelectionItem::Node(node) => *node,
            SelectionItem::Port(port) => port.node,
        }
    }
}

impl From<NodeId> for SelectionItem {
    fn from(node: NodeId) -> Self {
        SelectionItem::Node(node)
    }
}

impl From<PortRef> for SelectionItem {
    fn from(port: PortRef) -> Self {
        SelectionItem::Port(port)
    }
}

/// Selected items in the order the user picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    items: Vec<SelectionItem>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `item` unless already selected.
    pub fn push(&mut self, item: SelectionItem) {
        if !self.items.contains(&item) {
            self.items.push(item);
        }
    }

    pub fn items(&self) -> &[SelectionItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Remove every item belonging to `node`. Returns whether anything changed.
    pub fn remove_node(&mut self, node: NodeId) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.node() != node);
        self.items.len() != before
    }

    /// Owning nodes of the selection, in selection order, without duplicates.
    pub fn candidate_set(&self) -> CandidateSet {
        self.items.iter().map(SelectionItem::node).collect()
    }
}

impl FromIterator<SelectionItem> for SelectionModel {
    fn from_iter<I: IntoIterator<Item = SelectionItem>>(iter: I) -> Self {
        let mut model = SelectionModel::new();
        for item in iter {
            model.push(item);
        }
        model
    }
}
