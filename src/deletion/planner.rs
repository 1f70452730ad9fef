//! Deletion planning.
//!
//! `plan_deletion` is pure: it reads the graph, validates the candidate set
//! and produces the removal order, or rejects the whole set. Nothing is
//! mutated here.

use crate::pipeline::{NodeId, PipelineGraph};
use std::collections::{BTreeSet, HashMap};
use thiserror::Error;

// ==================== Candidate Set ====================

/// Nodes the caller wants removed, in caller order, without duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CandidateSet {
    order: Vec<NodeId>,
    index: HashMap<NodeId, usize>,
}

impl CandidateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(node: NodeId) -> Self {
        std::iter::once(node).collect()
    }

    /// Append `node`; returns false if it was already a candidate.
    pub fn push(&mut self, node: NodeId) -> bool {
        if self.index.contains_key(&node) {
            return false;
        }
        self.index.insert(node, self.order.len());
        self.order.push(node);
        true
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    /// Caller-order position of `node`.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        self.index.get(&node).copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.order
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.order.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl FromIterator<NodeId> for CandidateSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        let mut set = CandidateSet::new();
        for node in iter {
            set.push(node);
        }
        set
    }
}

// ==================== Plan ====================

/// Removal order in which every node has no consumers left when its turn comes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionPlan {
    order: Vec<NodeId>,
}

impl DeletionPlan {
    pub fn order(&self) -> &[NodeId] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl IntoIterator for DeletionPlan {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.order.into_iter()
    }
}

// ==================== Errors ====================

/// Coarse classification of a rejected plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectionKind {
    /// A candidate feeds a node outside the set. User visible, recoverable.
    ExternalDependency,
    /// The graph itself is broken. Not recoverable by changing the selection.
    InternalInconsistency,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("{node} is still consumed by {consumer}, which is not being deleted")]
    ExternalDependency { node: NodeId, consumer: NodeId },

    #[error("Consumer cycle among {remaining:?}")]
    Cycle { remaining: Vec<NodeId> },

    #[error("{0} is not in the pipeline")]
    StaleNode(NodeId),

    #[error("{node} lists consumer {consumer}, which is not in the pipeline")]
    StaleEdge { node: NodeId, consumer: NodeId },
}

impl PlanError {
    pub fn kind(&self) -> RejectionKind {
        match self {
            PlanError::ExternalDependency { .. } => RejectionKind::ExternalDependency,
            PlanError::Cycle { .. } | PlanError::StaleNode(_) | PlanError::StaleEdge { .. } => {
                RejectionKind::InternalInconsistency
            }
        }
    }

    pub fn is_recoverable(&self) -> bool {
        self.kind() == RejectionKind::ExternalDependency
    }
}

// ==================== Planning ====================

/// Validate `candidates` and compute their removal order.
///
/// Rejects the whole set if any candidate is consumed by a node outside it.
/// Each step removes the earliest candidate (in caller order) with no
/// remaining consumers.
pub fn plan_deletion(graph: &PipelineGraph, candidates: &CandidateSet) -> Result<DeletionPlan, PlanError> {
    if candidates.is_empty() {
        return Ok(DeletionPlan::default());
    }

    // Outstanding in-set consumers per candidate, indexed by caller position.
    let mut pending = Vec::with_capacity(candidates.len());
    // In-set producers per candidate, released when the candidate goes.
    let mut upstream: Vec<BTreeSet<usize>> = vec![BTreeSet::new(); candidates.len()];

    for (position, node_id) in candidates.iter().enumerate() {
        let node = graph.node(node_id).ok_or(PlanError::StaleNode(node_id))?;

        let mut count = 0usize;
        for consumer in node.consumers() {
            if !graph.contains(consumer) {
                return Err(PlanError::StaleEdge {
                    node: node_id,
                    consumer,
                });
            }
            if !candidates.contains(consumer) {
                return Err(PlanError::ExternalDependency {
                    node: node_id,
                    consumer,
                });
            }
            count += 1;
        }
        pending.push(count);

        for producer in node.producers() {
            if let Some(producer_position) = candidates.position(producer.node) {
                upstream[position].insert(producer_position);
            }
        }
    }

    let mut ready: BTreeSet<usize> = pending
        .iter()
        .enumerate()
        .filter(|(_, count)| **count == 0)
        .map(|(position, _)| position)
        .collect();

    let mut order = Vec::with_capacity(candidates.len());
    while let Some(position) = ready.pop_first() {
        let node_id = candidates.as_slice()[position];
        order.push(node_id);

        for &producer in &upstream[position] {
            let remaining = pending[producer]
                .checked_sub(1)
                .ok_or(PlanError::StaleEdge {
                    node: candidates.as_slice()[producer],
                    consumer: node_id,
                })?;
            pending[producer] = remaining;
            if remaining == 0 {
                ready.insert(producer);
            }
        }
    }

    if order.len() < candidates.len() {
        let remaining = candidates
            .iter()
            .filter(|node| !order.contains(node))
            .collect();
        return Err(PlanError::Cycle { remaining });
    }

    tracing::debug!("Planned deletion order {:?}", order);
    Ok(DeletionPlan { order })
}

/// Whether `candidates` is non-empty and can be deleted as a whole.
pub fn can_delete(graph: &PipelineGraph, candidates: &CandidateSet) -> bool {
    !candidates.is_empty() && plan_deletion(graph, candidates).is_ok()
}
