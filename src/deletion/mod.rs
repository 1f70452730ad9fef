//! Pipeline deletion engine.
//!
//! Deciding whether a set of nodes can go, in which order, and what else has
//! to change so nothing dangles afterwards.
//!
//! # Architecture
//!
//! ```text
//! candidates ──► planner ──► DeletionPlan
//!                   │             │
//!                reject      coordinator ── UndoScope (one transaction)
//!                               │
//!                  for each node in order:
//!                    consistency::before_removal ──► graph.unregister
//!                               │
//!                  scalar bar sweep ──► close ──► one RenderRequest
//! ```
//!
//! # Design
//!
//! - **Validate, then mutate**: the whole plan is computed before the first
//!   node is touched. A rejected plan leaves every collaborator untouched.
//! - **Deterministic order**: among removable candidates the earliest in
//!   caller order always goes first.
//! - **Single redraw**: views touched during the batch are collected and one
//!   render request is issued after the transaction closes.

pub mod action;
pub mod consistency;
pub mod coordinator;
pub mod planner;

pub use action::{DeleteActionState, DeleteMode};
pub use consistency::{ConsistencyUpdater, RemovalAdjustments};
pub use coordinator::{DeletionCoordinator, DeletionReport, ResetReport};
pub use planner::{can_delete, plan_deletion, CandidateSet, DeletionPlan, PlanError, RejectionKind};
