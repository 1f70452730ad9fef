//! # pipeprune-rs: Pipeline Deletion Engine
//!
//! Decides which processing nodes can be removed from a live data-flow
//! pipeline, in what order, and keeps everything that pointed at them
//! consistent: the active selection, view visibility, and scalar bars.
//!
//! ## Architecture
//!
//! - **Pipeline**: Node registry with maintained producer/consumer adjacency
//! - **Deletion**: Planner (validate + order), consistency updater, and the
//!   transactional coordinator
//! - **Collaborators**: View/scalar bar services and the undo log are traits,
//!   with in-memory implementations in `view` and `undo`
//! - **Notifications**: Crossbeam channels carry engine events and redraw
//!   requests to whoever listens
//!
//! ## Configuration
//!
//! Engine settings (scalar bar policy, undo depth, logging) are stored in the
//! platform config directory under `dev.pipeprune`:
//!
//! - **Linux**: `~/.config/dev.pipeprune/config.toml`
//! - **macOS**: `~/Library/Application Support/dev.pipeprune/config.toml`
//! - **Windows**: `%APPDATA%\dev.pipeprune\config.toml`
//!
//! ## Example
//!
//! ```ignore
//! use pipeprune_rs::{config::EngineConfig, deletion::CandidateSet, pipeline::PortRef, Workspace};
//!
//! let mut ws = Workspace::new(EngineConfig::load_or_default());
//! let reader = ws.graph.add_source("Reader");
//! let clip = ws.graph.add_filter("Clip", &[PortRef::primary(reader)])?;
//!
//! let report = ws.run_deletion(&[clip, reader].into_iter().collect::<CandidateSet>())?;
//! assert_eq!(report.removed, vec![clip, reader]);
//! ```

pub mod config;
pub mod deletion;
pub mod error;
pub mod events;
pub mod pipeline;
pub mod scene;
pub mod selection;
pub mod undo;
pub mod view;
pub mod workspace;

// Re-export commonly used types
pub use config::{EngineConfig, ScalarBarMode};
pub use deletion::{can_delete, plan_deletion, CandidateSet, DeletionCoordinator, DeletionPlan, DeletionReport, PlanError};
pub use error::{PruneError, Result};
pub use pipeline::{NodeId, PipelineGraph, PortRef, ViewId};
pub use scene::SceneFile;
pub use workspace::Workspace;
