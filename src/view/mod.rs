//! View and scalar-bar collaborators.
//!
//! The deletion engine never draws anything. It talks to the render side
//! through two traits:
//!
//! - [`ViewService`]: which views show a node, per-representation
//!   visibility, and the redraw request sink.
//! - [`ScalarBarService`]: scalar bar (color legend) visibility and the
//!   global [`ScalarBarMode`] policy.
//!
//! [`ViewRegistry`] is the in-process implementation of both.

pub mod registry;

pub use registry::{Representation, ViewRegistry};

use crate::config::ScalarBarMode;
use crate::pipeline::{NodeId, PortRef, ViewId};
use std::collections::BTreeSet;

/// One consolidated redraw request, sent when a transaction closes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderRequest {
    /// Views whose representation state changed. Every surface is redrawn;
    /// these are the ones known to be stale.
    pub dirty_views: BTreeSet<ViewId>,
}

/// Views, representations and the redraw sink.
pub trait ViewService {
    /// All live views.
    fn view_ids(&self) -> Vec<ViewId>;

    /// Views holding a representation of any output port of `node`.
    fn views_showing(&self, node: NodeId) -> BTreeSet<ViewId>;

    /// Whether `view` already has a representation of `port`, visible or not.
    fn has_representation(&self, view: ViewId, port: PortRef) -> bool;

    fn is_visible(&self, view: ViewId, port: PortRef) -> bool;

    /// Change visibility of an existing representation. Never creates one.
    /// Hiding also hides scalar bars the representation alone kept alive when
    /// the scalar bar policy hides unused bars.
    ///
    /// Returns false if no representation exists.
    fn set_visibility(&mut self, view: ViewId, port: PortRef, visible: bool) -> bool;

    /// Drop every representation of `node`'s outputs.
    fn forget_node(&mut self, node: NodeId);

    /// Drop every representation in every view.
    fn forget_all(&mut self);

    /// Fire-and-forget redraw of all render surfaces.
    fn request_render(&mut self, request: RenderRequest);
}

/// Scalar bar visibility and policy.
pub trait ScalarBarService {
    fn scalar_bar_mode(&self) -> ScalarBarMode;

    /// Whether the representation of `port` in `view` is colored by a scalar array.
    fn uses_scalar_coloring(&self, view: ViewId, port: PortRef) -> bool;

    /// Show or hide the scalar bar of the array coloring `port` in `view`.
    /// Returns whether the bar's visibility changed.
    fn set_scalar_bar_visibility(&mut self, view: ViewId, port: PortRef, visible: bool) -> bool;

    /// Hide scalar bars in `view` not backed by a visible scalar-colored
    /// representation. Returns how many were hidden.
    fn hide_unused_scalar_bars(&mut self, view: ViewId) -> usize;
}

/// Everything the deletion engine needs from the render side.
pub trait ViewLayer: ViewService + ScalarBarService {}

impl<T: ViewService + ScalarBarService + ?Sized> ViewLayer for T {}
