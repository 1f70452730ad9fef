//! Pre-removal consistency updates.
//!
//! Before a node is unregistered, nothing may keep pointing at it: the active
//! port moves upstream, views stop showing it and show its upstream instead,
//! and scalar bars follow the configured policy.

use crate::pipeline::{NodeId, PipelineGraph, PortRef, ViewId};
use crate::selection::ActiveObjects;
use crate::undo::GraphChange;
use crate::view::{ScalarBarService, ViewLayer, ViewService};
use std::collections::BTreeSet;

/// Everything `before_removal` changed for one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovalAdjustments {
    pub node: Option<NodeId>,
    /// `(from, to)` when the active port was retargeted.
    pub active_port_change: Option<(Option<PortRef>, Option<PortRef>)>,
    pub hidden: Vec<(ViewId, PortRef)>,
    pub shown: Vec<(ViewId, PortRef)>,
    pub scalar_bars_shown: Vec<(ViewId, PortRef)>,
    pub dirty_views: BTreeSet<ViewId>,
}

impl RemovalAdjustments {
    /// Undo records for these adjustments, in application order.
    pub fn changes(&self) -> Vec<GraphChange> {
        let mut changes = Vec::new();
        if let Some((from, to)) = self.active_port_change {
            changes.push(GraphChange::ActivePortChanged { from, to });
        }
        changes.extend(self.hidden.iter().map(|&(view, port)| GraphChange::VisibilityChanged {
            view,
            port,
            visible: false,
        }));
        changes.extend(self.shown.iter().map(|&(view, port)| GraphChange::VisibilityChanged {
            view,
            port,
            visible: true,
        }));
        changes.extend(
            self.scalar_bars_shown
                .iter()
                .map(|&(view, port)| GraphChange::ScalarBarShown { view, port }),
        );
        changes
    }

    pub fn is_empty(&self) -> bool {
        self.active_port_change.is_none()
            && self.hidden.is_empty()
            && self.shown.is_empty()
            && self.scalar_bars_shown.is_empty()
    }
}

pub struct ConsistencyUpdater;

impl ConsistencyUpdater {
    /// Adjust dependent state so nothing refers to `node` once it is gone.
    ///
    /// Missing related state (no active port, no upstream, no representation)
    /// makes the corresponding step a no-op.
    pub fn before_removal(
        graph: &PipelineGraph,
        active: &mut ActiveObjects,
        views: &mut dyn ViewLayer,
        node: NodeId,
    ) -> RemovalAdjustments {
        let mut adjustments = RemovalAdjustments {
            node: Some(node),
            ..Default::default()
        };
        let upstream = graph.first_input_producer(node);

        if active.active_node() == Some(node) {
            let from = active.active_port();
            active.set_active_port(upstream);
            adjustments.active_port_change = Some((from, upstream));
        }

        let output_count = graph.node(node).map(|n| n.output_count()).unwrap_or(0);
        let auto_show = views.scalar_bar_mode().shows_automatically();

        for view in views.views_showing(node) {
            let mut hid_any = false;
            for port in (0..output_count).map(|i| PortRef::new(node, i as u16)) {
                if views.is_visible(view, port) && views.set_visibility(view, port, false) {
                    adjustments.hidden.push((view, port));
                    hid_any = true;
                }
            }
            if !hid_any {
                continue;
            }
            adjustments.dirty_views.insert(view);

            let Some(upstream) = upstream else {
                continue;
            };
            if !views.has_representation(view, upstream) {
                continue;
            }
            if !views.is_visible(view, upstream) && views.set_visibility(view, upstream, true) {
                adjustments.shown.push((view, upstream));
            }
            if auto_show
                && views.uses_scalar_coloring(view, upstream)
                && views.set_scalar_bar_visibility(view, upstream, true)
            {
                adjustments.scalar_bars_shown.push((view, upstream));
            }
        }

        if !adjustments.is_empty() {
            tracing::debug!(
                "Adjusted state before removing {}: {} hidden, {} shown",
                node,
                adjustments.hidden.len(),
                adjustments.shown.len()
            );
        }
        adjustments
    }

    /// Hide scalar bars nothing visible uses anymore, in every view.
    ///
    /// Does nothing under a manual scalar bar policy. Returns how many bars
    /// were hidden.
    pub fn sweep_scalar_bars(views: &mut dyn ViewLayer) -> usize {
        if !views.scalar_bar_mode().hides_unused() {
            return 0;
        }
        views
            .view_ids()
            .into_iter()
            .map(|view| views.hide_unused_scalar_bars(view))
            .sum()
    }
}
