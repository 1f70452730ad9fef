//! In-process view registry.
//!
//! Holds every view's representations and scalar bars, plus a node -> views
//! index so `views_showing` does not walk every view. Redraw requests are
//! counted and forwarded to subscribers over crossbeam channels.

use super::{RenderRequest, ScalarBarService, ViewService};
use crate::config::ScalarBarMode;
use crate::pipeline::{NodeId, PortRef, ViewId};
use crossbeam_channel::{unbounded, Receiver, Sender};
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// How one output port is displayed in one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Representation {
    pub visible: bool,
    /// Scalar array coloring this representation, if any.
    pub color_array: Option<String>,
}

impl Representation {
    pub fn visible() -> Self {
        Self {
            visible: true,
            color_array: None,
        }
    }

    pub fn hidden() -> Self {
        Self {
            visible: false,
            color_array: None,
        }
    }

    pub fn colored_by(mut self, array: impl Into<String>) -> Self {
        self.color_array = Some(array.into());
        self
    }
}

#[derive(Debug, Default)]
struct ViewState {
    name: String,
    representations: BTreeMap<PortRef, Representation>,
    /// Array name -> scalar bar visible.
    scalar_bars: BTreeMap<String, bool>,
}

impl ViewState {
    fn array_in_use(&self, array: &str) -> bool {
        self.representations
            .values()
            .any(|rep| rep.visible && rep.color_array.as_deref() == Some(array))
    }
}

/// The default `ViewService` + `ScalarBarService` implementation.
#[derive(Debug, Default)]
pub struct ViewRegistry {
    views: BTreeMap<ViewId, ViewState>,
    by_node: HashMap<NodeId, BTreeSet<ViewId>>,
    next_view: u32,
    scalar_bar_mode: ScalarBarMode,
    render_requests: u64,
    render_subscribers: Vec<Sender<RenderRequest>>,
}

impl ViewRegistry {
    pub fn new(scalar_bar_mode: ScalarBarMode) -> Self {
        Self {
            scalar_bar_mode,
            ..Default::default()
        }
    }

    pub fn add_view(&mut self, name: impl Into<String>) -> ViewId {
        let id = ViewId(self.next_view);
        self.next_view += 1;
        self.views.insert(
            id,
            ViewState {
                name: name.into(),
                ..Default::default()
            },
        );
        id
    }

    pub fn view_name(&self, view: ViewId) -> Option<&str> {
        self.views.get(&view).map(|v| v.name.as_str())
    }

    pub fn find_view(&self, name: &str) -> Option<ViewId> {
        self.views
            .iter()
            .find(|(_, state)| state.name == name)
            .map(|(id, _)| *id)
    }

    /// Create or replace the representation of `port` in `view`.
    ///
    /// Returns false if the view does not exist.
    pub fn add_representation(&mut self, view: ViewId, port: PortRef, rep: Representation) -> bool {
        let Some(state) = self.views.get_mut(&view) else {
            return false;
        };
        if let Some(array) = &rep.color_array {
            state.scalar_bars.entry(array.clone()).or_insert(false);
        }
        state.representations.insert(port, rep);
        self.by_node.entry(port.node).or_default().insert(view);
        true
    }

    pub fn representation(&self, view: ViewId, port: PortRef) -> Option<&Representation> {
        self.views.get(&view)?.representations.get(&port)
    }

    /// Whether the scalar bar for `array` is shown in `view`.
    pub fn scalar_bar_visible(&self, view: ViewId, array: &str) -> bool {
        self.views
            .get(&view)
            .and_then(|state| state.scalar_bars.get(array))
            .copied()
            .unwrap_or(false)
    }

    pub fn set_scalar_bar_mode(&mut self, mode: ScalarBarMode) {
        self.scalar_bar_mode = mode;
    }

    /// Number of redraw requests received so far.
    pub fn render_count(&self) -> u64 {
        self.render_requests
    }

    /// Receive every future redraw request.
    pub fn subscribe_renders(&mut self) -> Receiver<RenderRequest> {
        let (tx, rx) = unbounded();
        self.render_subscribers.push(tx);
        rx
    }

    fn hide_bar_if_unused(&mut self, view: ViewId, array: &str) {
        if let Some(state) = self.views.get_mut(&view) {
            if !state.array_in_use(array) {
                if let Some(shown) = state.scalar_bars.get_mut(array) {
                    *shown = false;
                }
            }
        }
    }
}

impl ViewService for ViewRegistry {
    fn view_ids(&self) -> Vec<ViewId> {
        self.views.keys().copied().collect()
    }

    fn views_showing(&self, node: NodeId) -> BTreeSet<ViewId> {
        self.by_node.get(&node).cloned().unwrap_or_default()
    }

    fn has_representation(&self, view: ViewId, port: PortRef) -> bool {
        self.representation(view, port).is_some()
    }

    fn is_visible(&self, view: ViewId, port: PortRef) -> bool {
        self.representation(view, port).is_some_and(|rep| rep.visible)
    }

    fn set_visibility(&mut self, view: ViewId, port: PortRef, visible: bool) -> bool {
        let Some(rep) = self
            .views
            .get_mut(&view)
            .and_then(|state| state.representations.get_mut(&port))
        else {
            return false;
        };
        rep.visible = visible;
        let array = rep.color_array.clone();

        if !visible && self.scalar_bar_mode.hides_unused() {
            if let Some(array) = array {
                self.hide_bar_if_unused(view, &array);
            }
        }
        true
    }

    fn forget_node(&mut self, node: NodeId) {
        let Some(views) = self.by_node.remove(&node) else {
            return;
        };
        for view in views {
            if let Some(state) = self.views.get_mut(&view) {
                state.representations.retain(|port, _| port.node != node);
            }
        }
    }

    fn forget_all(&mut self) {
        for state in self.views.values_mut() {
            state.representations.clear();
            state.scalar_bars.clear();
        }
        self.by_node.clear();
    }

    fn request_render(&mut self, request: RenderRequest) {
        self.render_requests += 1;
        tracing::trace!("Render requested ({} dirty views)", request.dirty_views.len());
        self.render_subscribers
            .retain(|tx| tx.send(request.clone()).is_ok());
    }
}

impl ScalarBarService for ViewRegistry {
    fn scalar_bar_mode(&self) -> ScalarBarMode {
        self.scalar_bar_mode
    }

    fn uses_scalar_coloring(&self, view: ViewId, port: PortRef) -> bool {
        self.representation(view, port)
            .is_some_and(|rep| rep.color_array.is_some())
    }

    fn set_scalar_bar_visibility(&mut self, view: ViewId, port: PortRef, visible: bool) -> bool {
        let Some(state) = self.views.get_mut(&view) else {
            return false;
        };
        let Some(array) = state
            .representations
            .get(&port)
            .and_then(|rep| rep.color_array.clone())
        else {
            return false;
        };
        state.scalar_bars.insert(array, visible).unwrap_or(false) != visible
    }

    fn hide_unused_scalar_bars(&mut self, view: ViewId) -> usize {
        let Some(state) = self.views.get_mut(&view) else {
            return 0;
        };
        let unused: Vec<String> = state
            .scalar_bars
            .iter()
            .filter(|(array, shown)| **shown && !state.array_in_use(array))
            .map(|(array, _)| array.clone())
            .collect();
        for array in &unused {
            state.scalar_bars.insert(array.clone(), false);
        }
        unused.len()
    }
}
