//! Test data builders for creating test workspaces

use pipeprune_rs::config::{EngineConfig, ScalarBarMode};
use pipeprune_rs::selection::SelectionItem;
use pipeprune_rs::view::{Representation, ScalarBarService};
use pipeprune_rs::{CandidateSet, NodeId, PortRef, ViewId, Workspace};
use std::collections::HashMap;

/// A built workspace plus name lookups
pub struct Fixture {
    pub ws: Workspace,
    nodes: HashMap<String, NodeId>,
    views: HashMap<String, ViewId>,
}

impl Fixture {
    pub fn id(&self, name: &str) -> NodeId {
        self.nodes[name]
    }

    pub fn port(&self, name: &str) -> PortRef {
        PortRef::primary(self.id(name))
    }

    pub fn view(&self, name: &str) -> ViewId {
        self.views[name]
    }

    pub fn candidates(&self, names: &[&str]) -> CandidateSet {
        names.iter().map(|name| self.id(name)).collect()
    }
}

/// Builder for workspaces described by node and view names
pub struct WorkspaceBuilder {
    config: EngineConfig,
    steps: Vec<Step>,
}

enum Step {
    Source(String),
    Filter(String, Vec<String>),
    View(String),
    Rep {
        node: String,
        visible: bool,
        array: Option<String>,
        bar: bool,
    },
    Active(String),
    Select(Vec<String>),
}

impl WorkspaceBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
            steps: Vec::new(),
        }
    }

    pub fn scalar_bar_mode(mut self, mode: ScalarBarMode) -> Self {
        self.config.general.scalar_bar_mode = mode;
        self
    }

    pub fn undo_depth(mut self, depth: usize) -> Self {
        self.config.undo.max_depth = depth;
        self
    }

    pub fn source(mut self, name: &str) -> Self {
        self.steps.push(Step::Source(name.to_string()));
        self
    }

    pub fn filter(mut self, name: &str, inputs: &[&str]) -> Self {
        self.steps.push(Step::Filter(
            name.to_string(),
            inputs.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Start a view; following representation calls add to it.
    pub fn view(mut self, name: &str) -> Self {
        self.steps.push(Step::View(name.to_string()));
        self
    }

    pub fn shown(self, node: &str) -> Self {
        self.rep(node, true, None, false)
    }

    pub fn hidden(self, node: &str) -> Self {
        self.rep(node, false, None, false)
    }

    /// Representation colored by `array`, with its scalar bar shown if `bar`.
    pub fn colored(self, node: &str, visible: bool, array: &str, bar: bool) -> Self {
        self.rep(node, visible, Some(array), bar)
    }

    fn rep(mut self, node: &str, visible: bool, array: Option<&str>, bar: bool) -> Self {
        self.steps.push(Step::Rep {
            node: node.to_string(),
            visible,
            array: array.map(str::to_string),
            bar,
        });
        self
    }

    pub fn active(mut self, node: &str) -> Self {
        self.steps.push(Step::Active(node.to_string()));
        self
    }

    pub fn select(mut self, nodes: &[&str]) -> Self {
        self.steps
            .push(Step::Select(nodes.iter().map(|s| s.to_string()).collect()));
        self
    }

    pub fn build(self) -> Fixture {
        let mut fx = Fixture {
            ws: Workspace::new(self.config),
            nodes: HashMap::new(),
            views: HashMap::new(),
        };
        let mut current_view = None;

        for step in self.steps {
            match step {
                Step::Source(name) => {
                    let id = fx.ws.graph.add_source(name.as_str());
                    fx.nodes.insert(name, id);
                }
                Step::Filter(name, inputs) => {
                    let producers: Vec<PortRef> = inputs.iter().map(|n| fx.port(n)).collect();
                    let id = fx.ws.graph.add_filter(name.as_str(), &producers).unwrap();
                    fx.nodes.insert(name, id);
                }
                Step::View(name) => {
                    let id = fx.ws.views.add_view(name.as_str());
                    fx.views.insert(name, id);
                    current_view = Some(id);
                }
                Step::Rep {
                    node,
                    visible,
                    array,
                    bar,
                } => {
                    let view = current_view.expect("representation before any view");
                    let port = fx.port(&node);
                    let mut rep = if visible {
                        Representation::visible()
                    } else {
                        Representation::hidden()
                    };
                    if let Some(array) = array {
                        rep = rep.colored_by(array);
                    }
                    fx.ws.views.add_representation(view, port, rep);
                    if bar {
                        fx.ws.views.set_scalar_bar_visibility(view, port, true);
                    }
                }
                Step::Active(node) => {
                    let port = fx.port(&node);
                    fx.ws.active.set_active_port(Some(port));
                }
                Step::Select(nodes) => {
                    let items: Vec<SelectionItem> =
                        nodes.iter().map(|n| SelectionItem::Node(fx.id(n))).collect();
                    fx.ws.active.select(items);
                }
            }
        }
        fx
    }
}

impl Default for WorkspaceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// S1 -> F1 -> F2
pub fn chain() -> WorkspaceBuilder {
    WorkspaceBuilder::new()
        .source("S1")
        .filter("F1", &["S1"])
        .filter("F2", &["F1"])
}

/// S1 -> F1, S1 -> F2
pub fn fan() -> WorkspaceBuilder {
    WorkspaceBuilder::new()
        .source("S1")
        .filter("F1", &["S1"])
        .filter("F2", &["S1"])
}
