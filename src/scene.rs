//! Scene files.
//!
//! A scene is a JSON description of a pipeline plus the views showing it,
//! used by the command-line driver and by tests. Nodes and views refer to
//! each other by name.
//!
//! ```json
//! {
//!   "nodes": [
//!     { "name": "Reader", "kind": "Source" },
//!     { "name": "Clip", "kind": "Filter", "inputs": ["Reader"] }
//!   ],
//!   "views": [
//!     { "name": "RenderView1",
//!       "representations": [
//!         { "node": "Clip", "visible": true, "color_array": "Temp", "scalar_bar": true }
//!       ] }
//!   ],
//!   "active": "Clip",
//!   "selection": ["Clip"]
//! }
//! ```

use crate::config::EngineConfig;
use crate::error::{PruneError, Result, ResultExt};
use crate::pipeline::{NodeId, NodeKind, PortRef};
use crate::selection::SelectionItem;
use crate::view::{Representation, ScalarBarService};
use crate::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneNode {
    pub name: String,
    pub kind: NodeKind,
    /// Producer node names, one per input, wired to their first output.
    #[serde(default)]
    pub inputs: Vec<String>,
    /// Output port names; a single "Output" when empty.
    #[serde(default)]
    pub outputs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneRepresentation {
    pub node: String,
    #[serde(default)]
    pub port: u16,
    #[serde(default = "default_visible")]
    pub visible: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color_array: Option<String>,
    #[serde(default)]
    pub scalar_bar: bool,
}

fn default_visible() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneView {
    pub name: String,
    #[serde(default)]
    pub representations: Vec<SceneRepresentation>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneFile {
    #[serde(default)]
    pub nodes: Vec<SceneNode>,
    #[serde(default)]
    pub views: Vec<SceneView>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<String>,
    #[serde(default)]
    pub selection: Vec<String>,
}

impl SceneFile {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).with_context(|| format!("Failed to read scene {:?}", path))?;
        Self::from_json(&content).with_context(|| format!("Failed to parse scene {:?}", path))
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Build a workspace holding this scene.
    pub fn build(&self, config: EngineConfig) -> Result<Workspace> {
        let mut ws = Workspace::new(config);
        let mut ids: HashMap<&str, NodeId> = HashMap::new();

        // Nodes first so inputs may name nodes declared later.
        for node in &self.nodes {
            if ids.contains_key(node.name.as_str()) {
                return Err(PruneError::Scene(format!("Duplicate node name '{}'", node.name)));
            }
            let input_names: Vec<String> = (0..node.inputs.len())
                .map(|i| if i == 0 { "Input".to_string() } else { format!("Input{}", i) })
                .collect();
            let inputs: Vec<&str> = input_names.iter().map(String::as_str).collect();
            let outputs: Vec<&str> = if node.outputs.is_empty() {
                vec!["Output"]
            } else {
                node.outputs.iter().map(String::as_str).collect()
            };

            let id = ws
                .graph
                .add_node(node.name.as_str(), node.kind, &inputs, &outputs)
                .with_context(|| format!("Failed to add node '{}'", node.name))?;
            ids.insert(node.name.as_str(), id);
        }

        let lookup = |name: &str| -> Result<NodeId> {
            ids.get(name)
                .copied()
                .ok_or_else(|| PruneError::Scene(format!("Unknown node '{}'", name)))
        };

        for node in &self.nodes {
            let consumer = lookup(&node.name)?;
            for (index, producer) in node.inputs.iter().enumerate() {
                let producer = lookup(producer)?;
                ws.graph
                    .connect(PortRef::primary(producer), consumer, index)
                    .with_context(|| format!("Failed to wire input {} of '{}'", index, node.name))?;
            }
        }

        for view in &self.views {
            let view_id = ws.views.add_view(view.name.as_str());
            for rep in &view.representations {
                let node = lookup(&rep.node)?;
                let outputs = ws.graph.node(node).map(|n| n.output_count()).unwrap_or(0);
                if rep.port as usize >= outputs {
                    return Err(PruneError::Scene(format!(
                        "View '{}' shows output {} of '{}', which has {} output(s)",
                        view.name, rep.port, rep.node, outputs
                    )));
                }
                let port = PortRef::new(node, rep.port);
                let mut representation = if rep.visible {
                    Representation::visible()
                } else {
                    Representation::hidden()
                };
                if let Some(array) = &rep.color_array {
                    representation = representation.colored_by(array.as_str());
                }
                ws.views.add_representation(view_id, port, representation);
                if rep.scalar_bar {
                    ws.views.set_scalar_bar_visibility(view_id, port, true);
                }
            }
        }

        if let Some(active) = &self.active {
            ws.active.set_active_port(Some(PortRef::primary(lookup(active)?)));
        }
        let selection = self
            .selection
            .iter()
            .map(|name| lookup(name).map(SelectionItem::Node))
            .collect::<Result<Vec<_>>>()?;
        ws.active.select(selection);

        tracing::debug!(
            "Built scene with {} node(s) and {} view(s)",
            ws.graph.len(),
            self.views.len()
        );
        Ok(ws)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::ViewService;

    const SCENE: &str = r#"{
        "nodes": [
            { "name": "Clip", "kind": "Filter", "inputs": ["Reader"] },
            { "name": "Reader", "kind": "Source" }
        ],
        "views": [
            { "name": "RenderView1",
              "representations": [
                { "node": "Clip", "color_array": "Temp", "scalar_bar": true },
                { "node": "Reader", "visible": false }
              ] }
        ],
        "active": "Clip",
        "selection": ["Clip"]
    }"#;

    #[test]
    fn test_build_scene() {
        let scene = SceneFile::from_json(SCENE).unwrap();
        let ws = scene.build(EngineConfig::default()).unwrap();

        let reader = ws.graph.find_by_name("Reader").unwrap();
        let clip = ws.graph.find_by_name("Clip").unwrap();
        assert_eq!(ws.graph.first_input_producer(clip), Some(PortRef::primary(reader)));
        assert_eq!(ws.active.active_port(), Some(PortRef::primary(clip)));
        assert_eq!(ws.active.selection().len(), 1);

        let view = ws.views.find_view("RenderView1").unwrap();
        assert!(ws.views.is_visible(view, PortRef::primary(clip)));
        assert!(!ws.views.is_visible(view, PortRef::primary(reader)));
        assert!(ws.views.scalar_bar_visible(view, "Temp"));
    }

    #[test]
    fn test_unknown_input_is_scene_error() {
        let scene = SceneFile::from_json(
            r#"{ "nodes": [ { "name": "Clip", "kind": "Filter", "inputs": ["Nope"] } ] }"#,
        )
        .unwrap();
        let err = scene.build(EngineConfig::default()).unwrap_err();
        assert!(err.to_string().contains("Unknown node 'Nope'"));
    }

    #[test]
    fn test_representation_port_out_of_range_is_rejected() {
        let scene = SceneFile::from_json(
            r#"{
                "nodes": [ { "name": "Reader", "kind": "Source" } ],
                "views": [ { "name": "RenderView1",
                             "representations": [ { "node": "Reader", "port": 1 } ] } ]
            }"#,
        )
        .unwrap();
        let err = scene.build(EngineConfig::default()).unwrap_err();
        assert!(matches!(err, PruneError::Scene(_)));
        assert!(err.to_string().contains("output 1 of 'Reader'"));
    }

    #[test]
    fn test_duplicate_name_is_rejected() {
        let scene = SceneFile::from_json(
            r#"{ "nodes": [ { "name": "A", "kind": "Source" }, { "name": "A", "kind": "Source" } ] }"#,
        )
        .unwrap();
        assert!(matches!(
            scene.build(EngineConfig::default()),
            Err(PruneError::Scene(_))
        ));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scene.json");
        let scene = SceneFile::from_json(SCENE).unwrap();
        scene.save(&path).unwrap();
        assert_eq!(SceneFile::load(&path).unwrap(), scene);
    }
}
