// SPDX-License-Identifier: MIT OR Apache-2.0
//! Scripted pointer sessions.
//!
//! A session declares a scene (named nodes built from registry types) and a
//! list of pointer gestures. Replaying it drives the drag controller exactly
//! as a hosting view would, with the graph doing its own hit-testing.

use crate::error::{AppError, Result};
use indexmap::IndexMap;
use nodeview_graph::catalog::{convert, input};
use nodeview_graph::{DragController, DragOutcome, EditorConfig, Graph, NodeId, NodeRegistry, PortId};
use nodeview_graph::egui::Pos2;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A node placed by the session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSpec {
    /// Name gestures refer to
    pub name: String,
    /// Registry type
    pub type_id: String,
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
}

/// One pointer gesture
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Gesture {
    /// Press on a port, identified by node name and port label
    Press {
        /// Node name
        node: String,
        /// Port label
        port: String,
    },
    /// Move to a raw scene position
    MoveTo {
        /// X
        x: f32,
        /// Y
        y: f32,
    },
    /// Move onto a port
    MoveToPort {
        /// Node name
        node: String,
        /// Port label
        port: String,
    },
    /// Release the pointer
    Release,
}

/// Scene plus gestures
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    /// Nodes to place
    pub nodes: Vec<NodeSpec>,
    /// Gestures to replay, in order
    pub gestures: Vec<Gesture>,
}

impl Session {
    /// Parse a session from RON text
    pub fn from_ron(text: &str) -> Result<Self> {
        Ok(ron::from_str(text)?)
    }

    /// Load a session file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Four Mix, four Color and four Number nodes on a grid, wired by a
    /// handful of gestures covering commit, fan-out, cycle rejection,
    /// release over empty space, and rerouting.
    pub fn demo() -> Self {
        let mut nodes = Vec::new();
        for (row, type_id) in [convert::MIX, input::COLOR, input::NUMBER].iter().enumerate() {
            for column in 0..4 {
                nodes.push(NodeSpec {
                    name: format!("{}_{}", type_id, column),
                    type_id: type_id.to_string(),
                    x: column as f32 * 260.0,
                    y: row as f32 * 180.0,
                });
            }
        }

        let press = |node: &str, port: &str| Gesture::Press {
            node: node.to_string(),
            port: port.to_string(),
        };
        let onto = |node: &str, port: &str| Gesture::MoveToPort {
            node: node.to_string(),
            port: port.to_string(),
        };
        let gestures = vec![
            // Color into both Mix inputs (fan-out)
            press("color_input_0", "Color"),
            Gesture::MoveTo { x: 200.0, y: 150.0 },
            onto("mix_0", "A"),
            Gesture::Release,
            press("color_input_0", "Color"),
            onto("mix_0", "B"),
            Gesture::Release,
            press("mix_1", "Factor"),
            onto("number_input_1", "Value"),
            Gesture::Release,
            press("mix_0", "Color"),
            onto("mix_1", "A"),
            Gesture::Release,
            // Would close a loop
            press("mix_1", "Color"),
            onto("mix_0", "Factor"),
            Gesture::Release,
            // Dropped on empty canvas
            press("number_input_3", "Value"),
            Gesture::MoveTo { x: -400.0, y: -400.0 },
            Gesture::Release,
            // Pull mix_0.B loose and drop it on mix_2.B
            press("mix_0", "B"),
            Gesture::MoveTo { x: 400.0, y: 100.0 },
            onto("mix_2", "B"),
            Gesture::Release,
        ];

        Self { nodes, gestures }
    }
}

/// Counts of what a replay did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    /// Releases that committed
    pub committed: usize,
    /// Releases that discarded
    pub discarded: usize,
}

/// Graph under replay, with session names for its nodes
pub struct Replay {
    graph: Graph,
    names: IndexMap<String, NodeId>,
    controller: DragController,
}

impl Replay {
    /// Build the session's scene
    pub fn new(session: &Session, registry: &NodeRegistry, config: EditorConfig) -> Result<Self> {
        let mut graph = Graph::with_config("Session", config);
        let mut names = IndexMap::new();
        for spec in &session.nodes {
            let node = registry.create_node(&spec.type_id)?.with_position(spec.x, spec.y);
            names.insert(spec.name.clone(), graph.add_node(node));
        }
        tracing::info!("Placed {} nodes", graph.node_count());
        Ok(Self {
            graph,
            names,
            controller: DragController::new(),
        })
    }

    /// The graph
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Replay gestures in order
    pub fn run(&mut self, gestures: &[Gesture]) -> Result<ReplaySummary> {
        let mut summary = ReplaySummary::default();
        for gesture in gestures {
            match gesture {
                Gesture::Press { node, port } => {
                    let port = self.resolve_port(node, port)?;
                    let pos = self.port_position(port)?;
                    if self.controller.press(&mut self.graph, port, pos).is_none() {
                        tracing::warn!("Press on {} ignored", node);
                    }
                }
                Gesture::MoveTo { x, y } => {
                    self.controller.move_to(&mut self.graph, Pos2::new(*x, *y));
                }
                Gesture::MoveToPort { node, port } => {
                    let port = self.resolve_port(node, port)?;
                    let pos = self.port_position(port)?;
                    self.controller.move_to(&mut self.graph, pos);
                }
                Gesture::Release => match self.controller.release(&mut self.graph) {
                    DragOutcome::Committed(id) => {
                        summary.committed += 1;
                        tracing::info!("Committed connection {:?}", id);
                    }
                    DragOutcome::Discarded(id) => {
                        summary.discarded += 1;
                        tracing::info!("Discarded connection {:?}", id);
                    }
                    DragOutcome::Ignored => tracing::warn!("Release without a drag"),
                },
            }
            // Effects are fire-and-forget; nothing renders them here
            self.graph.take_events();
        }
        Ok(summary)
    }

    /// Active connections as `node.port -> node.port`, using session names
    pub fn describe_connections(&self) -> Vec<String> {
        self.graph
            .active_connections()
            .filter_map(|c| {
                let source = self.describe_port(c.source().port()?)?;
                let destination = self.describe_port(c.destination().port()?)?;
                Some(format!("{source} -> {destination}"))
            })
            .collect()
    }

    fn describe_port(&self, port_id: PortId) -> Option<String> {
        let port = self.graph.port(port_id)?;
        let name = self
            .names
            .iter()
            .find(|(_, id)| **id == port.node())
            .map(|(name, _)| name.as_str())?;
        Some(format!("{}.{}", name, port.label))
    }

    fn resolve_port(&self, node: &str, label: &str) -> Result<PortId> {
        let node_id = self
            .names
            .get(node)
            .ok_or_else(|| AppError::UnknownNode(node.to_string()))?;
        self.graph
            .node(*node_id)
            .and_then(|n| n.ports().iter().find(|p| p.label == label))
            .map(|p| p.id)
            .ok_or_else(|| AppError::UnknownPort {
                node: node.to_string(),
                port: label.to_string(),
            })
    }

    fn port_position(&self, port: PortId) -> Result<Pos2> {
        self.graph
            .port_position(port)
            .ok_or(AppError::Graph(nodeview_graph::GraphError::PortNotFound(port)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nodeview_graph::catalog::default_registry;

    #[test]
    fn test_demo_replay() {
        let session = Session::demo();
        let mut replay = Replay::new(&session, &default_registry(), EditorConfig::default()).unwrap();
        let summary = replay.run(&session.gestures).unwrap();

        assert_eq!(summary, ReplaySummary { committed: 5, discarded: 2 });
        let mut connections = replay.describe_connections();
        connections.sort();
        assert_eq!(
            connections,
            vec![
                "color_input_0.Color -> mix_0.A",
                "color_input_0.Color -> mix_2.B",
                "mix_0.Color -> mix_1.A",
                "number_input_1.Value -> mix_1.Factor",
            ]
        );
        assert_eq!(replay.graph().connection_count(), 4);
    }

    #[test]
    fn test_session_from_ron() {
        let text = r#"(
            nodes: [
                (name: "c", type_id: "color_input", x: 0.0, y: 0.0),
                (name: "m", type_id: "mix", x: 300.0, y: 0.0),
            ],
            gestures: [
                Press(node: "c", port: "Color"),
                MoveToPort(node: "m", port: "B"),
                Release,
            ],
        )"#;
        let session = Session::from_ron(text).unwrap();
        let mut replay = Replay::new(&session, &default_registry(), EditorConfig::default()).unwrap();
        let summary = replay.run(&session.gestures).unwrap();
        assert_eq!(summary.committed, 1);
        assert_eq!(replay.describe_connections(), vec!["c.Color -> m.B"]);
    }

    #[test]
    fn test_unknown_names() {
        let session = Session {
            nodes: vec![NodeSpec {
                name: "c".to_string(),
                type_id: "color_input".to_string(),
                x: 0.0,
                y: 0.0,
            }],
            gestures: vec![],
        };
        let mut replay = Replay::new(&session, &default_registry(), EditorConfig::default()).unwrap();

        let missing_node = replay.run(&[Gesture::Press {
            node: "x".to_string(),
            port: "Color".to_string(),
        }]);
        assert!(matches!(missing_node, Err(AppError::UnknownNode(_))));

        let missing_port = replay.run(&[Gesture::Press {
            node: "c".to_string(),
            port: "Alpha".to_string(),
        }]);
        assert!(matches!(missing_port, Err(AppError::UnknownPort { .. })));
    }

    #[test]
    fn test_unknown_type() {
        let session = Session {
            nodes: vec![NodeSpec {
                name: "q".to_string(),
                type_id: "quux".to_string(),
                x: 0.0,
                y: 0.0,
            }],
            gestures: vec![],
        };
        assert!(matches!(
            Replay::new(&session, &default_registry(), EditorConfig::default()),
            Err(AppError::Graph(_))
        ));
    }
}
