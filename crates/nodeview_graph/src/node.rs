// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node definitions for the graph.

use crate::config::{EditorConfig, DEFAULT_NODE_WIDTH};
use crate::port::{Port, PortDirection, PortId, PortType};
use egui::{Pos2, Rect, Vec2};
use uuid::Uuid;

/// Unique identifier for a node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A node instance: a titled box owning an ordered sequence of ports.
///
/// Node types do not subclass this; a type is a factory that configures a
/// generic `Node` (see [`NodeRegistry`](crate::registry::NodeRegistry)).
#[derive(Debug, Clone)]
pub struct Node {
    /// Unique instance ID
    pub id: NodeId,
    /// Registry type this node was built from, if any
    pub type_id: Option<String>,
    /// Display title
    pub title: String,
    /// Top-left corner in scene space
    pub position: Pos2,
    /// Width; height is derived from the port count
    pub width: f32,
    ports: Vec<Port>,
}

impl Node {
    /// Create an empty node
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            id: NodeId::new(),
            type_id: None,
            title: title.into(),
            position: Pos2::ZERO,
            width: DEFAULT_NODE_WIDTH,
            ports: Vec::new(),
        }
    }

    /// Set the position
    pub fn with_position(mut self, x: f32, y: f32) -> Self {
        self.position = Pos2::new(x, y);
        self
    }

    /// Append a port. `None` labels fall back to the type's default label.
    pub fn add_port(
        &mut self,
        direction: PortDirection,
        port_type: PortType,
        label: Option<&str>,
    ) -> PortId {
        let port = Port::new(self.id, direction, port_type, label.map(str::to_string));
        let id = port.id;
        self.ports.push(port);
        id
    }

    /// Append an input port
    pub fn add_input(&mut self, port_type: PortType, label: &str) -> PortId {
        self.add_port(PortDirection::Input, port_type, Some(label))
    }

    /// Append an output port
    pub fn add_output(&mut self, port_type: PortType, label: &str) -> PortId {
        self.add_port(PortDirection::Output, port_type, Some(label))
    }

    /// Remove a port from the sequence without touching its connections.
    /// Outside the crate ports go through
    /// [`Graph::remove_port`](crate::graph::Graph::remove_port), which severs first.
    pub(crate) fn remove_port(&mut self, port_id: PortId) -> Option<Port> {
        let index = self.port_index(port_id)?;
        Some(self.ports.remove(index))
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.ports.iter().find(|p| p.id == port_id)
    }

    pub(crate) fn port_mut(&mut self, port_id: PortId) -> Option<&mut Port> {
        self.ports.iter_mut().find(|p| p.id == port_id)
    }

    /// Position of a port in the sequence
    pub fn port_index(&self, port_id: PortId) -> Option<usize> {
        self.ports.iter().position(|p| p.id == port_id)
    }

    /// All ports, in sequence order
    pub fn ports(&self) -> &[Port] {
        &self.ports
    }

    /// Input ports
    pub fn inputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_input())
    }

    /// Output ports
    pub fn outputs(&self) -> impl Iterator<Item = &Port> {
        self.ports.iter().filter(|p| p.is_output())
    }

    /// Height derived from the number of port rows
    pub fn height(&self, config: &EditorConfig) -> f32 {
        config.header_height + self.ports.len() as f32 * config.port_height + config.node_padding
    }

    /// Bounding rectangle in scene space
    pub fn rect(&self, config: &EditorConfig) -> Rect {
        Rect::from_min_size(self.position, Vec2::new(self.width, self.height(config)))
    }

    /// Attachment point of a port: inputs on the left edge, outputs on the right
    pub fn port_position(&self, port_id: PortId, config: &EditorConfig) -> Option<Pos2> {
        let index = self.port_index(port_id)?;
        let port = &self.ports[index];
        let y = self.position.y
            + config.header_height
            + index as f32 * config.port_height
            + config.port_height / 2.0;
        let x = match port.direction {
            PortDirection::Input => self.position.x,
            PortDirection::Output => self.position.x + self.width,
        };
        Some(Pos2::new(x, y))
    }

    /// Hit region of a port
    pub fn port_hit_rect(&self, port_id: PortId, config: &EditorConfig) -> Option<Rect> {
        let center = self.port_position(port_id, config)?;
        Some(Rect::from_center_size(center, Vec2::splat(config.port_radius * 2.0)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ports_back_reference_owner() {
        let mut node = Node::new("Mix");
        let a = node.add_input(PortType::Color, "A");
        let out = node.add_port(PortDirection::Output, PortType::Color, None);

        assert_eq!(node.ports().len(), 2);
        assert!(node.ports().iter().all(|p| p.node() == node.id));
        assert_eq!(node.port(out).unwrap().label, "Color");
        assert_eq!(node.inputs().count(), 1);
        assert_eq!(node.outputs().count(), 1);
        assert_eq!(node.port_index(a), Some(0));
    }

    #[test]
    fn test_height_follows_port_count() {
        let config = EditorConfig::default();
        let mut node = Node::new("Empty");
        let empty = node.height(&config);
        node.add_output(PortType::Value, "Value");
        node.add_output(PortType::Value, "Other");
        assert_eq!(node.height(&config), empty + 2.0 * config.port_height);
    }

    #[test]
    fn test_port_geometry() {
        let config = EditorConfig::default();
        let mut node = Node::new("Mix").with_position(100.0, 50.0);
        let input = node.add_input(PortType::Color, "A");
        let output = node.add_output(PortType::Color, "Out");

        let in_pos = node.port_position(input, &config).unwrap();
        let out_pos = node.port_position(output, &config).unwrap();
        assert_eq!(in_pos.x, 100.0);
        assert_eq!(out_pos.x, 100.0 + node.width);
        assert_eq!(out_pos.y - in_pos.y, config.port_height);

        let hit = node.port_hit_rect(input, &config).unwrap();
        assert!(hit.contains(in_pos));
        assert_eq!(hit.width(), config.port_radius * 2.0);
    }

    #[test]
    fn test_remove_port() {
        let mut node = Node::new("Number");
        let port = node.add_output(PortType::Value, "Value");
        assert!(node.remove_port(port).is_some());
        assert!(node.remove_port(port).is_none());
        assert!(node.ports().is_empty());
    }
}
