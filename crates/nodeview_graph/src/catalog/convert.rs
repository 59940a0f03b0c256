// SPDX-License-Identifier: MIT OR Apache-2.0
//! Convert nodes.

use crate::node::Node;
use crate::port::PortType;
use crate::registry::{NodeCategory, NodeRegistry, NodeType};

/// Category identifier
pub const CATEGORY: &str = "convert";
/// Blend of two colors
pub const MIX: &str = "mix";

fn mix(node: &mut Node) {
    node.title = "Mix".to_string();
    node.add_input(PortType::Color, "A");
    node.add_input(PortType::Color, "B");
    node.add_input(PortType::Value, "Factor");
    node.add_output(PortType::Color, "Color");
}

/// Register the convert category and its node types
pub fn register(registry: &mut NodeRegistry) {
    registry.register_category(NodeCategory {
        id: CATEGORY.to_string(),
        name: "Convert".to_string(),
        description: "Convert elements for the node graph.".to_string(),
    });

    registry.register(NodeType {
        id: MIX.to_string(),
        name: "Mix".to_string(),
        description: "Blend two colors by a factor".to_string(),
        category: CATEGORY.to_string(),
        build: mix,
    });
}
