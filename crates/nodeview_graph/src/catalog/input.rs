// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input nodes: sources of colors and numbers.

use crate::node::Node;
use crate::port::PortType;
use crate::registry::{NodeCategory, NodeRegistry, NodeType};

/// Category identifier
pub const CATEGORY: &str = "input";
/// Color source
pub const COLOR: &str = "color_input";
/// Number source
pub const NUMBER: &str = "number_input";

fn color(node: &mut Node) {
    node.title = "Color".to_string();
    node.add_output(PortType::Color, "Color");
}

fn number(node: &mut Node) {
    node.title = "Input Value".to_string();
    node.width = 200.0;
    node.add_output(PortType::Value, "Value");
}

/// Register the input category and its node types
pub fn register(registry: &mut NodeRegistry) {
    registry.register_category(NodeCategory {
        id: CATEGORY.to_string(),
        name: "Input".to_string(),
        description: "Input elements for the node graph.".to_string(),
    });

    registry.register(NodeType {
        id: COLOR.to_string(),
        name: "Color".to_string(),
        description: "A constant color".to_string(),
        category: CATEGORY.to_string(),
        build: color,
    });

    registry.register(NodeType {
        id: NUMBER.to_string(),
        name: "Number".to_string(),
        description: "A constant number".to_string(),
        category: CATEGORY.to_string(),
        build: number,
    });
}
