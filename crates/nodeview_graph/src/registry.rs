// SPDX-License-Identifier: MIT OR Apache-2.0
//! Registry of node types.
//!
//! A node type is a factory: it configures a generic [`Node`] with a title
//! and ports. Each catalog module registers its category and types at
//! start-up; nothing is discovered at runtime.

use crate::graph::GraphError;
use crate::node::Node;
use indexmap::IndexMap;

/// Builder that gives a fresh node its title, size and ports
pub type NodeBuilder = fn(&mut Node);

/// Group of node types, one per catalog module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeCategory {
    /// Unique category identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
}

/// Node type definition
#[derive(Debug, Clone)]
pub struct NodeType {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub name: String,
    /// Description
    pub description: String,
    /// Category identifier
    pub category: String,
    /// Factory
    pub build: NodeBuilder,
}

/// Registry of available node types
#[derive(Debug, Default)]
pub struct NodeRegistry {
    categories: IndexMap<String, NodeCategory>,
    types: IndexMap<String, NodeType>,
}

impl NodeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a category
    pub fn register_category(&mut self, category: NodeCategory) {
        self.categories.insert(category.id.clone(), category);
    }

    /// Register a node type. A later registration with the same id replaces the earlier one.
    pub fn register(&mut self, node_type: NodeType) {
        if self.types.contains_key(&node_type.id) {
            tracing::warn!("Node type {} registered twice; keeping the latest", node_type.id);
        }
        self.types.insert(node_type.id.clone(), node_type);
    }

    /// Get a node type by ID
    pub fn get(&self, id: &str) -> Option<&NodeType> {
        self.types.get(id)
    }

    /// Get a category by ID
    pub fn category(&self, id: &str) -> Option<&NodeCategory> {
        self.categories.get(id)
    }

    /// Get all registered types
    pub fn types(&self) -> impl Iterator<Item = &NodeType> {
        self.types.values()
    }

    /// Get all categories
    pub fn categories(&self) -> impl Iterator<Item = &NodeCategory> {
        self.categories.values()
    }

    /// Get types by category
    pub fn types_in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a NodeType> {
        self.types.values().filter(move |t| t.category == category)
    }

    /// Create a node from a type ID
    pub fn create_node(&self, type_id: &str) -> Result<Node, GraphError> {
        let node_type = self
            .get(type_id)
            .ok_or_else(|| GraphError::UnknownNodeType(type_id.to_string()))?;
        let mut node = Node::new(node_type.name.clone());
        node.type_id = Some(node_type.id.clone());
        (node_type.build)(&mut node);
        Ok(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::PortType;

    fn two_outputs(node: &mut Node) {
        node.title = "Pair".to_string();
        node.add_output(PortType::Value, "First");
        node.add_output(PortType::Value, "Second");
    }

    fn registry() -> NodeRegistry {
        let mut registry = NodeRegistry::new();
        registry.register_category(NodeCategory {
            id: "test".to_string(),
            name: "Test".to_string(),
            description: "Test nodes".to_string(),
        });
        registry.register(NodeType {
            id: "pair".to_string(),
            name: "Pair".to_string(),
            description: "Two values".to_string(),
            category: "test".to_string(),
            build: two_outputs,
        });
        registry
    }

    #[test]
    fn test_create_node() {
        let registry = registry();
        let node = registry.create_node("pair").unwrap();
        assert_eq!(node.title, "Pair");
        assert_eq!(node.type_id.as_deref(), Some("pair"));
        assert_eq!(node.outputs().count(), 2);

        // Every instance gets fresh ports
        let other = registry.create_node("pair").unwrap();
        assert_ne!(node.id, other.id);
        assert_ne!(node.ports()[0].id, other.ports()[0].id);
    }

    #[test]
    fn test_unknown_type() {
        let registry = registry();
        assert!(matches!(
            registry.create_node("missing"),
            Err(GraphError::UnknownNodeType(id)) if id == "missing"
        ));
    }

    #[test]
    fn test_types_in_category() {
        let registry = registry();
        assert_eq!(registry.types_in_category("test").count(), 1);
        assert_eq!(registry.types_in_category("other").count(), 0);
        assert_eq!(registry.category("test").unwrap().name, "Test");
    }
}
