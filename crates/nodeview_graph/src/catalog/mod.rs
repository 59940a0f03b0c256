// SPDX-License-Identifier: MIT OR Apache-2.0
//! Built-in node types.

pub mod convert;
pub mod input;

use crate::registry::NodeRegistry;

/// Registry holding every built-in node type
pub fn default_registry() -> NodeRegistry {
    let mut registry = NodeRegistry::new();
    input::register(&mut registry);
    convert::register(&mut registry);
    registry
}
