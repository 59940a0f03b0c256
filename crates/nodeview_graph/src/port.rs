// SPDX-License-Identifier: MIT OR Apache-2.0
//! Port definitions for node inputs/outputs.

use crate::connection::ConnectionId;
use crate::node::NodeId;
use indexmap::IndexMap;
use uuid::Uuid;

/// Unique identifier for a port
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PortId(pub Uuid);

impl PortId {
    /// Create a new random port ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PortId {
    fn default() -> Self {
        Self::new()
    }
}

/// Port direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    /// Input port
    Input,
    /// Output port
    Output,
}

/// Semantic tag of a port.
///
/// Only used for display (colors, default labels). Connections are never
/// type-checked against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortType {
    /// Untyped port
    Generic,
    /// Color value
    Color,
    /// Scalar value
    Value,
    /// Image buffer
    Pixmap,
}

impl PortType {
    /// Get the color for this port type (for UI)
    pub fn color(&self) -> [u8; 3] {
        match self {
            Self::Generic => [150, 150, 150],
            Self::Color => [255, 200, 100],
            Self::Value => [80, 200, 80],
            Self::Pixmap => [100, 150, 200],
        }
    }

    /// Label used when a port is created without one
    pub fn default_label(&self) -> &'static str {
        match self {
            Self::Generic => "Port",
            Self::Color => "Color",
            Self::Value => "Value",
            Self::Pixmap => "Pixmap",
        }
    }
}

/// A port on a node.
///
/// The port only references its connections; the [`Graph`](crate::graph::Graph)
/// owns the [`Connection`](crate::connection::Connection) objects themselves.
#[derive(Debug, Clone)]
pub struct Port {
    /// Unique port ID
    pub id: PortId,
    /// Owning node (back-reference)
    node: NodeId,
    /// Port direction
    pub direction: PortDirection,
    /// Display tag
    pub port_type: PortType,
    /// Label text
    pub label: String,
    /// Active connections mapped to the port at their far end
    connections: IndexMap<ConnectionId, PortId>,
    /// Drag feedback flag, read by the paint routine
    highlighted: bool,
}

impl Port {
    pub(crate) fn new(
        node: NodeId,
        direction: PortDirection,
        port_type: PortType,
        label: Option<String>,
    ) -> Self {
        Self {
            id: PortId::new(),
            node,
            direction,
            port_type,
            label: label.unwrap_or_else(|| port_type.default_label().to_string()),
            connections: IndexMap::new(),
            highlighted: false,
        }
    }

    /// Owning node
    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Is this an input port
    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    /// Is this an output port
    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }

    /// Record `connection -> peer`. Does not validate.
    pub fn connect_to(&mut self, peer: PortId, connection: ConnectionId) {
        self.connections.insert(connection, peer);
    }

    /// Remove one entry, returning the peer it pointed at. Absent entries are a no-op.
    pub fn remove_connection(&mut self, connection: ConnectionId) -> Option<PortId> {
        self.connections.shift_remove(&connection)
    }

    /// Peer ports at the far end of every active connection
    pub fn connected_ports(&self) -> impl Iterator<Item = PortId> + '_ {
        self.connections.values().copied()
    }

    /// Active connections registered on this port, with their peers
    pub fn connections(&self) -> impl Iterator<Item = (ConnectionId, PortId)> + '_ {
        self.connections.iter().map(|(c, p)| (*c, *p))
    }

    /// Is `connection` registered on this port
    pub fn has_connection(&self, connection: ConnectionId) -> bool {
        self.connections.contains_key(&connection)
    }

    /// Is `peer` at the far end of one of this port's connections
    pub fn is_connected_to(&self, peer: PortId) -> bool {
        self.connections.values().any(|p| *p == peer)
    }

    /// Number of active connections
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Drain the connection map, returning what it held
    pub(crate) fn take_connections(&mut self) -> Vec<(ConnectionId, PortId)> {
        self.connections.drain(..).collect()
    }

    /// Whether the port is highlighted as a drop candidate
    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn set_highlighted(&mut self, highlighted: bool) {
        self.highlighted = highlighted;
    }
}
