// SPDX-License-Identifier: MIT OR Apache-2.0
//! Boundary with the hosting scene: spatial queries in, visual effects out.

use crate::connection::ConnectionId;
use crate::node::NodeId;
use crate::port::PortId;
use egui::Pos2;
use std::time::Duration;

/// Whatever graphical item occupies a scene position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneItem {
    /// A port hit region
    Port(PortId),
    /// A node body
    Node(NodeId),
    /// A connection curve
    Connection(ConnectionId),
}

/// Spatial query provided by the scene hosting the graph
pub trait SceneHost {
    /// Resolve a scene-space position to the topmost item there
    fn item_at(&self, pos: Pos2) -> Option<SceneItem>;
}

/// Side-effect commands for the rendering layer.
///
/// The graph queues these and the host drains them with
/// [`Graph::take_events`](crate::graph::Graph::take_events). Nothing in the
/// graph waits on them.
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// A connection object was added to the scene
    ConnectionAttached(ConnectionId),
    /// A connection object was removed from the scene and released
    ConnectionDetached(ConnectionId),
    /// A connection's curve was recomputed
    PathChanged(ConnectionId),
    /// A port's highlight flag flipped
    PortHighlighted {
        /// Port
        port: PortId,
        /// New flag value
        highlighted: bool,
    },
    /// Animate a connection's opacity
    Fade {
        /// Connection
        connection: ConnectionId,
        /// Target opacity
        opacity: f32,
        /// Animation length
        duration: Duration,
    },
}
