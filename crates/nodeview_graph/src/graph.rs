// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data structure containing nodes and connections.
//!
//! The graph is the scene: it owns every node (and through them every port)
//! and every connection object, pending or active. Ports only reference the
//! connections registered on them.

use crate::config::EditorConfig;
use crate::connection::{Connection, ConnectionId, ConnectionPath, ConnectionState, Endpoint, FreeEnd};
use crate::node::{Node, NodeId};
use crate::port::{Port, PortDirection, PortId, PortType};
use crate::scene::{SceneEvent, SceneHost, SceneItem};
use crate::validator::{self, ConnectionRejection};
use egui::Pos2;
use indexmap::{IndexMap, IndexSet};

/// A node graph
#[derive(Debug, Clone)]
pub struct Graph {
    /// Graph name
    pub name: String,
    /// Nodes in the graph, in stacking order (last is topmost)
    nodes: IndexMap<NodeId, Node>,
    /// Connection objects in the scene
    connections: IndexMap<ConnectionId, Connection>,
    /// Geometry settings
    config: EditorConfig,
    /// Effects not yet collected by the host
    events: Vec<SceneEvent>,
}

impl Graph {
    /// Create a new empty graph
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_config(name, EditorConfig::default())
    }

    /// Create a new empty graph with explicit settings
    pub fn with_config(name: impl Into<String>, config: EditorConfig) -> Self {
        Self {
            name: name.into(),
            nodes: IndexMap::new(),
            connections: IndexMap::new(),
            config,
            events: Vec::new(),
        }
    }

    /// Geometry settings
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Add a node to the graph
    pub fn add_node(&mut self, node: Node) -> NodeId {
        let id = node.id;
        self.nodes.insert(id, node);
        id
    }

    /// Remove a node, severing every connection on its ports first
    pub fn remove_node(&mut self, node_id: NodeId) -> Option<Node> {
        let port_ids: Vec<PortId> = self.nodes.get(&node_id)?.ports().iter().map(|p| p.id).collect();
        for port in &port_ids {
            self.sever_port(*port);
        }
        tracing::debug!("Removed node {:?} ({} ports)", node_id, port_ids.len());
        self.nodes.shift_remove(&node_id)
    }

    /// Get a node by ID
    pub fn node(&self, node_id: NodeId) -> Option<&Node> {
        self.nodes.get(&node_id)
    }

    /// Get a mutable node by ID.
    ///
    /// Moving the node through this does not refresh connection paths; use
    /// [`Graph::move_node`] for that. Ports can only be removed through
    /// [`Graph::remove_port`]:
    ///
    /// ```compile_fail
    /// use nodeview_graph::{Graph, Node, PortType};
    ///
    /// let mut graph = Graph::new("Graph");
    /// let mut node = Node::new("Node");
    /// let input = node.add_input(PortType::Value, "In");
    /// let id = graph.add_node(node);
    /// graph.node_mut(id).unwrap().remove_port(input);
    /// ```
    pub fn node_mut(&mut self, node_id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(&node_id)
    }

    /// Get all nodes
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.values()
    }

    /// Get all node IDs
    pub fn node_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.keys().copied()
    }

    /// Get the number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Move a node and recompute the paths of everything attached to it
    pub fn move_node(&mut self, node_id: NodeId, position: Pos2) -> bool {
        let Some(node) = self.nodes.get_mut(&node_id) else {
            return false;
        };
        node.position = position;
        let ports: Vec<PortId> = node.ports().iter().map(|p| p.id).collect();
        let attached: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| ports.iter().any(|p| c.involves_port(*p)))
            .map(|c| c.id)
            .collect();
        for connection in attached {
            self.update_path(connection);
        }
        true
    }

    /// Add a port to a placed node
    pub fn add_port(
        &mut self,
        node_id: NodeId,
        direction: PortDirection,
        port_type: PortType,
        label: Option<&str>,
    ) -> Result<PortId, GraphError> {
        let node = self.nodes.get_mut(&node_id).ok_or(GraphError::NodeNotFound(node_id))?;
        Ok(node.add_port(direction, port_type, label))
    }

    /// Remove a port, severing its connections first
    pub fn remove_port(&mut self, port_id: PortId) -> Option<Port> {
        let node_id = self.port(port_id)?.node();
        self.sever_port(port_id);
        let port = self.nodes.get_mut(&node_id)?.remove_port(port_id);
        // Rows below the removed port moved up
        self.refresh_node_paths(node_id);
        port
    }

    /// Get a port by ID
    pub fn port(&self, port_id: PortId) -> Option<&Port> {
        self.nodes.values().find_map(|n| n.port(port_id))
    }

    fn port_mut(&mut self, port_id: PortId) -> Option<&mut Port> {
        self.nodes.values_mut().find_map(|n| n.port_mut(port_id))
    }

    /// Scene position of a port's attachment point
    pub fn port_position(&self, port_id: PortId) -> Option<Pos2> {
        let node = self.node(self.port(port_id)?.node())?;
        node.port_position(port_id, &self.config)
    }

    /// Owning nodes of every port feeding this node's inputs.
    ///
    /// Duplicates appear when several inputs come from the same node.
    pub fn immediate_ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let Some(node) = self.nodes.get(&node_id) else {
            return Vec::new();
        };
        node.inputs()
            .flat_map(|port| port.connected_ports())
            .filter_map(|peer| self.port(peer).map(Port::node))
            .collect()
    }

    /// Every node reachable by walking upstream from `node_id`, depth first.
    ///
    /// The root is never part of its own result, and each node is visited
    /// once, so a cyclic graph still terminates.
    pub fn all_ancestors(&self, node_id: NodeId) -> Vec<NodeId> {
        let mut visited: IndexSet<NodeId> = IndexSet::new();
        let mut stack = self.immediate_ancestors(node_id);
        stack.reverse();

        while let Some(current) = stack.pop() {
            if current == node_id || !visited.insert(current) {
                continue;
            }
            let mut parents = self.immediate_ancestors(current);
            parents.reverse();
            stack.extend(parents);
        }

        visited.into_iter().collect()
    }

    /// Create a pending connection anchored at `anchor`
    pub fn begin_connection(
        &mut self,
        anchor: PortId,
        free_end: Endpoint,
    ) -> Result<ConnectionId, GraphError> {
        let direction = self.port(anchor).ok_or(GraphError::PortNotFound(anchor))?.direction;
        let placeholder = ConnectionPath::compute(Pos2::ZERO, Pos2::ZERO, FreeEnd::None, &self.config);
        let connection = Connection::pending(anchor, direction, free_end, placeholder);
        let id = connection.id;
        self.connections.insert(id, connection);
        self.events.push(SceneEvent::ConnectionAttached(id));
        self.update_path(id);
        Ok(id)
    }

    /// Move the free end of a pending connection
    pub fn retarget(&mut self, connection_id: ConnectionId, free_end: Endpoint) -> bool {
        match self.connections.get_mut(&connection_id) {
            Some(connection) if connection.is_pending() => connection.set_free_end(free_end),
            _ => return false,
        }
        self.update_path(connection_id);
        true
    }

    /// Validate a pending connection and register it on both endpoints.
    ///
    /// An input that already has a connection loses it first. Nothing is
    /// mutated when validation fails.
    pub fn commit(&mut self, connection_id: ConnectionId) -> Result<(), ConnectionRejection> {
        let connection = self
            .connections
            .get(&connection_id)
            .ok_or(ConnectionRejection::UnknownConnection(connection_id))?;
        if connection.is_active() {
            return Ok(());
        }
        validator::validate(self, connection.anchor(), connection.free_end())?;

        // Validation guarantees both ends are ports
        let (Some(source), Some(destination)) =
            (connection.source().port(), connection.destination().port())
        else {
            return Err(ConnectionRejection::NotAPort);
        };

        let severed = self.remove_all_connections(destination);
        if !severed.is_empty() {
            tracing::debug!("Replaced {} connection(s) on input {:?}", severed.len(), destination);
        }

        if let Some(port) = self.port_mut(source) {
            port.connect_to(destination, connection_id);
        }
        if let Some(port) = self.port_mut(destination) {
            port.connect_to(source, connection_id);
        }
        if let Some(connection) = self.connections.get_mut(&connection_id) {
            connection.set_state(ConnectionState::Active);
            connection.set_opacity(1.0);
        }
        self.update_path(connection_id);
        tracing::debug!("Committed connection {:?}: {:?} -> {:?}", connection_id, source, destination);
        Ok(())
    }

    /// Unregister an active connection and turn it back into a pending one
    /// anchored at `keep`; its free end stays where the released port was.
    pub fn detach(&mut self, connection_id: ConnectionId, keep: PortId) -> Option<ConnectionId> {
        let connection = self.connections.get(&connection_id)?;
        if !connection.is_active() {
            return None;
        }
        let released = connection.peer_of(keep)?;
        let released_pos = self.port_position(released)?;
        let direction = self.port(keep)?.direction;

        if let Some(port) = self.port_mut(keep) {
            port.remove_connection(connection_id);
        }
        if let Some(port) = self.port_mut(released) {
            port.remove_connection(connection_id);
        }
        if let Some(connection) = self.connections.get_mut(&connection_id) {
            connection.set_anchor(keep, direction);
            connection.set_free_end(Endpoint::Point(released_pos));
            connection.set_state(ConnectionState::Pending);
        }
        self.update_path(connection_id);
        tracing::debug!("Detached connection {:?} from {:?}", connection_id, released);
        Some(connection_id)
    }

    /// Delete a connection outright, unregistering it if active.
    /// Absent connections are a no-op.
    pub fn remove_connection(&mut self, connection_id: ConnectionId) -> Option<Connection> {
        let connection = self.connections.shift_remove(&connection_id)?;
        if connection.is_active() {
            for endpoint in [connection.source(), connection.destination()] {
                if let Some(port) = endpoint.port().and_then(|p| self.port_mut(p)) {
                    port.remove_connection(connection_id);
                }
            }
        }
        self.events.push(SceneEvent::ConnectionDetached(connection_id));
        Some(connection)
    }

    /// Sever every active connection on a port: peers drop their matching
    /// entries and the connection objects leave the scene. A second call
    /// finds nothing and returns an empty list.
    pub fn remove_all_connections(&mut self, port_id: PortId) -> Vec<ConnectionId> {
        let Some(port) = self.port_mut(port_id) else {
            return Vec::new();
        };
        let entries = port.take_connections();
        for (connection, peer) in &entries {
            if let Some(peer) = self.port_mut(*peer) {
                peer.remove_connection(*connection);
            }
            if self.connections.shift_remove(connection).is_some() {
                self.events.push(SceneEvent::ConnectionDetached(*connection));
            }
        }
        entries.into_iter().map(|(connection, _)| connection).collect()
    }

    /// Validate and commit a connection between two ports in one step
    pub fn connect(&mut self, a: PortId, b: PortId) -> Result<ConnectionId, GraphError> {
        validator::validate(self, a, Endpoint::Port(b))?;
        let id = self.begin_connection(a, Endpoint::Port(b))?;
        if let Err(rejection) = self.commit(id) {
            self.remove_connection(id);
            return Err(rejection.into());
        }
        Ok(id)
    }

    /// Delete the active connection between two ports, if any
    pub fn disconnect(&mut self, a: PortId, b: PortId) -> bool {
        match self.connection_between(a, b) {
            Some(id) => self.remove_connection(id).is_some(),
            None => false,
        }
    }

    /// The active connection joining two ports
    pub fn connection_between(&self, a: PortId, b: PortId) -> Option<ConnectionId> {
        self.port(a)?
            .connections()
            .find(|(_, peer)| *peer == b)
            .map(|(connection, _)| connection)
    }

    /// Get a connection by ID
    pub fn connection(&self, connection_id: ConnectionId) -> Option<&Connection> {
        self.connections.get(&connection_id)
    }

    /// Get all connections, pending ones included
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values()
    }

    /// Get committed connections
    pub fn active_connections(&self) -> impl Iterator<Item = &Connection> {
        self.connections.values().filter(|c| c.is_active())
    }

    /// Get the number of connections, pending ones included
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    /// Get the number of committed connections
    pub fn active_connection_count(&self) -> usize {
        self.active_connections().count()
    }

    /// Collect queued scene effects
    pub fn take_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn set_port_highlight(&mut self, port_id: PortId, highlighted: bool) {
        let Some(port) = self.port_mut(port_id) else {
            return;
        };
        if port.is_highlighted() != highlighted {
            port.set_highlighted(highlighted);
            self.events.push(SceneEvent::PortHighlighted { port: port_id, highlighted });
        }
    }

    pub(crate) fn fade_port_connections(&mut self, port_id: PortId, opacity: f32) {
        let Some(port) = self.port(port_id) else {
            return;
        };
        let attached: Vec<ConnectionId> = port.connections().map(|(c, _)| c).collect();
        let duration = self.config.fade_duration();
        for id in attached {
            if let Some(connection) = self.connections.get_mut(&id) {
                if connection.opacity() != opacity {
                    connection.set_opacity(opacity);
                    self.events.push(SceneEvent::Fade { connection: id, opacity, duration });
                }
            }
        }
    }

    /// Active connections are severed, pending ones touching the port discarded
    fn sever_port(&mut self, port_id: PortId) {
        self.remove_all_connections(port_id);
        let pending: Vec<ConnectionId> = self
            .connections
            .values()
            .filter(|c| c.involves_port(port_id))
            .map(|c| c.id)
            .collect();
        for id in pending {
            self.remove_connection(id);
        }
    }

    fn refresh_node_paths(&mut self, node_id: NodeId) {
        if let Some(node) = self.nodes.get(&node_id) {
            let position = node.position;
            self.move_node(node_id, position);
        }
    }

    fn endpoint_position(&self, endpoint: Endpoint) -> Option<Pos2> {
        match endpoint {
            Endpoint::Port(port) => self.port_position(port),
            Endpoint::Point(pos) => Some(pos),
        }
    }

    fn update_path(&mut self, connection_id: ConnectionId) {
        let Some(connection) = self.connections.get(&connection_id) else {
            return;
        };
        let (Some(source), Some(destination)) = (
            self.endpoint_position(connection.source()),
            self.endpoint_position(connection.destination()),
        ) else {
            return;
        };
        let path = ConnectionPath::compute(source, destination, connection.free_side(), &self.config);
        if let Some(connection) = self.connections.get_mut(&connection_id) {
            connection.set_path(path);
            self.events.push(SceneEvent::PathChanged(connection_id));
        }
    }
}

impl SceneHost for Graph {
    /// Nodes from the top down, each one's ports before its body; a port
    /// hidden under a higher node's body is not reachable. Connections are
    /// painted below every node, so they come last.
    fn item_at(&self, pos: Pos2) -> Option<SceneItem> {
        for node in self.nodes.values().rev() {
            let port = node.ports().iter().find(|port| {
                node.port_hit_rect(port.id, &self.config)
                    .is_some_and(|rect| rect.contains(pos))
            });
            if let Some(port) = port {
                return Some(SceneItem::Port(port.id));
            }
            if node.rect(&self.config).contains(pos) {
                return Some(SceneItem::Node(node.id));
            }
        }

        let tolerance = self.config.port_radius;
        self.active_connections()
            .find(|connection| {
                connection
                    .path()
                    .sample(self.config.path_segments)
                    .iter()
                    .any(|p| p.distance(pos) <= tolerance)
            })
            .map(|connection| SceneItem::Connection(connection.id))
    }
}

impl Default for Graph {
    fn default() -> Self {
        Self::new("Untitled")
    }
}

/// Error from a graph operation
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// Node not found
    #[error("Node not found: {0:?}")]
    NodeNotFound(NodeId),

    /// Port not found
    #[error("Port not found: {0:?}")]
    PortNotFound(PortId),

    /// No such entry in the node registry
    #[error("Unknown node type: {0}")]
    UnknownNodeType(String),

    /// The connection is not legal
    #[error("Connection rejected: {0}")]
    Rejected(#[from] ConnectionRejection),
}
