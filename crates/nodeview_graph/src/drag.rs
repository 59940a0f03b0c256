// SPDX-License-Identifier: MIT OR Apache-2.0
//! Pointer-driven connection creation.
//!
//! `Idle -> Dragging -> (committed | discarded) -> Idle`. A press on a port
//! starts a pending connection, moves retarget its free end (snapping to
//! valid ports with highlight feedback), and the release commits it or
//! discards it. Releasing anywhere that is not a valid port is the only way
//! to cancel.

use crate::connection::{ConnectionId, Endpoint};
use crate::graph::Graph;
use crate::port::PortId;
use crate::scene::{SceneHost, SceneItem};
use crate::validator;
use egui::Pos2;

/// Interaction state
#[derive(Debug, Clone, Default, PartialEq)]
pub enum DragState {
    /// No gesture in progress
    #[default]
    Idle,
    /// A pending connection follows the pointer
    Dragging {
        /// The pending connection
        connection: ConnectionId,
        /// Port currently highlighted as drop target
        candidate: Option<PortId>,
        /// Item under the pointer at the last move
        last_item: Option<SceneItem>,
    },
}

/// Result of a release
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOutcome {
    /// The connection is now active
    Committed(ConnectionId),
    /// The pending connection was removed from the scene
    Discarded(ConnectionId),
    /// Nothing was being dragged
    Ignored,
}

/// Drives a pending connection from pointer events
#[derive(Debug, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Create an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> &DragState {
        &self.state
    }

    /// Is a connection being dragged
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The pending connection, while dragging
    pub fn pending_connection(&self) -> Option<ConnectionId> {
        match self.state {
            DragState::Dragging { connection, .. } => Some(connection),
            DragState::Idle => None,
        }
    }

    /// Pointer pressed on a port's hit region.
    ///
    /// Pressing an input that already has a connection pulls that connection
    /// loose: the same object goes back to pending, anchored at its output,
    /// with its free end at the pointer. Any other press starts a new pending
    /// connection at the pressed port.
    pub fn press(&mut self, graph: &mut Graph, port_id: PortId, pos: Pos2) -> Option<ConnectionId> {
        if self.is_dragging() {
            return None;
        }
        let port = graph.port(port_id)?;
        let existing = if port.is_input() {
            port.connections().next()
        } else {
            None
        };

        let connection = match existing {
            Some((connection, output)) => {
                let id = graph.detach(connection, output)?;
                graph.retarget(id, Endpoint::Point(pos));
                tracing::debug!("Rerouting connection {:?} from {:?}", id, port_id);
                id
            }
            None => {
                let id = graph.begin_connection(port_id, Endpoint::Point(pos)).ok()?;
                tracing::debug!("Started connection {:?} at {:?}", id, port_id);
                id
            }
        };

        self.state = DragState::Dragging {
            connection,
            candidate: None,
            last_item: None,
        };
        Some(connection)
    }

    /// Pointer moved, using the graph's own hit-testing
    pub fn move_to(&mut self, graph: &mut Graph, pos: Pos2) {
        let item = graph.item_at(pos);
        self.hover(graph, item, pos);
    }

    /// Pointer moved, resolving the item under it through an external scene
    pub fn move_over(&mut self, graph: &mut Graph, host: &dyn SceneHost, pos: Pos2) {
        let item = host.item_at(pos);
        self.hover(graph, item, pos);
    }

    fn hover(&mut self, graph: &mut Graph, item: Option<SceneItem>, pos: Pos2) {
        let DragState::Dragging {
            connection,
            candidate,
            last_item,
        } = &mut self.state
        else {
            return;
        };
        let connection = *connection;
        let Some(anchor) = graph.connection(connection).map(|c| c.anchor()) else {
            return;
        };

        if *last_item != item {
            if let Some(previous) = candidate.take() {
                clear_feedback(graph, previous);
            }
            *last_item = item;
        }

        let target = match item {
            Some(SceneItem::Port(port))
                if validator::can_connect(graph, port, Endpoint::Port(anchor)) =>
            {
                if *candidate != Some(port) {
                    show_feedback(graph, port);
                    *candidate = Some(port);
                }
                Endpoint::Port(port)
            }
            _ => Endpoint::Point(pos),
        };
        graph.retarget(connection, target);
    }

    /// Pointer released: commit against the current free end, or discard
    pub fn release(&mut self, graph: &mut Graph) -> DragOutcome {
        let DragState::Dragging {
            connection,
            candidate,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return DragOutcome::Ignored;
        };
        if let Some(port) = candidate {
            clear_feedback(graph, port);
        }

        match graph.commit(connection) {
            Ok(()) => DragOutcome::Committed(connection),
            Err(rejection) => {
                tracing::trace!("Discarding connection {:?}: {}", connection, rejection);
                discard(graph, connection)
            }
        }
    }

    /// Drop the pending connection without attempting a commit
    pub fn cancel(&mut self, graph: &mut Graph) -> DragOutcome {
        let DragState::Dragging {
            connection,
            candidate,
            ..
        } = std::mem::take(&mut self.state)
        else {
            return DragOutcome::Ignored;
        };
        if let Some(port) = candidate {
            clear_feedback(graph, port);
        }
        discard(graph, connection)
    }
}

fn discard(graph: &mut Graph, connection: ConnectionId) -> DragOutcome {
    graph.remove_connection(connection);
    tracing::debug!("Discarded connection {:?}", connection);
    DragOutcome::Discarded(connection)
}

fn show_feedback(graph: &mut Graph, port: PortId) {
    graph.set_port_highlight(port, true);
    // Only an input loses its connections on commit
    if graph.port(port).is_some_and(|p| p.is_input()) {
        let faded = graph.config().faded_opacity;
        graph.fade_port_connections(port, faded);
    }
}

fn clear_feedback(graph: &mut Graph, port: PortId) {
    graph.set_port_highlight(port, false);
    graph.fade_port_connections(port, 1.0);
}
