// SPDX-License-Identifier: MIT OR Apache-2.0
//! Connection (edge) definitions for the graph.
//!
//! A connection starts out `Pending`: anchored at one port, with a free end
//! that is either a raw scene point or a candidate port. Committing makes it
//! `Active` and registers it on both endpoint ports.

use crate::config::EditorConfig;
use crate::port::{PortDirection, PortId};
use egui::{Pos2, Vec2};
use uuid::Uuid;

/// Unique identifier for a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ConnectionId(pub Uuid);

impl ConnectionId {
    /// Create a new random connection ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ConnectionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Lifecycle state of a connection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Under construction, not registered on any port
    Pending,
    /// Committed and registered on both endpoints
    Active,
}

/// One end of a connection
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Endpoint {
    /// Attached to a port
    Port(PortId),
    /// Following the pointer at a scene position
    Point(Pos2),
}

impl Endpoint {
    /// The port, if this end is attached to one
    pub fn port(&self) -> Option<PortId> {
        match self {
            Self::Port(id) => Some(*id),
            Self::Point(_) => None,
        }
    }
}

/// Which end of a connection is following the pointer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeEnd {
    /// Both ends are fixed
    None,
    /// The source (output side) end is free
    Source,
    /// The destination (input side) end is free
    Destination,
}

/// Cubic curve of a connection, from the source point to the destination point.
///
/// Always leaves the source rightward and enters the destination from the
/// left, whatever the relative node positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionPath {
    /// Source point
    pub from: Pos2,
    /// Control point near the source
    pub ctrl1: Pos2,
    /// Control point near the destination
    pub ctrl2: Pos2,
    /// Destination point
    pub to: Pos2,
}

impl ConnectionPath {
    /// Compute the path between two endpoints.
    ///
    /// Control points sit `curve_fraction` of the horizontal span away from
    /// their endpoint. Anchored ends never go below `min_curve_offset`; the
    /// free end does not get that minimum so the curve tracks the pointer.
    pub fn compute(source: Pos2, dest: Pos2, free: FreeEnd, config: &EditorConfig) -> Self {
        let span = (dest.x - source.x).abs() * config.curve_fraction;
        let anchored = span.max(config.min_curve_offset);
        let (source_offset, dest_offset) = match free {
            FreeEnd::None => (anchored, anchored),
            FreeEnd::Source => (span, anchored),
            FreeEnd::Destination => (anchored, span),
        };

        Self {
            from: source,
            ctrl1: source + Vec2::new(source_offset, 0.0),
            ctrl2: dest - Vec2::new(dest_offset, 0.0),
            to: dest,
        }
    }

    /// The four curve points
    pub fn points(&self) -> [Pos2; 4] {
        [self.from, self.ctrl1, self.ctrl2, self.to]
    }

    /// Generate points along the curve
    pub fn sample(&self, segments: usize) -> Vec<Pos2> {
        let segments = segments.max(1);
        let mut points = Vec::with_capacity(segments + 1);
        for i in 0..=segments {
            let t = i as f32 / segments as f32;
            let t2 = t * t;
            let t3 = t2 * t;
            let mt = 1.0 - t;
            let mt2 = mt * mt;
            let mt3 = mt2 * mt;

            let x = mt3 * self.from.x + 3.0 * mt2 * t * self.ctrl1.x + 3.0 * mt * t2 * self.ctrl2.x + t3 * self.to.x;
            let y = mt3 * self.from.y + 3.0 * mt2 * t * self.ctrl1.y + 3.0 * mt * t2 * self.ctrl2.y + t3 * self.to.y;

            points.push(Pos2::new(x, y));
        }
        points
    }
}

/// A connection between an output port and an input port
#[derive(Debug, Clone)]
pub struct Connection {
    /// Unique connection ID
    pub id: ConnectionId,
    anchor: PortId,
    anchor_direction: PortDirection,
    free_end: Endpoint,
    state: ConnectionState,
    path: ConnectionPath,
    opacity: f32,
}

impl Connection {
    pub(crate) fn pending(
        anchor: PortId,
        anchor_direction: PortDirection,
        free_end: Endpoint,
        path: ConnectionPath,
    ) -> Self {
        Self {
            id: ConnectionId::new(),
            anchor,
            anchor_direction,
            free_end,
            state: ConnectionState::Pending,
            path,
            opacity: 1.0,
        }
    }

    /// The port this connection is anchored at
    pub fn anchor(&self) -> PortId {
        self.anchor
    }

    /// The other end: a port or a raw point
    pub fn free_end(&self) -> Endpoint {
        self.free_end
    }

    /// Lifecycle state
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    /// Is the connection committed
    pub fn is_active(&self) -> bool {
        self.state == ConnectionState::Active
    }

    /// Is the connection under construction
    pub fn is_pending(&self) -> bool {
        self.state == ConnectionState::Pending
    }

    /// Output side endpoint
    pub fn source(&self) -> Endpoint {
        match self.anchor_direction {
            PortDirection::Output => Endpoint::Port(self.anchor),
            PortDirection::Input => self.free_end,
        }
    }

    /// Input side endpoint
    pub fn destination(&self) -> Endpoint {
        match self.anchor_direction {
            PortDirection::Output => self.free_end,
            PortDirection::Input => Endpoint::Port(self.anchor),
        }
    }

    /// Which end follows the pointer
    pub fn free_side(&self) -> FreeEnd {
        match (self.state, self.anchor_direction) {
            (ConnectionState::Active, _) => FreeEnd::None,
            (ConnectionState::Pending, PortDirection::Output) => FreeEnd::Destination,
            (ConnectionState::Pending, PortDirection::Input) => FreeEnd::Source,
        }
    }

    /// Does either end sit on `port`
    pub fn involves_port(&self, port: PortId) -> bool {
        self.anchor == port || self.free_end.port() == Some(port)
    }

    /// The port at the other end from `port`, if both ends are ports
    pub fn peer_of(&self, port: PortId) -> Option<PortId> {
        let free = self.free_end.port()?;
        if port == self.anchor {
            Some(free)
        } else if port == free {
            Some(self.anchor)
        } else {
            None
        }
    }

    /// Current curve
    pub fn path(&self) -> &ConnectionPath {
        &self.path
    }

    /// Target opacity for the paint routine
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    pub(crate) fn set_free_end(&mut self, free_end: Endpoint) {
        self.free_end = free_end;
    }

    pub(crate) fn set_anchor(&mut self, anchor: PortId, direction: PortDirection) {
        self.anchor = anchor;
        self.anchor_direction = direction;
    }

    pub(crate) fn set_state(&mut self, state: ConnectionState) {
        self.state = state;
    }

    pub(crate) fn set_path(&mut self, path: ConnectionPath) {
        self.path = path;
    }

    pub(crate) fn set_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_exits_right_enters_left() {
        let config = EditorConfig::default();
        // Destination left of the source: curve still leaves rightward
        let path = ConnectionPath::compute(
            Pos2::new(300.0, 0.0),
            Pos2::new(100.0, 50.0),
            FreeEnd::None,
            &config,
        );
        assert_eq!(path.ctrl1, Pos2::new(400.0, 0.0));
        assert_eq!(path.ctrl2, Pos2::new(0.0, 50.0));
        assert_eq!(path.from, Pos2::new(300.0, 0.0));
        assert_eq!(path.to, Pos2::new(100.0, 50.0));
    }

    #[test]
    fn test_free_end_has_no_minimum_offset() {
        let config = EditorConfig::default();
        let source = Pos2::new(0.0, 0.0);
        let dest = Pos2::new(10.0, 40.0);

        let fixed = ConnectionPath::compute(source, dest, FreeEnd::None, &config);
        assert_eq!(fixed.ctrl2.x, 10.0 - config.min_curve_offset);

        let dragging = ConnectionPath::compute(source, dest, FreeEnd::Destination, &config);
        assert_eq!(dragging.ctrl1.x, config.min_curve_offset);
        assert_eq!(dragging.ctrl2.x, 5.0);

        let from_input = ConnectionPath::compute(source, dest, FreeEnd::Source, &config);
        assert_eq!(from_input.ctrl1.x, 5.0);
    }

    #[test]
    fn test_sample_endpoints() {
        let config = EditorConfig::default();
        let path = ConnectionPath::compute(
            Pos2::new(0.0, 0.0),
            Pos2::new(200.0, 100.0),
            FreeEnd::None,
            &config,
        );
        let points = path.sample(16);
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], path.from);
        assert_eq!(points[16], path.to);
    }

    #[test]
    fn test_endpoints_follow_anchor_direction() {
        let config = EditorConfig::default();
        let anchor = PortId::new();
        let path = ConnectionPath::compute(Pos2::ZERO, Pos2::ZERO, FreeEnd::Destination, &config);
        let point = Endpoint::Point(Pos2::new(5.0, 5.0));

        let from_output = Connection::pending(anchor, PortDirection::Output, point, path);
        assert_eq!(from_output.source(), Endpoint::Port(anchor));
        assert_eq!(from_output.destination(), point);
        assert_eq!(from_output.free_side(), FreeEnd::Destination);

        let from_input = Connection::pending(anchor, PortDirection::Input, point, path);
        assert_eq!(from_input.destination(), Endpoint::Port(anchor));
        assert_eq!(from_input.free_side(), FreeEnd::Source);
        assert_eq!(from_input.peer_of(anchor), None);
    }
}
