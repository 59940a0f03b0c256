// SPDX-License-Identifier: MIT OR Apache-2.0
//! Commit legality for a candidate connection.
//!
//! All checks are pure reads of the current graph. Callers validate before
//! mutating anything, so the cycle check always sees a consistent graph.

use crate::connection::{ConnectionId, Endpoint};
use crate::graph::Graph;
use crate::port::PortId;

/// Why a candidate connection cannot be committed
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ConnectionRejection {
    /// The free end is a raw scene point
    #[error("Target is not a port")]
    NotAPort,

    /// Port id does not resolve
    #[error("Port not found: {0:?}")]
    UnknownPort(PortId),

    /// Connection id does not resolve
    #[error("Connection not found: {0:?}")]
    UnknownConnection(ConnectionId),

    /// Both ends are the same port
    #[error("A port cannot connect to itself")]
    SamePort,

    /// Both ports belong to the same node
    #[error("Self-loop not allowed")]
    SameNode,

    /// Two inputs or two outputs
    #[error("Ports have the same direction")]
    SameDirection,

    /// The input's node already reaches the output's node
    #[error("Connection would create a cycle")]
    WouldCycle,

    /// The ports are already connected
    #[error("Ports are already connected")]
    AlreadyConnected,
}

/// Check whether `a` may be connected to `b`.
///
/// Argument order does not matter: whichever port is the input receives the
/// connection.
pub fn validate(graph: &Graph, a: PortId, b: Endpoint) -> Result<(), ConnectionRejection> {
    let b = match b {
        Endpoint::Port(port) => port,
        Endpoint::Point(_) => return Err(ConnectionRejection::NotAPort),
    };
    if a == b {
        return Err(ConnectionRejection::SamePort);
    }

    let port_a = graph.port(a).ok_or(ConnectionRejection::UnknownPort(a))?;
    let port_b = graph.port(b).ok_or(ConnectionRejection::UnknownPort(b))?;

    if port_a.node() == port_b.node() {
        return Err(ConnectionRejection::SameNode);
    }
    if port_a.direction == port_b.direction {
        return Err(ConnectionRejection::SameDirection);
    }
    if port_a.is_connected_to(b) || port_b.is_connected_to(a) {
        return Err(ConnectionRejection::AlreadyConnected);
    }

    let (input, output) = if port_a.is_input() {
        (port_a, port_b)
    } else {
        (port_b, port_a)
    };
    if graph.all_ancestors(output.node()).contains(&input.node()) {
        return Err(ConnectionRejection::WouldCycle);
    }

    Ok(())
}

/// Boolean form of [`validate`]
pub fn can_connect(graph: &Graph, a: PortId, b: Endpoint) -> bool {
    validate(graph, a, b).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::port::PortType;
    use egui::Pos2;

    struct Chain {
        graph: Graph,
        a_in: PortId,
        a_out: PortId,
        b_in: PortId,
        b_out: PortId,
        c_in: PortId,
        c_out: PortId,
    }

    /// Three nodes with one input and one output each, unconnected
    fn chain() -> Chain {
        let mut graph = Graph::new("Test");
        let mut ports = Vec::new();
        for title in ["A", "B", "C"] {
            let mut node = Node::new(title);
            let input = node.add_input(PortType::Value, "In");
            let output = node.add_output(PortType::Value, "Out");
            graph.add_node(node);
            ports.push((input, output));
        }
        Chain {
            graph,
            a_in: ports[0].0,
            a_out: ports[0].1,
            b_in: ports[1].0,
            b_out: ports[1].1,
            c_in: ports[2].0,
            c_out: ports[2].1,
        }
    }

    #[test]
    fn test_point_is_not_a_port() {
        let c = chain();
        assert_eq!(
            validate(&c.graph, c.a_out, Endpoint::Point(Pos2::new(1.0, 1.0))),
            Err(ConnectionRejection::NotAPort)
        );
    }

    #[test]
    fn test_same_port_and_same_node() {
        let c = chain();
        assert_eq!(
            validate(&c.graph, c.a_out, Endpoint::Port(c.a_out)),
            Err(ConnectionRejection::SamePort)
        );
        assert_eq!(
            validate(&c.graph, c.a_out, Endpoint::Port(c.a_in)),
            Err(ConnectionRejection::SameNode)
        );
    }

    #[test]
    fn test_same_direction() {
        let c = chain();
        assert_eq!(
            validate(&c.graph, c.a_out, Endpoint::Port(c.b_out)),
            Err(ConnectionRejection::SameDirection)
        );
        assert_eq!(
            validate(&c.graph, c.a_in, Endpoint::Port(c.b_in)),
            Err(ConnectionRejection::SameDirection)
        );
    }

    #[test]
    fn test_unknown_port() {
        let c = chain();
        let stray = PortId::new();
        assert_eq!(
            validate(&c.graph, c.a_out, Endpoint::Port(stray)),
            Err(ConnectionRejection::UnknownPort(stray))
        );
    }

    #[test]
    fn test_order_independent() {
        let c = chain();
        assert!(can_connect(&c.graph, c.a_out, Endpoint::Port(c.b_in)));
        assert!(can_connect(&c.graph, c.b_in, Endpoint::Port(c.a_out)));
    }

    #[test]
    fn test_duplicate_rejected_both_ways() {
        let mut c = chain();
        c.graph.connect(c.a_out, c.b_in).unwrap();
        assert_eq!(
            validate(&c.graph, c.a_out, Endpoint::Port(c.b_in)),
            Err(ConnectionRejection::AlreadyConnected)
        );
        assert_eq!(
            validate(&c.graph, c.b_in, Endpoint::Port(c.a_out)),
            Err(ConnectionRejection::AlreadyConnected)
        );
    }

    #[test]
    fn test_cycle_rejected() {
        let mut c = chain();
        c.graph.connect(c.a_out, c.b_in).unwrap();
        c.graph.connect(c.b_out, c.c_in).unwrap();

        assert_eq!(
            validate(&c.graph, c.c_out, Endpoint::Port(c.a_in)),
            Err(ConnectionRejection::WouldCycle)
        );
        assert_eq!(
            validate(&c.graph, c.a_in, Endpoint::Port(c.c_out)),
            Err(ConnectionRejection::WouldCycle)
        );
        // Two-node loop
        assert_eq!(
            validate(&c.graph, c.b_out, Endpoint::Port(c.a_in)),
            Err(ConnectionRejection::WouldCycle)
        );
    }

    #[test]
    fn test_parallel_path_allowed() {
        // A -> B -> C plus A -> C is a diamond, not a cycle
        let mut graph = Graph::new("Test");
        let mut a = Node::new("A");
        let a_out = a.add_output(PortType::Value, "Out");
        let mut b = Node::new("B");
        let b_in = b.add_input(PortType::Value, "In");
        let b_out = b.add_output(PortType::Value, "Out");
        let mut c = Node::new("C");
        let c_in1 = c.add_input(PortType::Value, "In 1");
        let c_in2 = c.add_input(PortType::Value, "In 2");
        graph.add_node(a);
        graph.add_node(b);
        graph.add_node(c);

        graph.connect(a_out, b_in).unwrap();
        graph.connect(b_out, c_in1).unwrap();
        assert!(can_connect(&graph, a_out, Endpoint::Port(c_in2)));
    }

    #[test]
    fn test_validation_is_pure() {
        let mut c = chain();
        c.graph.connect(c.a_out, c.b_in).unwrap();
        c.graph.take_events();
        let before = c.graph.active_connection_count();

        let _ = validate(&c.graph, c.b_out, Endpoint::Port(c.a_in));
        let _ = validate(&c.graph, c.c_out, Endpoint::Port(c.b_in));

        assert_eq!(c.graph.active_connection_count(), before);
        assert!(c.graph.take_events().is_empty());
    }
}
