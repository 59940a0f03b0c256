// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node graph connection engine for `NodeView`.
//!
//! Nodes own typed input/output ports; connections join one output to one
//! input. The crate keeps the graph valid while it is edited by pointer:
//! - Inputs accept at most one connection, outputs fan out freely
//! - No self-loops, duplicate edges or cycles
//! - Connections are dragged out of ports, snap to valid targets with
//!   highlight feedback, and commit or vanish on release
//!
//! ## Architecture
//!
//! [`Graph`] is the scene. It owns nodes (and through them ports) and every
//! connection object; ports and connections refer to each other by id only.
//! [`validator`] decides commit legality, [`DragController`] runs the
//! press/move/release state machine, and [`ui::GraphView`] is a thin egui
//! adapter. Rendering effects (highlight, fades, path changes) leave the core
//! as [`SceneEvent`]s.

pub mod catalog;
pub mod config;
pub mod connection;
pub mod drag;
pub mod graph;
pub mod node;
pub mod port;
pub mod registry;
pub mod scene;
pub mod ui;
pub mod validator;

pub use egui;

pub use config::EditorConfig;
pub use connection::{Connection, ConnectionId, ConnectionPath, ConnectionState, Endpoint};
pub use drag::{DragController, DragOutcome, DragState};
pub use graph::{Graph, GraphError};
pub use node::{Node, NodeId};
pub use port::{Port, PortDirection, PortId, PortType};
pub use registry::{NodeCategory, NodeRegistry, NodeType};
pub use scene::{SceneEvent, SceneHost, SceneItem};
pub use validator::ConnectionRejection;
