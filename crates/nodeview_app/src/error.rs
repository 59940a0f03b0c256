// SPDX-License-Identifier: MIT OR Apache-2.0
//! Application errors.

use nodeview_graph::config::ConfigError;
use nodeview_graph::GraphError;
use thiserror::Error;

/// Errors surfaced by the `nodeview` binary
#[derive(Debug, Error)]
pub enum AppError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Session file did not parse
    #[error("Invalid session file: {0}")]
    Session(#[from] ron::error::SpannedError),

    /// Config file did not load
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Graph operation failed
    #[error("Graph error: {0}")]
    Graph(#[from] GraphError),

    /// Session refers to a node it never declared
    #[error("Unknown node in session: {0}")]
    UnknownNode(String),

    /// Session refers to a port label the node does not have
    #[error("Node {node} has no port labelled {port}")]
    UnknownPort {
        /// Node name
        node: String,
        /// Port label
        port: String,
    },
}

/// Result type for application operations
pub type Result<T> = std::result::Result<T, AppError>;
