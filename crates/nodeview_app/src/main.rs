// SPDX-License-Identifier: MIT OR Apache-2.0
//! `NodeView` - node graph connection engine driver.
//!
//! Builds a scene from the built-in node catalog and replays a scripted
//! pointer session against it, the way an interactive canvas would:
//! press on a port, move over candidates, release to commit or discard.
//!
//! ```text
//! nodeview [--config <config.ron>] [<session.ron>]
//! ```
//!
//! Without a session file the built-in demo session runs.

mod error;
mod session;

use clap::Parser;
use error::Result;
use nodeview_graph::catalog::default_registry;
use nodeview_graph::EditorConfig;
use session::{Replay, Session};
use std::path::PathBuf;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Replay a pointer session against the node graph connection engine
#[derive(Parser, Debug)]
#[command(name = "nodeview", version)]
struct Args {
    /// Editor config (RON). Defaults apply when absent.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Session script (RON). The built-in demo runs when absent.
    session: Option<PathBuf>,
}

fn run(args: Args) -> Result<()> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let session = match &args.session {
        Some(path) => {
            tracing::info!("Loading session {:?}", path);
            Session::load(path)?
        }
        None => Session::demo(),
    };

    let registry = default_registry();
    let mut replay = Replay::new(&session, &registry, config)?;
    let summary = replay.run(&session.gestures)?;

    tracing::info!(
        "Replayed {} gestures: {} committed, {} discarded",
        session.gestures.len(),
        summary.committed,
        summary.discarded
    );
    tracing::debug!(
        "{} active connection(s) across {} nodes",
        replay.graph().active_connection_count(),
        replay.graph().node_count()
    );
    for line in replay.describe_connections() {
        println!("{line}");
    }
    Ok(())
}

fn main() {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    for directive in ["nodeview_app=info", "nodeview_graph=info"] {
        if let Ok(directive) = directive.parse() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting NodeView v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(Args::parse()) {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_args() {
        let args = Args::try_parse_from(["nodeview", "--config", "style.ron", "demo.ron"]).unwrap();
        assert_eq!(args.config, Some(PathBuf::from("style.ron")));
        assert_eq!(args.session, Some(PathBuf::from("demo.ron")));

        let empty = Args::try_parse_from(["nodeview"]).unwrap();
        assert!(empty.config.is_none() && empty.session.is_none());
    }

    #[test]
    fn test_parse_errors() {
        assert!(Args::try_parse_from(["nodeview", "--config"]).is_err());
        assert!(Args::try_parse_from(["nodeview", "--verbose"]).is_err());
        assert!(Args::try_parse_from(["nodeview", "a.ron", "b.ron"]).is_err());
    }
}
