// SPDX-License-Identifier: MIT OR Apache-2.0
//! Editor configuration: node geometry, curve shape, drag feedback.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Width given to nodes that do not override it
pub const DEFAULT_NODE_WIDTH: f32 = 150.0;

/// Error loading or saving an [`EditorConfig`]
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed RON
    #[error("Invalid config: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// Serialization failed
    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] ron::Error),
}

/// Visual and interaction settings shared by the graph and its view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Height of the title bar
    pub header_height: f32,
    /// Height of one port row
    pub port_height: f32,
    /// Radius of a port circle; the hit region is a square of twice this side
    pub port_radius: f32,
    /// Space below the last port row
    pub node_padding: f32,
    /// Horizontal control point offset as a fraction of the horizontal span
    pub curve_fraction: f32,
    /// Smallest control point offset at an anchored port
    pub min_curve_offset: f32,
    /// Line segments used when sampling a connection path
    pub path_segments: usize,
    /// Opacity of connections that a pending reroute would replace
    pub faded_opacity: f32,
    /// Duration of fade effects, in milliseconds
    pub fade_duration_ms: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            header_height: 24.0,
            port_height: 22.0,
            port_radius: 6.0,
            node_padding: 8.0,
            curve_fraction: 0.5,
            min_curve_offset: 20.0,
            path_segments: 32,
            faded_opacity: 0.25,
            fade_duration_ms: 150,
        }
    }
}

impl EditorConfig {
    /// Parse a config from RON text
    pub fn from_ron(text: &str) -> Result<Self, ConfigError> {
        Ok(ron::from_str(text)?)
    }

    /// Serialize to pretty RON
    pub fn to_ron(&self) -> Result<String, ConfigError> {
        Ok(ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())?)
    }

    /// Load from a file; a missing file yields the defaults
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!("No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_ron(&content)
    }

    /// Save to a file
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        std::fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Fade effect duration
    pub fn fade_duration(&self) -> Duration {
        Duration::from_millis(self.fade_duration_ms)
    }
}
