//! Configuration types shared across the engine and connectors.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Global configuration for the reconciliation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GridConfig {
    /// Optional bound on each per-symbol snapshot call.
    ///
    /// The upstream behavior is unbounded; when set, a call that exceeds the
    /// timeout is treated like any other per-symbol failure and replaced by a
    /// fallback placeholder entry.
    pub snapshot_timeout: Option<Duration>,
    /// Capacity of the tick channel between a stream session and the engine,
    /// handed to the connector when the stream opens. Must be non-zero.
    pub channel_capacity: usize,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            snapshot_timeout: None,
            channel_capacity: 1024,
        }
    }
}
