//! On-disk cassette layout.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A recorded session of port interactions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cassette {
    /// Human-readable cassette name.
    pub name: String,
    /// When the recording finished.
    pub recorded_at: DateTime<Utc>,
    /// Git commit the recording was made from.
    pub commit: String,
    /// Interactions in recording order.
    pub interactions: Vec<Interaction>,
}

/// One call through a port and what it returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interaction {
    /// Position in the recording.
    pub seq: u64,
    /// Port name, e.g. `image_service`.
    pub port: String,
    /// Method name, e.g. `submit`.
    pub method: String,
    /// Serialized call input.
    pub input: serde_json::Value,
    /// Serialized `Ok`/`Err` output.
    pub output: serde_json::Value,
}
