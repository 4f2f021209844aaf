use serde::{Deserialize, Serialize};
use std::time::Duration;

/// A single recorded entry: when it was received, what kind of message it
/// carries, and the raw payload bytes.
///
/// Immutable once read. Entries are written in non-decreasing timestamp
/// order by construction of the recorder; readers must not rely on that
/// (the playback layer detects and reports violations).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Simulation time at which the message was recorded.
    pub timestamp: Duration,
    /// Message type tag, e.g. `simlog.msgs.PoseBatch`.
    pub type_tag: String,
    /// Opaque payload bytes, decoded by the playback layer.
    pub payload: Vec<u8>,
}

impl LogEntry {
    pub fn new(timestamp: Duration, type_tag: impl Into<String>, payload: Vec<u8>) -> Self {
        Self {
            timestamp,
            type_tag: type_tag.into(),
            payload,
        }
    }
}
