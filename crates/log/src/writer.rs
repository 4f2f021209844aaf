//! Recorder-side log authoring, used by tests and the demo tooling.

use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::entry::LogEntry;
use crate::store::LogError;

/// Accumulates log entries in arrival order and writes them out as one
/// CBOR batch, the format [`crate::LogHandle::open`] reads back.
#[derive(Debug, Default)]
pub struct LogWriter {
    entries: Vec<LogEntry>,
}

impl LogWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a raw entry. Arrival order is preserved verbatim; the writer
    /// does not sort by timestamp.
    pub fn append(&mut self, timestamp: Duration, type_tag: impl Into<String>, payload: Vec<u8>) {
        self.entries.push(LogEntry::new(timestamp, type_tag, payload));
    }

    /// Append an entry whose payload is the CBOR encoding of `message`.
    pub fn append_message<T: Serialize>(
        &mut self,
        timestamp: Duration,
        type_tag: impl Into<String>,
        message: &T,
    ) -> Result<(), LogError> {
        let mut payload = Vec::new();
        ciborium::into_writer(message, &mut payload)
            .map_err(|e| LogError::Encode(e.to_string()))?;
        self.append(timestamp, type_tag, payload);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the accumulated batch to `path`.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), LogError> {
        let mut buf = Vec::new();
        ciborium::into_writer(&self.entries, &mut buf)
            .map_err(|e| LogError::Encode(e.to_string()))?;
        std::fs::write(path.as_ref(), &buf)?;
        tracing::debug!(
            entries = self.entries.len(),
            path = %path.as_ref().display(),
            "event log written"
        );
        Ok(())
    }
}
