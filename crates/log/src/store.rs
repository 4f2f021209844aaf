//! Opening and iterating a recording directory.

use std::path::{Path, PathBuf};

use crate::entry::LogEntry;

/// File name of the binary event log inside a recording directory.
pub const EVENT_LOG_FILE: &str = "state.tlog";
/// File name of the world description inside a recording directory.
pub const WORLD_FILE: &str = "world.yaml";

/// Errors from opening a recording directory.
#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("recording path not found or not a directory: {0}")]
    PathNotFound(PathBuf),
    #[error("recording is missing required artifact: {0}")]
    MissingArtifact(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("event log decode error: {0}")]
    Decode(String),
    #[error("event log encode error: {0}")]
    Encode(String),
}

/// An opened recording directory with its event log fully decoded.
///
/// The whole batch is read at open time so that iteration during playback
/// never touches the filesystem.
#[derive(Debug)]
pub struct LogHandle {
    world_path: PathBuf,
    entries: Vec<LogEntry>,
}

impl LogHandle {
    /// Open a recording directory and decode its event log.
    ///
    /// Validates that the directory exists and contains both required
    /// artifacts before reading anything.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, LogError> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(LogError::PathNotFound(dir.to_path_buf()));
        }

        let log_path = dir.join(EVENT_LOG_FILE);
        let world_path = dir.join(WORLD_FILE);
        for required in [&log_path, &world_path] {
            if !required.is_file() {
                return Err(LogError::MissingArtifact(required.clone()));
            }
        }

        tracing::info!(log = %log_path.display(), world = %world_path.display(), "loading recording");

        let bytes = std::fs::read(&log_path)?;
        let entries: Vec<LogEntry> =
            ciborium::from_reader(bytes.as_slice()).map_err(|e| LogError::Decode(e.to_string()))?;

        tracing::debug!(entries = entries.len(), "event log decoded");

        Ok(Self {
            world_path,
            entries,
        })
    }

    /// Path of the world description artifact inside the recording.
    pub fn world_path(&self) -> &Path {
        &self.world_path
    }

    /// Number of entries in the event log.
    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }

    /// Consume the handle and iterate all entries in stored order, across
    /// the full time range, with no filtering.
    ///
    /// Taking the handle by value makes the single-pass contract explicit:
    /// replaying from the start requires reopening the directory.
    pub fn query_all(self) -> LogIterator {
        LogIterator {
            entries: self.entries,
            pos: 0,
        }
    }
}

/// Forward-only cursor over a decoded event log batch.
///
/// Never resets. Terminal state = exhausted.
pub struct LogIterator {
    entries: Vec<LogEntry>,
    pos: usize,
}

impl LogIterator {
    /// The entry under the cursor, or `None` once exhausted.
    pub fn current(&self) -> Option<&LogEntry> {
        self.entries.get(self.pos)
    }

    /// Advance the cursor one step. No-op once exhausted.
    pub fn advance(&mut self) {
        if self.pos < self.entries.len() {
            self.pos += 1;
        }
    }

    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.entries.len()
    }

    /// Entries not yet visited, including the current one.
    pub fn remaining(&self) -> usize {
        self.entries.len() - self.pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::LogWriter;
    use std::time::Duration;

    fn write_recording(dir: &Path, entries: &[(u64, &str)]) {
        let mut writer = LogWriter::new();
        for (secs, tag) in entries {
            writer.append(Duration::from_secs(*secs), *tag, vec![0x01]);
        }
        writer.write_to(dir.join(EVENT_LOG_FILE)).unwrap();
        std::fs::write(dir.join(WORLD_FILE), "worlds: []\n").unwrap();
    }

    #[test]
    fn open_missing_directory_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let err = LogHandle::open(tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, LogError::PathNotFound(_)));
    }

    #[test]
    fn open_reports_missing_artifacts() {
        let tmp = tempfile::tempdir().unwrap();
        // Directory exists but holds neither artifact.
        let err = LogHandle::open(tmp.path()).unwrap_err();
        match err {
            LogError::MissingArtifact(path) => {
                assert!(path.ends_with(EVENT_LOG_FILE));
            }
            other => panic!("expected MissingArtifact, got {other:?}"),
        }

        // Log present, world description absent.
        LogWriter::new()
            .write_to(tmp.path().join(EVENT_LOG_FILE))
            .unwrap();
        let err = LogHandle::open(tmp.path()).unwrap_err();
        match err {
            LogError::MissingArtifact(path) => {
                assert!(path.ends_with(WORLD_FILE));
            }
            other => panic!("expected MissingArtifact, got {other:?}"),
        }
    }

    #[test]
    fn open_rejects_corrupt_log() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::write(tmp.path().join(EVENT_LOG_FILE), b"not cbor at all").unwrap();
        std::fs::write(tmp.path().join(WORLD_FILE), "worlds: []\n").unwrap();
        let err = LogHandle::open(tmp.path()).unwrap_err();
        assert!(matches!(err, LogError::Decode(_)));
    }

    #[test]
    fn query_all_yields_stored_order() {
        let tmp = tempfile::tempdir().unwrap();
        write_recording(tmp.path(), &[(0, "a"), (1, "b"), (2, "c")]);

        let handle = LogHandle::open(tmp.path()).unwrap();
        assert_eq!(handle.entry_count(), 3);

        let mut iter = handle.query_all();
        let mut seen = Vec::new();
        while let Some(entry) = iter.current() {
            seen.push(entry.type_tag.clone());
            iter.advance();
        }
        assert_eq!(seen, vec!["a", "b", "c"]);
        assert!(iter.is_exhausted());
    }

    #[test]
    fn iterator_is_forward_only() {
        let tmp = tempfile::tempdir().unwrap();
        write_recording(tmp.path(), &[(0, "a")]);

        let mut iter = LogHandle::open(tmp.path()).unwrap().query_all();
        assert_eq!(iter.remaining(), 1);
        iter.advance();
        assert!(iter.is_exhausted());
        assert!(iter.current().is_none());

        // Advancing past the end stays exhausted.
        iter.advance();
        assert!(iter.is_exhausted());
        assert_eq!(iter.remaining(), 0);
    }
}
