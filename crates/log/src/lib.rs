//! Recording directory access.
//!
//! A recording directory holds exactly two artifacts:
//! ```text
//! state.tlog   - binary event log, a CBOR-encoded batch of entries
//! world.yaml   - declarative world description consumed by simlog-world
//! ```
//!
//! # Invariants
//! - Entries are exposed in stored order; the reader never reorders.
//! - Iteration is forward-only and single-pass. Replaying from the start
//!   requires reopening the directory.
//! - All file I/O happens at open time; iteration is pure cursor movement.

mod entry;
mod store;
mod writer;

pub use entry::LogEntry;
pub use store::{LogError, LogHandle, LogIterator, EVENT_LOG_FILE, WORLD_FILE};
pub use writer::LogWriter;
