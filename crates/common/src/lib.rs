//! Shared types for the simlog playback engine.
//!
//! # Invariants
//! - `EntityId` ordering is total and stable (BTreeMap-friendly).
//! - Entity ids are store-assigned and sequential, so a recording and a
//!   playback run that instantiate the same world description agree on ids.

pub mod types;

pub use types::{EntityId, Pose, UpdateInfo};
