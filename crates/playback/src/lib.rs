//! Time-synchronized replay of a recorded event log against the component
//! store.
//!
//! The controller is driven cooperatively by the host's per-step update
//! call. Each tick it applies at most one log entry whose timestamp has
//! been reached by the externally supplied simulation clock.
//!
//! # Invariants
//! - At most one entry is applied per tick.
//! - An entry is never applied before the clock reaches its timestamp.
//! - A paused clock freezes the session completely.
//! - Configuration failures leave the controller inert; decode and apply
//!   failures skip the entry and continue.

mod apply;
mod controller;
mod msg;

pub use apply::{apply_pose_batch, apply_snapshot};
pub use controller::{ConfigureError, PlaybackController, PlaybackState};
pub use msg::{decode, DecodeError, DecodedMessage, PoseUpdate, POSE_BATCH_TAG, STATE_SNAPSHOT_TAG};
