//! The playback state machine.

use std::path::Path;
use std::time::Duration;

use simlog_common::{EntityId, UpdateInfo};
use simlog_ecs::ComponentStore;
use simlog_log::{LogError, LogHandle, LogIterator};
use simlog_world::{instantiate, EventSink, WorldDescription, WorldError};

use crate::apply::{apply_pose_batch, apply_snapshot};
use crate::msg::{decode, DecodedMessage};

/// Configuration failures. Fatal to the session: the controller stays
/// [`PlaybackState::Unconfigured`] and every later tick is a no-op.
#[derive(Debug, thiserror::Error)]
pub enum ConfigureError {
    #[error(transparent)]
    Log(#[from] LogError),
    #[error(transparent)]
    World(#[from] WorldError),
    #[error("event log contains no entries")]
    EmptyLog,
    #[error("controller is already configured")]
    AlreadyConfigured,
}

/// Controller lifecycle. `Finished` is terminal: replaying again requires a
/// fresh controller over a reopened recording.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Unconfigured,
    Ready,
    Playing,
    Finished,
}

/// Mutable per-session state, created at configure time and owned
/// exclusively by the controller for the whole replay.
struct PlaybackSession {
    iter: LogIterator,
    last_applied: Option<Duration>,
    reported_end: bool,
}

/// Drives decode + apply for exactly one due log entry per host tick,
/// gated by the externally supplied simulation clock.
pub struct PlaybackController {
    state: PlaybackState,
    session: Option<PlaybackSession>,
}

impl Default for PlaybackController {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackController {
    pub fn new() -> Self {
        Self {
            state: PlaybackState::Unconfigured,
            session: None,
        }
    }

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    /// Entries not yet applied, including the one under the cursor.
    pub fn remaining_entries(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.iter.remaining())
    }

    /// Open the recording, bootstrap the world into `store`, and arm the
    /// iterator. On success the controller is `Ready`.
    ///
    /// Failures are logged here, once, and leave the controller
    /// `Unconfigured`; ticking an unconfigured controller is a silent no-op.
    pub fn configure(
        &mut self,
        log_dir: impl AsRef<Path>,
        world_entity: EntityId,
        store: &mut ComponentStore,
        sink: &mut impl EventSink,
    ) -> Result<(), ConfigureError> {
        if self.state != PlaybackState::Unconfigured {
            return Err(ConfigureError::AlreadyConfigured);
        }
        match self.try_configure(log_dir.as_ref(), world_entity, store, sink) {
            Ok(session) => {
                self.state = PlaybackState::Ready;
                self.session = Some(session);
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, "playback configuration failed, nothing to play");
                Err(err)
            }
        }
    }

    fn try_configure(
        &mut self,
        log_dir: &Path,
        world_entity: EntityId,
        store: &mut ComponentStore,
        sink: &mut impl EventSink,
    ) -> Result<PlaybackSession, ConfigureError> {
        let handle = LogHandle::open(log_dir)?;
        if handle.entry_count() == 0 {
            return Err(ConfigureError::EmptyLog);
        }

        // All validation happens before instantiate so a failed configure
        // leaves the store untouched.
        let world = WorldDescription::load(handle.world_path())?
            .into_primary()?
            .sanitize();
        instantiate(&world, store, world_entity, sink);

        tracing::info!(entries = handle.entry_count(), "playback configured");

        Ok(PlaybackSession {
            iter: handle.query_all(),
            last_applied: None,
            reported_end: false,
        })
    }

    /// One cooperative tick.
    ///
    /// In order: a paused clock suspends everything; an exhausted iterator
    /// finishes the session (completion notice exactly once); an entry whose
    /// timestamp the clock has not reached waits; otherwise exactly one
    /// entry is decoded, applied, and stepped past. Entries the clock has
    /// overshot are still applied one per tick, never batched.
    pub fn tick(&mut self, info: &UpdateInfo, store: &mut ComponentStore) {
        let Some(session) = self.session.as_mut() else {
            return; // Unconfigured: failure already logged at configure time
        };

        if info.paused {
            return;
        }

        if self.state == PlaybackState::Finished {
            return;
        }

        if session.iter.is_exhausted() {
            self.state = PlaybackState::Finished;
            if !session.reported_end {
                tracing::info!("finished playing all recorded data");
                session.reported_end = true;
            }
            return;
        }

        let (timestamp, decoded) = {
            let Some(entry) = session.iter.current() else {
                return;
            };
            if entry.timestamp > info.sim_time {
                return; // not due yet, wait for the clock
            }
            (entry.timestamp, decode(&entry.type_tag, &entry.payload))
        };

        self.state = PlaybackState::Playing;

        if let Some(last) = session.last_applied {
            if timestamp < last {
                tracing::warn!(
                    entry_secs = timestamp.as_secs_f64(),
                    previous_secs = last.as_secs_f64(),
                    "log entry is out of timestamp order, applying anyway"
                );
            }
        }

        match decoded {
            Ok(DecodedMessage::PoseBatch(updates)) => {
                let patched = apply_pose_batch(store, &updates);
                tracing::debug!(
                    secs = timestamp.as_secs_f64(),
                    patched,
                    "applied pose batch"
                );
            }
            Ok(DecodedMessage::Snapshot(state)) => {
                if let Err(err) = apply_snapshot(store, *state) {
                    tracing::warn!(error = %err, "snapshot apply failed, continuing");
                } else {
                    tracing::debug!(secs = timestamp.as_secs_f64(), "applied state snapshot");
                }
            }
            Ok(DecodedMessage::Unsupported(tag)) => {
                tracing::warn!(tag = %tag, "trying to play back unsupported message type");
            }
            Err(err) => {
                tracing::warn!(error = %err, "skipping undecodable log entry");
            }
        }

        session.last_applied = Some(timestamp);
        session.iter.advance();
    }
}
