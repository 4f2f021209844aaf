//! Message decoding: type tag + raw bytes into a closed sum type.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use simlog_common::{EntityId, Pose};
use simlog_ecs::StoreState;

/// Tag of a sparse pose-batch message. Payload: CBOR `Vec<PoseUpdate>`.
pub const POSE_BATCH_TAG: &str = "simlog.msgs.PoseBatch";
/// Tag of a full-state snapshot message. Payload: CBOR [`StoreState`].
pub const STATE_SNAPSHOT_TAG: &str = "simlog.msgs.StateSnapshot";

/// One recorded pose for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PoseUpdate {
    pub entity: EntityId,
    pub pose: Pose,
}

/// A decoded log message.
///
/// Closed over the two recognized shapes; anything else lands in
/// `Unsupported` carrying the original tag for logging. `Unsupported` is
/// not an error: the caller warns and skips the entry.
#[derive(Debug, Clone, PartialEq)]
pub enum DecodedMessage {
    /// Sparse partial update, keyed by entity. Duplicate ids within one
    /// payload collapse to the last occurrence.
    PoseBatch(BTreeMap<EntityId, Pose>),
    /// Full serialized component-store state.
    Snapshot(Box<StoreState>),
    /// Unrecognized type tag.
    Unsupported(String),
}

/// Corrupt payload under a recognized tag. Recoverable: the entry is
/// skipped and playback continues.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("corrupt {tag} payload: {detail}")]
    Payload { tag: String, detail: String },
}

/// Decode a log entry's payload according to its type tag.
pub fn decode(tag: &str, payload: &[u8]) -> Result<DecodedMessage, DecodeError> {
    match tag {
        POSE_BATCH_TAG => {
            let updates: Vec<PoseUpdate> = decode_cbor(tag, payload)?;
            // Last write wins for duplicate entity ids in one batch.
            let mut by_entity = BTreeMap::new();
            for update in updates {
                by_entity.insert(update.entity, update.pose);
            }
            Ok(DecodedMessage::PoseBatch(by_entity))
        }
        STATE_SNAPSHOT_TAG => {
            let state: StoreState = decode_cbor(tag, payload)?;
            Ok(DecodedMessage::Snapshot(Box::new(state)))
        }
        other => Ok(DecodedMessage::Unsupported(other.to_string())),
    }
}

fn decode_cbor<T: for<'de> Deserialize<'de>>(tag: &str, payload: &[u8]) -> Result<T, DecodeError> {
    ciborium::from_reader(payload).map_err(|e| DecodeError::Payload {
        tag: tag.to_string(),
        detail: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn encode<T: Serialize>(value: &T) -> Vec<u8> {
        let mut buf = Vec::new();
        ciborium::into_writer(value, &mut buf).unwrap();
        buf
    }

    fn pose_at(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn pose_batch_last_write_wins() {
        let updates = vec![
            PoseUpdate {
                entity: EntityId(5),
                pose: pose_at(1.0),
            },
            PoseUpdate {
                entity: EntityId(7),
                pose: pose_at(2.0),
            },
            PoseUpdate {
                entity: EntityId(5),
                pose: pose_at(3.0),
            },
        ];
        let msg = decode(POSE_BATCH_TAG, &encode(&updates)).unwrap();
        let DecodedMessage::PoseBatch(map) = msg else {
            panic!("expected pose batch");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map[&EntityId(5)].position.x, 3.0);
        assert_eq!(map[&EntityId(7)].position.x, 2.0);
    }

    #[test]
    fn snapshot_payload_decodes() {
        let mut state = StoreState::default();
        state.poses.insert(EntityId(1), pose_at(4.0));
        let msg = decode(STATE_SNAPSHOT_TAG, &encode(&state)).unwrap();
        assert_eq!(msg, DecodedMessage::Snapshot(Box::new(state)));
    }

    #[test]
    fn unknown_tag_is_not_an_error() {
        let msg = decode("simlog.msgs.Contact", &[0xff]).unwrap();
        assert_eq!(
            msg,
            DecodedMessage::Unsupported("simlog.msgs.Contact".to_string())
        );
    }

    #[test]
    fn corrupt_payload_is_a_decode_error() {
        let err = decode(POSE_BATCH_TAG, b"garbage").unwrap_err();
        let DecodeError::Payload { tag, .. } = err;
        assert_eq!(tag, POSE_BATCH_TAG);
    }
}
