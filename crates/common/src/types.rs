use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unique identifier for an entity in the component store.
///
/// Ids are assigned sequentially by the store starting at 1, so entities
/// created in declaration order carry the same ids the recorder saw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

/// Position + orientation attached to an entity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl Pose {
    pub fn new(position: Vec3, orientation: Quat) -> Self {
        Self {
            position,
            orientation,
        }
    }
}

impl Default for Pose {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
        }
    }
}

/// Clock input supplied by the host on every tick. Read-only to the
/// playback engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateInfo {
    pub paused: bool,
    pub sim_time: Duration,
}

impl UpdateInfo {
    pub fn running(sim_time: Duration) -> Self {
        Self {
            paused: false,
            sim_time,
        }
    }

    pub fn paused(sim_time: Duration) -> Self {
        Self {
            paused: true,
            sim_time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pose_default_is_identity() {
        let p = Pose::default();
        assert_eq!(p.position, Vec3::ZERO);
        assert_eq!(p.orientation, Quat::IDENTITY);
    }

    #[test]
    fn entity_id_orders_numerically() {
        let mut ids = vec![EntityId(7), EntityId(2), EntityId(5)];
        ids.sort();
        assert_eq!(ids, vec![EntityId(2), EntityId(5), EntityId(7)]);
    }
}
