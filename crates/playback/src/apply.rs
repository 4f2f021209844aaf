//! Applying decoded messages to the component store.

use std::collections::BTreeMap;

use simlog_common::{EntityId, Pose};
use simlog_ecs::{ComponentStore, StateError, StoreState};

/// Patch pose components in place from a decoded batch.
///
/// Walks the entities currently holding a pose component and overwrites
/// those the batch names. Never inserts or removes components; batch
/// entries for entities the store does not know are silently ignored (the
/// store is the source of truth for which entities exist). Returns the
/// number of poses patched.
pub fn apply_pose_batch(store: &mut ComponentStore, updates: &BTreeMap<EntityId, Pose>) -> usize {
    let holders: Vec<EntityId> = store.poses().keys().copied().collect();
    let mut patched = 0;
    for entity in holders {
        if let Some(pose) = updates.get(&entity) {
            store.update_pose(entity, *pose);
            patched += 1;
        }
    }
    tracing::trace!(patched, batch = updates.len(), "pose batch applied");
    patched
}

/// Replace the store's entire observable state from a snapshot.
///
/// The only playback operation allowed to add or remove entities and
/// components. A structurally invalid snapshot surfaces the store's error;
/// the caller logs it and continues positioned past the entry.
pub fn apply_snapshot(store: &mut ComponentStore, state: StoreState) -> Result<(), StateError> {
    store.set_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Quat, Vec3};

    fn pose_at(x: f32) -> Pose {
        Pose::new(Vec3::new(x, 0.0, 0.0), Quat::IDENTITY)
    }

    #[test]
    fn pose_batch_updates_only_known_holders() {
        let mut store = ComponentStore::new();
        let a = store.spawn();
        let b = store.spawn();
        store.set_pose(a, pose_at(0.0));
        // b exists but holds no pose component.
        store.set_name(b, "poseless");

        let mut updates = BTreeMap::new();
        updates.insert(a, pose_at(1.0));
        updates.insert(b, pose_at(2.0));
        updates.insert(EntityId(999), pose_at(3.0));

        let patched = apply_pose_batch(&mut store, &updates);
        assert_eq!(patched, 1);
        assert_eq!(store.get_pose(a).unwrap().position.x, 1.0);
        assert!(store.get_pose(b).is_none());
        assert!(store.get_pose(EntityId(999)).is_none());
    }

    #[test]
    fn pose_batch_leaves_unnamed_entities_alone() {
        let mut store = ComponentStore::new();
        let a = store.spawn();
        store.set_pose(a, pose_at(5.0));

        let updates = BTreeMap::new();
        let patched = apply_pose_batch(&mut store, &updates);
        assert_eq!(patched, 0);
        assert_eq!(store.get_pose(a).unwrap().position.x, 5.0);
    }

    #[test]
    fn snapshot_apply_is_idempotent() {
        let mut store = ComponentStore::new();
        let a = store.spawn();
        store.set_pose(a, pose_at(1.0));
        store.set_name(a, "box");

        let state = store.state();
        apply_snapshot(&mut store, state.clone()).unwrap();
        let once = store.state();
        apply_snapshot(&mut store, state).unwrap();
        assert_eq!(store.state(), once);
    }

    #[test]
    fn invalid_snapshot_surfaces_store_error() {
        let mut store = ComponentStore::new();
        let mut state = StoreState::default();
        state.parents.insert(EntityId(2), EntityId(50));
        state.names.insert(EntityId(2), simlog_ecs::Name("child".into()));

        let err = apply_snapshot(&mut store, state).unwrap_err();
        assert!(matches!(err, StateError::DanglingParent { .. }));
    }
}
