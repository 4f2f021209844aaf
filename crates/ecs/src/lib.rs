//! Minimal deterministic component store.
//!
//! Components are stored in BTreeMap for deterministic iteration order.
//! Each component type has its own storage keyed by EntityId.
//!
//! # Invariants
//! - Iteration order is deterministic (BTreeMap).
//! - Entity ids are allocated sequentially starting at 1 and never reused.
//! - `update_pose` only overwrites an existing pose component; it never
//!   inserts one. Snapshot replacement is the only bulk mutation.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use simlog_common::{EntityId, Pose};

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// Light component attached to light entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Light {
    pub kind: LightKind,
    pub intensity: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LightKind {
    Point,
    Directional,
    Spot,
}

impl Default for Light {
    fn default() -> Self {
        Self {
            kind: LightKind::Point,
            intensity: 1.0,
        }
    }
}

/// Errors from bulk state replacement.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("parent link {child:?} -> {parent:?} references an entity with no components")]
    DanglingParent { child: EntityId, parent: EntityId },
}

/// Full observable state of a [`ComponentStore`].
///
/// This is the wire shape of a state snapshot: a snapshot payload in the
/// event log is exactly a serialized `StoreState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreState {
    pub next_id: u64,
    pub poses: BTreeMap<EntityId, Pose>,
    pub names: BTreeMap<EntityId, Name>,
    pub lights: BTreeMap<EntityId, Light>,
    pub parents: BTreeMap<EntityId, EntityId>,
}

impl StoreState {
    /// Every entity that holds at least one component.
    fn known_entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.poses
            .keys()
            .chain(self.names.keys())
            .chain(self.lights.keys())
            .chain(self.parents.keys())
            .copied()
    }
}

/// Deterministic component storage for all component types.
///
/// Uses BTreeMap for canonical iteration order. The store is the source of
/// truth for which entities exist: an entity exists exactly while it holds
/// at least one component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStore {
    next_id: u64,
    poses: BTreeMap<EntityId, Pose>,
    names: BTreeMap<EntityId, Name>,
    lights: BTreeMap<EntityId, Light>,
    parents: BTreeMap<EntityId, EntityId>,
}

impl Default for ComponentStore {
    fn default() -> Self {
        Self {
            next_id: 1,
            poses: BTreeMap::new(),
            names: BTreeMap::new(),
            lights: BTreeMap::new(),
            parents: BTreeMap::new(),
        }
    }
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a fresh entity id. Ids are sequential and never reused.
    pub fn spawn(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        id
    }

    /// Number of entities holding at least one component.
    pub fn entity_count(&self) -> usize {
        let mut ids: Vec<EntityId> = self.poses.keys().copied().collect();
        ids.extend(self.names.keys());
        ids.extend(self.lights.keys());
        ids.extend(self.parents.keys());
        ids.sort_unstable();
        ids.dedup();
        ids.len()
    }

    // --- Pose ---
    pub fn set_pose(&mut self, entity: EntityId, pose: Pose) {
        self.poses.insert(entity, pose);
    }

    /// Overwrite an existing pose component. Returns false (and writes
    /// nothing) if the entity does not already hold one.
    pub fn update_pose(&mut self, entity: EntityId, pose: Pose) -> bool {
        match self.poses.get_mut(&entity) {
            Some(existing) => {
                *existing = pose;
                true
            }
            None => false,
        }
    }

    pub fn get_pose(&self, entity: EntityId) -> Option<&Pose> {
        self.poses.get(&entity)
    }

    pub fn poses(&self) -> &BTreeMap<EntityId, Pose> {
        &self.poses
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        self.names.insert(entity, Name(name.into()));
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    pub fn names(&self) -> &BTreeMap<EntityId, Name> {
        &self.names
    }

    // --- Light ---
    pub fn set_light(&mut self, entity: EntityId, light: Light) {
        self.lights.insert(entity, light);
    }

    pub fn get_light(&self, entity: EntityId) -> Option<&Light> {
        self.lights.get(&entity)
    }

    pub fn lights(&self) -> &BTreeMap<EntityId, Light> {
        &self.lights
    }

    // --- Parent ---
    pub fn set_parent(&mut self, entity: EntityId, parent: EntityId) {
        self.parents.insert(entity, parent);
    }

    pub fn get_parent(&self, entity: EntityId) -> Option<EntityId> {
        self.parents.get(&entity).copied()
    }

    /// Capture the full observable state.
    pub fn state(&self) -> StoreState {
        StoreState {
            next_id: self.next_id,
            poses: self.poses.clone(),
            names: self.names.clone(),
            lights: self.lights.clone(),
            parents: self.parents.clone(),
        }
    }

    /// Replace the full observable state.
    ///
    /// The only operation that may add or remove entities and components
    /// during playback. Parent links must reference entities that hold at
    /// least one component in the incoming state.
    pub fn set_state(&mut self, state: StoreState) -> Result<(), StateError> {
        for (&child, &parent) in &state.parents {
            let mut known = state.known_entities();
            if !known.any(|id| id == parent) {
                return Err(StateError::DanglingParent { child, parent });
            }
        }

        // Never move the id cursor backwards: entities created after a
        // snapshot was taken must not collide with snapshot ids.
        let max_id = state.known_entities().map(|id| id.0).max().unwrap_or(0);
        let next_id = state.next_id.max(max_id + 1).max(self.next_id);

        tracing::debug!(
            entities = state.poses.len(),
            next_id,
            "replacing component store state"
        );

        self.poses = state.poses;
        self.names = state.names;
        self.lights = state.lights;
        self.parents = state.parents;
        self.next_id = next_id;
        Ok(())
    }
}
