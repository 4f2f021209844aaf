//! Instantiating a world description into the component store.

use simlog_common::EntityId;
use simlog_ecs::{ComponentStore, Light};

use crate::description::World;
use crate::events::{EventSink, HostEvent};

/// Create one entity per declared model and per declared light, parented
/// under `world_entity`, then notify the host that plugins may be loaded.
///
/// Called exactly once per session, before any log entry is applied. The
/// entities created here are the ones later pose updates patch: ids are
/// assigned in declaration order, matching the recorder's numbering.
pub fn instantiate(
    world: &World,
    store: &mut ComponentStore,
    world_entity: EntityId,
    sink: &mut impl EventSink,
) {
    let _span = tracing::info_span!("instantiate_world", world = %world.name).entered();

    // The world entity itself carries the declared name, so snapshots that
    // parent under it stay internally consistent.
    store.set_name(world_entity, world.name.clone());

    for model in &world.models {
        let entity = store.spawn();
        store.set_name(entity, model.name.clone());
        store.set_pose(entity, model.pose);
        store.set_parent(entity, world_entity);
        tracing::debug!(?entity, model = %model.name, "created model entity");
    }

    for light in &world.lights {
        let entity = store.spawn();
        store.set_name(entity, light.name.clone());
        store.set_pose(entity, light.pose);
        store.set_light(
            entity,
            Light {
                kind: light.kind,
                intensity: light.intensity,
            },
        );
        store.set_parent(entity, world_entity);
        tracing::debug!(?entity, light = %light.name, "created light entity");
    }

    tracing::info!(
        models = world.models.len(),
        lights = world.lights.len(),
        "world bootstrapped"
    );

    sink.emit(HostEvent::LoadPlugins {
        world_entity,
        world: world.clone(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::description::WorldDescription;
    use crate::events::EventQueue;
    use simlog_ecs::LightKind;

    const DOC: &str = r#"
worlds:
  - name: arena
    models:
      - name: box
      - name: sphere
    lights:
      - name: sun
        kind: directional
    plugins:
      - name: custom::systems::Teleporter
"#;

    #[test]
    fn creates_entities_in_declaration_order() {
        let world = WorldDescription::from_yaml(DOC)
            .unwrap()
            .into_primary()
            .unwrap()
            .sanitize();

        let mut store = ComponentStore::new();
        let world_entity = store.spawn();
        let mut queue = EventQueue::new();
        instantiate(&world, &mut store, world_entity, &mut queue);

        // world entity = 1, then box = 2, sphere = 3, sun = 4.
        assert_eq!(store.get_name(EntityId(2)).unwrap().0, "box");
        assert_eq!(store.get_name(EntityId(3)).unwrap().0, "sphere");
        assert_eq!(store.get_name(EntityId(4)).unwrap().0, "sun");
        assert_eq!(store.get_light(EntityId(4)).unwrap().kind, LightKind::Directional);

        for id in [2, 3, 4] {
            assert_eq!(store.get_parent(EntityId(id)), Some(world_entity));
            assert!(store.get_pose(EntityId(id)).is_some());
        }
        // Models hold no light component.
        assert!(store.get_light(EntityId(2)).is_none());
    }

    #[test]
    fn emits_load_plugins_once_with_sanitized_world() {
        let world = WorldDescription::from_yaml(DOC)
            .unwrap()
            .into_primary()
            .unwrap()
            .sanitize();

        let mut store = ComponentStore::new();
        let world_entity = store.spawn();
        let mut queue = EventQueue::new();
        instantiate(&world, &mut store, world_entity, &mut queue);

        let events = queue.drain_events();
        assert_eq!(events.len(), 1);
        let HostEvent::LoadPlugins {
            world_entity: emitted,
            world: carried,
        } = &events[0];
        assert_eq!(*emitted, world_entity);
        assert_eq!(carried.plugins.len(), 1);
        assert_eq!(carried.plugins[0].name, "custom::systems::Teleporter");
    }
}
