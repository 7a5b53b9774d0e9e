use approx::assert_relative_eq;

use super::{still_scene, RecordingHost};
use crate::ecs::components::{LightComponent, Space, TransformComponent};
use crate::ecs::ComponentKind;
use crate::foundation::math::Vec3;

#[test]
fn translate_in_world_space_moves_position_and_matrix() {
    let mut scene = still_scene();
    let entity = scene.create_entity_at("Box", TransformComponent::from_position(Vec3::new(5.0, 0.0, -5.0)));

    assert!(scene.translate(entity, Vec3::new(1.0, 0.0, 0.0), Space::World));

    let transform = scene.transform(entity).unwrap();
    assert_relative_eq!(transform.position(), Vec3::new(6.0, 0.0, -5.0));
    assert_relative_eq!(transform.matrix_translation(), Vec3::new(6.0, 0.0, -5.0));
}

#[test]
fn marking_twice_removes_once() {
    let mut scene = still_scene();
    let entity = scene.create_entity("Box");
    let other = scene.create_entity("Other");

    assert!(scene.remove(entity));
    assert!(!scene.remove(entity));
    assert_eq!(scene.update(), 1);
    assert_eq!(scene.update(), 0);

    assert!(!scene.world().is_alive(entity));
    assert!(scene.world().is_alive(other));
    scene.world().validate().unwrap();
}

#[test]
fn reattach_after_remove_reuses_the_slot() {
    let mut scene = still_scene();
    let entity = scene.create_entity("Lamp");
    let slot = scene.attach_light(entity, LightComponent::default()).unwrap();

    scene.remove_component(entity, ComponentKind::Light).unwrap();
    assert!(scene.world().get::<LightComponent>(entity).is_none());
    assert!(scene.remove_component(entity, ComponentKind::Light).is_err());

    let again = scene.attach_light(entity, LightComponent::default()).unwrap();
    assert_eq!(again, slot);
}

#[test]
fn stale_handles_do_not_alias_reused_slots() {
    let mut scene = still_scene();
    let old = scene.create_entity("Old");
    scene.remove(old);
    scene.update();

    let new = scene.create_entity("New");
    assert_eq!(new.index(), old.index());
    assert_ne!(new, old);
    assert!(scene.transform(old).is_none());
    assert!(!scene.set_position(old, Vec3::x()));
    assert!(!scene.remove(old));
    assert_eq!(scene.world().name(new), Some("New"));
}

#[test]
fn script_host_sees_creation_updates_and_teardown() {
    let mut scene = still_scene();
    let existing = scene.create_entity("Existing");
    let host = RecordingHost::default();
    scene.set_script_host(Box::new(host.clone()));

    let spawned = scene.create_entity("Spawned");
    scene.remove(existing);
    let report = scene.tick(1.0 / 60.0);
    assert_eq!(report.removed, 1);

    let log = host.log.borrow();
    assert_eq!(
        log.registered,
        vec![(existing, "Existing".to_string()), (spawned, "Spawned".to_string())]
    );
    assert_eq!(log.updates, 1);
    assert_eq!(log.unregistered, vec![existing]);
}
