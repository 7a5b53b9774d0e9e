use approx::assert_relative_eq;

use super::{still_scene, RecordingHost};
use crate::config::SceneConfig;
use crate::ecs::components::{RigidBodyDesc, TransformComponent};
use crate::ecs::ComponentKind;
use crate::foundation::math::{Quat, Vec3};
use crate::physics::ShapeDesc;
use crate::scene::Scene;

const DT: f32 = 1.0 / 60.0;

fn sphere(scene: &mut Scene, name: &str, position: Vec3) -> crate::ecs::Entity {
    let entity = scene.create_entity_at(name, TransformComponent::from_position(position));
    scene
        .attach_rigid_body(entity, RigidBodyDesc::dynamic(ShapeDesc::Sphere { radius: 0.5 }, 1.0))
        .unwrap();
    entity
}

#[test]
fn overlapping_bodies_each_get_one_event() {
    let mut scene = still_scene();
    let host = RecordingHost::default();
    scene.set_script_host(Box::new(host.clone()));
    let a = sphere(&mut scene, "A", Vec3::zeros());
    let b = sphere(&mut scene, "B", Vec3::new(0.8, 0.0, 0.0));

    let events = scene.step_physics(DT);
    assert_eq!(events.len(), 2);

    let to_a: Vec<_> = events.iter().filter(|e| e.entity == a).collect();
    let to_b: Vec<_> = events.iter().filter(|e| e.entity == b).collect();
    assert_eq!(to_a.len(), 1);
    assert_eq!(to_b.len(), 1);
    assert_eq!(to_a[0].other, b);
    assert_eq!(to_b[0].other, a);
    assert_eq!(to_a[0].position_a, to_b[0].position_a);
    assert_eq!(to_a[0].position_b, to_b[0].position_b);
    // Same normal for both parties
    assert_eq!(to_a[0].normal, to_b[0].normal);

    assert_eq!(host.log.borrow().collisions, events);
}

#[test]
fn separated_bodies_produce_no_events() {
    let mut scene = still_scene();
    sphere(&mut scene, "A", Vec3::zeros());
    sphere(&mut scene, "B", Vec3::new(3.0, 0.0, 0.0));
    assert!(scene.step_physics(DT).is_empty());
}

#[test]
fn rotated_boxes_that_do_not_touch_produce_no_events() {
    let mut scene = still_scene();
    let diamond = scene.create_entity_at(
        "Diamond",
        TransformComponent::from_transform(
            Vec3::zeros(),
            Quat::from_axis_angle(&Vec3::z_axis(), std::f32::consts::FRAC_PI_4),
            Vec3::new(1.0, 1.0, 1.0),
        ),
    );
    let cube = scene.create_entity_at("Cube", TransformComponent::from_position(Vec3::new(1.1, 1.1, 0.0)));
    for entity in [diamond, cube] {
        scene
            .attach_rigid_body(entity, RigidBodyDesc::dynamic(ShapeDesc::default_box(), 1.0))
            .unwrap();
    }
    assert!(scene.step_physics(DT).is_empty());
}

#[test]
fn bodies_with_identical_shapes_share_one_shape() {
    let mut scene = still_scene();
    let a = sphere(&mut scene, "A", Vec3::zeros());
    sphere(&mut scene, "B", Vec3::new(5.0, 0.0, 0.0));
    assert_eq!(scene.physics().shapes().len(), 1);

    let shape = scene.physics().shapes().find(&ShapeDesc::Sphere { radius: 0.5 }).unwrap();
    assert_eq!(scene.physics().shapes().refs(shape), Some(2));

    scene.remove(a);
    scene.update();
    assert_eq!(scene.physics().shapes().len(), 1);
    assert_eq!(scene.physics().shapes().refs(shape), Some(1));
}

#[test]
fn collision_handlers_can_remove_the_entity_they_are_called_for() {
    let mut scene = still_scene();
    scene.set_script_host(Box::new(RecordingHost::default()));
    let player = sphere(&mut scene, "Player", Vec3::zeros());
    let pickup = sphere(&mut scene, "Pickup", Vec3::new(0.9, 0.0, 0.0));
    scene.world_mut().set_tag(pickup, "pickup");

    let report = scene.tick(DT);
    assert_eq!(report.collisions.len(), 2);
    assert_eq!(report.removed, 1);
    assert!(!scene.world().is_alive(pickup));
    assert!(scene.world().is_alive(player));
    assert_eq!(scene.physics().body_count(), 1);
    scene.world().validate().unwrap();

    // The next step runs against the surviving body only
    assert!(scene.tick(DT).collisions.is_empty());
}

#[test]
fn simulation_results_flow_back_into_transforms() {
    let mut scene = Scene::new(SceneConfig::default());
    let falling = sphere(&mut scene, "Falling", Vec3::new(0.0, 10.0, 0.0));

    for _ in 0..30 {
        scene.tick(DT);
    }

    let y = scene.transform(falling).unwrap().position().y;
    assert!(y < 10.0);
    let body = scene.body_of(falling).unwrap();
    let pose = scene.physics().body_transform(body).unwrap();
    assert_relative_eq!(pose.translation.vector.y, y, epsilon = 1e-5);
    assert!(scene.linear_velocity(falling).unwrap().y < 0.0);
}

#[test]
fn gameplay_moves_teleport_the_body() {
    let mut scene = still_scene();
    let entity = sphere(&mut scene, "Crate", Vec3::zeros());
    scene.set_position(entity, Vec3::new(0.0, 4.0, 0.0));

    let body = scene.body_of(entity).unwrap();
    let pose = scene.physics().body_transform(body).unwrap();
    assert_relative_eq!(pose.translation.vector, Vec3::new(0.0, 4.0, 0.0));
    assert!(scene.physics().is_active(body));
}

#[test]
fn impulses_reach_bodies_through_entities() {
    let mut scene = still_scene();
    let entity = sphere(&mut scene, "Ball", Vec3::zeros());
    let bare = scene.create_entity("Bare");

    assert!(scene.apply_impulse(entity, Vec3::new(2.0, 0.0, 0.0)));
    assert!(!scene.apply_impulse(bare, Vec3::x()));
    scene.tick(DT);

    assert_relative_eq!(scene.linear_velocity(entity).unwrap().x, 2.0, epsilon = 1e-4);
    assert!(scene.transform(entity).unwrap().position().x > 0.0);
}

#[test]
fn kinematic_bodies_follow_their_transform() {
    let mut scene = still_scene();
    let platform = scene.create_entity("Platform");
    scene
        .attach_rigid_body(platform, RigidBodyDesc::dynamic(ShapeDesc::default_box(), 5.0).kinematic())
        .unwrap();

    scene.set_position(platform, Vec3::new(2.0, 0.0, 0.0));
    scene.tick(DT);

    let body = scene.body_of(platform).unwrap();
    let pose = scene.physics().body_transform(body).unwrap();
    assert_relative_eq!(pose.translation.vector, Vec3::new(2.0, 0.0, 0.0), epsilon = 1e-5);
    assert!(scene.world().has(platform, ComponentKind::RigidBody));
}
