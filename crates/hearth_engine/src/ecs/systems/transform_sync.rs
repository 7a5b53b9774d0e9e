//! Transform propagation
//!
//! After a transform changes, dependents are refreshed: the entity's camera
//! view is rebuilt, and unless the change came from the physics step itself
//! the new pose is pushed into the rigid body and the body is woken.

use crate::ecs::components::{CameraComponent, RigidBodyComponent, TransformComponent};
use crate::ecs::{ComponentKind, Entity, World};
use crate::foundation::math::{isometry, Iso3};
use crate::physics::{MotionStateSync, PhysicsBridge};

/// Where a transform change came from
pub enum SyncOrigin<'a> {
    /// Gameplay or script code; the change is pushed into the physics body
    Gameplay(&'a mut PhysicsBridge),
    /// The physics write path; the body already has this pose
    Physics,
}

/// Refresh everything that depends on `entity`'s transform
pub fn propagate(world: &mut World, entity: Entity, origin: SyncOrigin<'_>) {
    let Some(record) = world.registry.get(entity) else {
        log::warn!("propagate: invalid entity {entity}");
        return;
    };
    let Some(transform) = record
        .slot(ComponentKind::Transform)
        .and_then(|slot| world.transforms.get(slot))
    else {
        log::warn!("propagate: entity {entity} has no transform");
        return;
    };

    if let Some(camera) = record
        .slot(ComponentKind::Camera)
        .and_then(|slot| world.cameras.get_mut(slot))
    {
        camera.update_view(transform);
    }

    if let SyncOrigin::Gameplay(physics) = origin {
        if let Some(body) = world.get::<RigidBodyComponent>(entity) {
            let pose = isometry(&transform.position(), &transform.rotation());
            physics.push_transform(body.body(), &pose);
        }
    }
}

/// Apply `edit` to the entity's transform, then propagate.
///
/// Returns `None` without calling `edit` if the entity or its transform is gone.
pub fn update_transform<R>(
    world: &mut World,
    entity: Entity,
    origin: SyncOrigin<'_>,
    edit: impl FnOnce(&mut TransformComponent) -> R,
) -> Option<R> {
    let Some(transform) = world.component_mut::<TransformComponent>(entity) else {
        log::warn!("update_transform: entity {entity} has no transform");
        return None;
    };
    let result = edit(transform);
    propagate(world, entity, origin);
    Some(result)
}

/// Motion-state callbacks backed by the world's transform store
pub struct WorldMotionState<'w> {
    world: &'w mut World,
}

impl<'w> WorldMotionState<'w> {
    /// Wrap a world for the duration of a physics step
    pub fn new(world: &'w mut World) -> Self {
        Self { world }
    }
}

impl MotionStateSync for WorldMotionState<'_> {
    fn get_world_transform(&self, owner: Entity) -> Option<Iso3> {
        match self.world.get::<TransformComponent>(owner) {
            Some(transform) => Some(isometry(&transform.position(), &transform.rotation())),
            None => {
                log::warn!("motion state read: entity {owner} or its transform was removed");
                None
            }
        }
    }

    fn set_world_transform(&mut self, owner: Entity, transform: &Iso3) {
        let position = transform.translation.vector;
        let rotation = transform.rotation;
        let updated = update_transform(self.world, owner, SyncOrigin::Physics, |t| {
            t.set_position_rotation(position, rotation);
        });
        if updated.is_none() {
            log::warn!("motion state write: entity {owner} or its transform was removed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PhysicsConfig;
    use crate::ecs::components::RigidBodyDesc;
    use crate::foundation::math::{Quat, Vec3};
    use crate::physics::ShapeDesc;
    use approx::assert_relative_eq;

    fn bridge() -> PhysicsBridge {
        PhysicsBridge::new(&PhysicsConfig {
            gravity: [0.0, 0.0, 0.0],
            ..PhysicsConfig::default()
        })
    }

    fn with_body(world: &mut World, physics: &mut PhysicsBridge, position: Vec3) -> Entity {
        let entity = world.create_entity_with("body", TransformComponent::from_position(position));
        let desc = RigidBodyDesc::dynamic(ShapeDesc::Sphere { radius: 0.5 }, 1.0);
        let shape = physics.create_shape(ShapeDesc::Sphere { radius: 0.5 }).unwrap();
        let handle = physics
            .create_body(entity, Some(shape), &isometry(&position, &Quat::identity()), &desc)
            .unwrap();
        physics.release_shape(shape);
        let component = RigidBodyComponent::new(handle, ShapeDesc::Sphere { radius: 0.5 }, &desc);
        world.attach_component(entity, component).unwrap();
        entity
    }

    #[test]
    fn gameplay_changes_reach_camera_and_body() {
        let mut world = World::new();
        let mut physics = bridge();
        let entity = with_body(&mut world, &mut physics, Vec3::zeros());
        world.attach(entity, CameraComponent::default()).unwrap();

        update_transform(&mut world, entity, SyncOrigin::Gameplay(&mut physics), |t| {
            t.set_position(Vec3::new(0.0, 2.0, 5.0));
        });

        let body = world.get::<RigidBodyComponent>(entity).unwrap().body();
        let pose = physics.body_transform(body).unwrap();
        assert_relative_eq!(pose.translation.vector, Vec3::new(0.0, 2.0, 5.0));
        assert!(physics.is_active(body));

        let view = *world.get::<CameraComponent>(entity).unwrap().view();
        let eye = view.transform_point(&crate::foundation::math::Point3::new(0.0, 2.0, 5.0));
        assert_relative_eq!(eye.coords, Vec3::zeros(), epsilon = 1e-5);
    }

    #[test]
    fn physics_writes_do_not_touch_the_body() {
        let mut world = World::new();
        let mut physics = bridge();
        let entity = with_body(&mut world, &mut physics, Vec3::zeros());

        let mut motion = WorldMotionState::new(&mut world);
        motion.set_world_transform(entity, &Iso3::translation(3.0, 0.0, 0.0));

        let transform = world.get::<TransformComponent>(entity).unwrap();
        assert_relative_eq!(transform.position(), Vec3::new(3.0, 0.0, 0.0));
        assert_relative_eq!(transform.matrix_translation(), Vec3::new(3.0, 0.0, 0.0));

        let body = world.get::<RigidBodyComponent>(entity).unwrap().body();
        let pose = physics.body_transform(body).unwrap();
        assert_relative_eq!(pose.translation.vector, Vec3::zeros());
    }

    #[test]
    fn read_path_tolerates_removed_entities() {
        let mut world = World::new();
        let entity = world.create_entity("gone");
        world.destroy_entity(entity);
        let mut motion = WorldMotionState::new(&mut world);
        assert!(motion.get_world_transform(entity).is_none());
        motion.set_world_transform(entity, &Iso3::identity());
        assert_eq!(world.entity_count(), 0);
    }

    #[test]
    fn missing_transform_skips_the_edit() {
        let mut world = World::new();
        let mut physics = bridge();
        let entity = world.create_entity("e");
        world.destroy_entity(entity);
        let called = update_transform(&mut world, entity, SyncOrigin::Gameplay(&mut physics), |_| ());
        assert!(called.is_none());
    }
}
