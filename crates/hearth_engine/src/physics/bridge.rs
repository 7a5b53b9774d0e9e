//! Physics bridge
//!
//! Owns the dynamics world and the shape registry. Bodies are tagged with
//! their owning entity; stepping returns the collision events for every
//! penetrating contact point, one per participant.

use super::dynamics::{BodyDesc, BodyHandle, DynamicsWorld, MotionStateSync};
use super::events::CollisionEvent;
use super::rapier::RapierDynamicsWorld;
use super::shape::{ShapeDesc, ShapeKey, ShapeRegistry};
use super::PhysicsError;
use crate::config::PhysicsConfig;
use crate::ecs::components::RigidBodyDesc;
use crate::ecs::Entity;
use crate::foundation::math::{Iso3, Vec3};

/// Rigid-body world plus the bookkeeping the engine needs around it
pub struct PhysicsBridge {
    world: Box<dyn DynamicsWorld>,
    shapes: ShapeRegistry,
    fixed_time_step: f32,
    max_sub_steps: u32,
}

impl PhysicsBridge {
    /// Bridge over a [`RapierDynamicsWorld`]
    pub fn new(config: &PhysicsConfig) -> Self {
        Self::with_world(Box::new(RapierDynamicsWorld::new(config.gravity())), config)
    }

    /// Bridge over any dynamics world
    pub fn with_world(mut world: Box<dyn DynamicsWorld>, config: &PhysicsConfig) -> Self {
        world.set_gravity(config.gravity());
        Self {
            world,
            shapes: ShapeRegistry::new(),
            fixed_time_step: config.fixed_time_step,
            max_sub_steps: config.max_sub_steps,
        }
    }

    /// Underlying dynamics world
    pub fn world(&self) -> &dyn DynamicsWorld {
        self.world.as_ref()
    }

    /// Shape registry
    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    /// Register a shape, or reuse an identical one; the caller holds one reference
    pub fn create_shape(&mut self, desc: ShapeDesc) -> Result<ShapeKey, PhysicsError> {
        self.shapes.acquire(desc)
    }

    /// Drop a shape reference
    pub fn release_shape(&mut self, key: ShapeKey) {
        self.shapes.release(key);
    }

    /// Insert a body for `owner`.
    ///
    /// Fails on a missing or unknown shape, on a negative or non-finite mass,
    /// or on a plane backing a dynamic body. The body keeps its own reference
    /// to the shape.
    pub fn create_body(
        &mut self,
        owner: Entity,
        shape: Option<ShapeKey>,
        transform: &Iso3,
        params: &RigidBodyDesc,
    ) -> Result<BodyHandle, PhysicsError> {
        let Some(shape_key) = shape else {
            log::error!("create_body: entity {owner} has no collision shape");
            return Err(PhysicsError::MissingShape);
        };
        let Some(shape_desc) = self.shapes.get(shape_key).cloned() else {
            log::error!("create_body: unknown shape for entity {owner}");
            return Err(PhysicsError::UnknownShape);
        };
        if !params.mass.is_finite() || params.mass < 0.0 {
            log::error!("create_body: invalid mass {} for entity {owner}", params.mass);
            return Err(PhysicsError::InvalidMass(params.mass));
        }

        let mass = if params.is_kinematic { 0.0 } else { params.mass };
        if mass > 0.0 && matches!(shape_desc, ShapeDesc::Plane { .. }) {
            log::error!("create_body: plane shape on dynamic body for entity {owner}");
            return Err(PhysicsError::InvalidShape(format!("{shape_desc:?} on a dynamic body")));
        }
        self.shapes.retain(shape_key)?;
        let handle = self.world.add_body(BodyDesc {
            owner,
            shape_key,
            local_inertia: shape_desc.local_inertia(mass),
            shape: shape_desc,
            mass,
            friction: params.friction,
            restitution: params.restitution,
            is_kinematic: params.is_kinematic,
            transform: *transform,
        });
        log::debug!("created body {handle:?} for entity {owner}");
        Ok(handle)
    }

    /// Remove a body from the world, then release its shape reference
    pub fn remove_body(&mut self, body: BodyHandle) -> Result<(), PhysicsError> {
        let Some(removed) = self.world.remove_body(body) else {
            log::warn!("remove_body: unknown body {body:?}");
            return Err(PhysicsError::UnknownBody);
        };
        self.shapes.release(removed.shape_key);
        log::debug!("removed body {body:?} of entity {}", removed.owner);
        Ok(())
    }

    /// Number of bodies in the world
    pub fn body_count(&self) -> usize {
        self.world.body_count()
    }

    /// Whether the body exists
    pub fn contains(&self, body: BodyHandle) -> bool {
        self.world.contains(body)
    }

    /// Current world transform of a body
    pub fn body_transform(&self, body: BodyHandle) -> Option<Iso3> {
        self.world.world_transform(body)
    }

    /// Teleport a body to a gameplay-supplied pose and wake it
    pub fn push_transform(&mut self, body: BodyHandle, transform: &Iso3) {
        if !self.world.contains(body) {
            log::warn!("push_transform: unknown body {body:?}");
            return;
        }
        self.world.set_world_transform(body, transform);
        self.world.activate(body);
    }

    /// Wake a body
    pub fn activate(&mut self, body: BodyHandle) {
        self.world.activate(body);
    }

    /// Whether a body is awake
    pub fn is_active(&self, body: BodyHandle) -> bool {
        self.world.is_active(body)
    }

    /// Force applied during the next step
    pub fn apply_force(&mut self, body: BodyHandle, force: Vec3) {
        self.world.activate(body);
        self.world.apply_central_force(body, force);
    }

    /// Instantaneous impulse
    pub fn apply_impulse(&mut self, body: BodyHandle, impulse: Vec3) {
        self.world.activate(body);
        self.world.apply_central_impulse(body, impulse);
    }

    /// Linear velocity of a body
    pub fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3> {
        self.world.linear_velocity(body)
    }

    /// Overwrite the linear velocity
    pub fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        self.world.activate(body);
        self.world.set_linear_velocity(body, velocity);
    }

    /// Overwrite the angular velocity
    pub fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3) {
        self.world.activate(body);
        self.world.set_angular_velocity(body, velocity);
    }

    /// Gravity
    pub fn gravity(&self) -> Vec3 {
        self.world.gravity()
    }

    /// Change gravity
    pub fn set_gravity(&mut self, gravity: Vec3) {
        self.world.set_gravity(gravity);
    }

    /// Advance the simulation and collect collision events.
    ///
    /// Transforms flow through `motion` during the step. Events are only
    /// produced when at least one sub-step ran.
    pub fn step(&mut self, dt: f32, motion: &mut dyn MotionStateSync) -> Vec<CollisionEvent> {
        let sub_steps = self
            .world
            .step_simulation(dt, self.max_sub_steps, self.fixed_time_step, motion);
        if sub_steps == 0 {
            return Vec::new();
        }

        let mut events = Vec::new();
        for manifold in self.world.manifolds() {
            for point in manifold.points.iter().filter(|p| p.distance < 0.0) {
                let event = CollisionEvent {
                    entity: manifold.owner_a,
                    other: manifold.owner_b,
                    normal: point.normal_on_b,
                    position_a: point.position_on_a,
                    position_b: point.position_on_b,
                };
                events.push(event);
                events.push(CollisionEvent {
                    entity: manifold.owner_b,
                    other: manifold.owner_a,
                    ..event
                });
            }
        }
        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Translation3;
    use approx::assert_relative_eq;
    use std::collections::HashMap;

    #[derive(Default)]
    struct Poses(HashMap<Entity, Iso3>);

    impl MotionStateSync for Poses {
        fn get_world_transform(&self, owner: Entity) -> Option<Iso3> {
            self.0.get(&owner).copied()
        }

        fn set_world_transform(&mut self, owner: Entity, transform: &Iso3) {
            self.0.insert(owner, *transform);
        }
    }

    fn weightless() -> PhysicsBridge {
        PhysicsBridge::new(&PhysicsConfig {
            gravity: [0.0, 0.0, 0.0],
            ..PhysicsConfig::default()
        })
    }

    fn at(x: f32) -> Iso3 {
        Iso3::from_parts(Translation3::new(x, 0.0, 0.0), crate::foundation::math::Quat::identity())
    }

    #[test]
    fn missing_shape_is_an_error() {
        let mut physics = weightless();
        let result = physics.create_body(Entity::new(0, 0), None, &at(0.0), &RigidBodyDesc::default());
        assert_eq!(result, Err(PhysicsError::MissingShape));
        assert_eq!(physics.body_count(), 0);
    }

    #[test]
    fn negative_mass_is_rejected() {
        let mut physics = weightless();
        let shape = physics.create_shape(ShapeDesc::default_box()).unwrap();
        let desc = RigidBodyDesc {
            mass: -1.0,
            ..RigidBodyDesc::default()
        };
        let result = physics.create_body(Entity::new(0, 0), Some(shape), &at(0.0), &desc);
        assert_eq!(result, Err(PhysicsError::InvalidMass(-1.0)));
        assert_eq!(physics.shapes().refs(shape), Some(1));
    }

    #[test]
    fn bodies_hold_shape_references() {
        let mut physics = weightless();
        let shape = physics.create_shape(ShapeDesc::Sphere { radius: 1.0 }).unwrap();
        let a = physics
            .create_body(Entity::new(0, 0), Some(shape), &at(0.0), &RigidBodyDesc::default())
            .unwrap();
        let b = physics
            .create_body(Entity::new(1, 0), Some(shape), &at(5.0), &RigidBodyDesc::default())
            .unwrap();
        physics.release_shape(shape);
        assert_eq!(physics.shapes().refs(shape), Some(2));

        physics.remove_body(a).unwrap();
        assert_eq!(physics.shapes().refs(shape), Some(1));
        physics.remove_body(b).unwrap();
        assert!(physics.shapes().is_empty());
        assert_eq!(physics.remove_body(b), Err(PhysicsError::UnknownBody));
    }

    #[test]
    fn static_bodies_get_zero_inertia() {
        let mut physics = weightless();
        let shape = physics.create_shape(ShapeDesc::default_box()).unwrap();
        let body = physics
            .create_body(
                Entity::new(0, 0),
                Some(shape),
                &at(0.0),
                &RigidBodyDesc::fixed(ShapeDesc::default_box()),
            )
            .unwrap();
        assert_eq!(physics.world().local_inertia(body), Some(Vec3::zeros()));
    }

    #[test]
    fn penetrating_contact_is_delivered_to_both_bodies() {
        let mut physics = weightless();
        let shape = physics.create_shape(ShapeDesc::Sphere { radius: 1.0 }).unwrap();
        let (ea, eb) = (Entity::new(0, 0), Entity::new(1, 0));
        physics
            .create_body(ea, Some(shape), &at(1.5), &RigidBodyDesc::default())
            .unwrap();
        physics
            .create_body(eb, Some(shape), &at(0.0), &RigidBodyDesc::default())
            .unwrap();

        let events = physics.step(1.0 / 60.0, &mut Poses::default());
        assert!(!events.is_empty());
        assert_eq!(events.len() % 2, 0);
        let (first, second) = (events[0], events[1]);
        assert!(first.entity == ea || first.entity == eb);
        assert_eq!((second.entity, second.other), (first.other, first.entity));
        assert_eq!(first.normal, second.normal);
        assert_eq!(first.position_a, second.position_a);
        assert_eq!(first.position_b, second.position_b);

        // Normal points from the other body towards the reporting one
        let x = |entity: Entity| if entity == ea { 1.5 } else { 0.0 };
        assert_relative_eq!(first.normal.x.abs(), 1.0, epsilon = 1e-3);
        assert!(first.normal.x * (x(first.entity) - x(first.other)) > 0.0);
    }

    #[test]
    fn identical_shapes_share_a_key() {
        let mut physics = weightless();
        let a = physics.create_shape(ShapeDesc::Sphere { radius: 1.0 }).unwrap();
        let b = physics.create_shape(ShapeDesc::Sphere { radius: 1.0 }).unwrap();
        assert_eq!(a, b);
        assert_eq!(physics.shapes().len(), 1);
        assert_eq!(physics.shapes().refs(a), Some(2));
    }

    #[test]
    fn planes_cannot_back_dynamic_bodies() {
        let mut physics = weightless();
        let plane = ShapeDesc::Plane {
            normal: Vec3::y(),
            constant: 0.0,
        };
        let shape = physics.create_shape(plane.clone()).unwrap();
        let result = physics.create_body(
            Entity::new(0, 0),
            Some(shape),
            &at(0.0),
            &RigidBodyDesc::dynamic(plane.clone(), 1.0),
        );
        assert!(matches!(result, Err(PhysicsError::InvalidShape(_))));
        assert_eq!(physics.shapes().refs(shape), Some(1));

        physics
            .create_body(Entity::new(1, 0), Some(shape), &at(0.0), &RigidBodyDesc::fixed(plane))
            .unwrap();
        assert_eq!(physics.body_count(), 1);
    }

    #[test]
    fn no_events_without_a_sub_step() {
        let mut physics = weightless();
        let shape = physics.create_shape(ShapeDesc::Sphere { radius: 1.0 }).unwrap();
        physics
            .create_body(Entity::new(0, 0), Some(shape), &at(0.0), &RigidBodyDesc::default())
            .unwrap();
        physics
            .create_body(Entity::new(1, 0), Some(shape), &at(0.5), &RigidBodyDesc::default())
            .unwrap();
        assert!(physics.step(0.001, &mut Poses::default()).is_empty());
    }

    #[test]
    fn impulses_wake_and_move_bodies() {
        let mut physics = weightless();
        let shape = physics.create_shape(ShapeDesc::default_box()).unwrap();
        let body = physics
            .create_body(Entity::new(0, 0), Some(shape), &at(0.0), &RigidBodyDesc::dynamic(ShapeDesc::default_box(), 2.0))
            .unwrap();
        physics.apply_impulse(body, Vec3::new(0.0, 4.0, 0.0));
        assert_relative_eq!(physics.linear_velocity(body).unwrap(), Vec3::new(0.0, 2.0, 0.0));
        physics.set_linear_velocity(body, Vec3::zeros());
        assert_relative_eq!(physics.linear_velocity(body).unwrap(), Vec3::zeros());
        physics.set_gravity(Vec3::new(0.0, -1.0, 0.0));
        assert_eq!(physics.gravity(), Vec3::new(0.0, -1.0, 0.0));
    }
}
