//! Contract between the physics bridge and the rigid-body world
//!
//! The solver is treated as a black box: bodies go in tagged with their owning
//! entity, the world is stepped, and the bridge reads back contact manifolds.
//! Transforms cross the boundary through [`MotionStateSync`].

use super::shape::{ShapeDesc, ShapeKey};
use crate::ecs::Entity;
use crate::foundation::math::{Iso3, Vec3};

slotmap::new_key_type! {
    /// Handle to a body inside a [`DynamicsWorld`]
    pub struct BodyHandle;
}

/// Motion-state callback pair used by the world during a step
pub trait MotionStateSync {
    /// Read path: current world transform of `owner`, or `None` if it is gone
    fn get_world_transform(&self, owner: Entity) -> Option<Iso3>;

    /// Write path: integration result for `owner`
    fn set_world_transform(&mut self, owner: Entity, transform: &Iso3);
}

/// Everything needed to insert a body
#[derive(Debug, Clone)]
pub struct BodyDesc {
    /// Entity the body belongs to (the body's user data)
    pub owner: Entity,
    /// Registered shape backing the body
    pub shape_key: ShapeKey,
    /// Copy of the shape geometry
    pub shape: ShapeDesc,
    /// Mass; zero for static bodies
    pub mass: f32,
    /// Principal moments of inertia, zero for static bodies
    pub local_inertia: Vec3,
    /// Friction coefficient
    pub friction: f32,
    /// Restitution coefficient
    pub restitution: f32,
    /// Driven by its motion state instead of the solver
    pub is_kinematic: bool,
    /// Initial world transform
    pub transform: Iso3,
}

/// What is left after a body leaves the world
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemovedBody {
    /// Entity that owned the body
    pub owner: Entity,
    /// Shape reference the body held
    pub shape_key: ShapeKey,
}

/// One point of a contact manifold
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactPoint {
    /// World position on body A
    pub position_on_a: Vec3,
    /// World position on body B
    pub position_on_b: Vec3,
    /// Contact normal on B, pointing from B towards A
    pub normal_on_b: Vec3,
    /// Signed separation; negative when penetrating
    pub distance: f32,
}

/// Contact points between a pair of bodies
#[derive(Debug, Clone, PartialEq)]
pub struct ContactManifold {
    /// First body
    pub body_a: BodyHandle,
    /// Second body
    pub body_b: BodyHandle,
    /// Owner of the first body
    pub owner_a: Entity,
    /// Owner of the second body
    pub owner_b: Entity,
    /// Contact points
    pub points: Vec<ContactPoint>,
}

/// A rigid-body simulation
pub trait DynamicsWorld {
    /// Insert a body
    fn add_body(&mut self, desc: BodyDesc) -> BodyHandle;

    /// Remove a body, dropping any manifolds that reference it
    fn remove_body(&mut self, body: BodyHandle) -> Option<RemovedBody>;

    /// Whether the handle refers to a body in this world
    fn contains(&self, body: BodyHandle) -> bool;

    /// Number of bodies
    fn body_count(&self) -> usize;

    /// Entity stored as the body's user data
    fn owner(&self, body: BodyHandle) -> Option<Entity>;

    /// Current world transform
    fn world_transform(&self, body: BodyHandle) -> Option<Iso3>;

    /// Teleport a body
    fn set_world_transform(&mut self, body: BodyHandle, transform: &Iso3);

    /// Local inertia computed at creation
    fn local_inertia(&self, body: BodyHandle) -> Option<Vec3>;

    /// Wake a body
    fn activate(&mut self, body: BodyHandle);

    /// Whether a body is awake
    fn is_active(&self, body: BodyHandle) -> bool;

    /// Accumulate a force applied at the center of mass until the next step
    fn apply_central_force(&mut self, body: BodyHandle, force: Vec3);

    /// Apply an instantaneous impulse at the center of mass
    fn apply_central_impulse(&mut self, body: BodyHandle, impulse: Vec3);

    /// Linear velocity
    fn linear_velocity(&self, body: BodyHandle) -> Option<Vec3>;

    /// Overwrite the linear velocity
    fn set_linear_velocity(&mut self, body: BodyHandle, velocity: Vec3);

    /// Overwrite the angular velocity
    fn set_angular_velocity(&mut self, body: BodyHandle, velocity: Vec3);

    /// Gravity applied to dynamic bodies
    fn gravity(&self) -> Vec3;

    /// Change gravity
    fn set_gravity(&mut self, gravity: Vec3);

    /// Advance by `dt` using fixed sub-steps; returns the number of sub-steps taken.
    ///
    /// At most `max_sub_steps` are taken and leftover time beyond that is
    /// dropped. A `max_sub_steps` of zero runs one variable step of `dt`.
    fn step_simulation(
        &mut self,
        dt: f32,
        max_sub_steps: u32,
        fixed_time_step: f32,
        motion: &mut dyn MotionStateSync,
    ) -> u32;

    /// Manifolds from the most recent sub-step
    fn manifolds(&self) -> &[ContactManifold];
}
