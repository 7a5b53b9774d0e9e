//! Rigid body component
//!
//! Records the physics body owned by an entity and the parameters it was
//! created with. Bodies are created and destroyed by the scene through the
//! physics bridge; this component is the ECS-side bookkeeping.

use crate::ecs::component::{Component, ComponentKind};
use crate::ecs::storage::ComponentStore;
use crate::ecs::world::World;
use crate::physics::{BodyHandle, ShapeDesc};

/// Parameters for attaching a rigid body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyDesc {
    /// Collision shape; `None` substitutes the default unit box
    pub shape: Option<ShapeDesc>,
    /// Mass in kilograms; 0 makes the body static (or kinematic)
    pub mass: f32,
    /// Coulomb friction coefficient
    pub friction: f32,
    /// Bounciness in [0, 1]
    pub restitution: f32,
    /// Kinematic bodies follow their transform instead of the simulation
    pub is_kinematic: bool,
}

impl Default for RigidBodyDesc {
    fn default() -> Self {
        Self {
            shape: None,
            mass: 1.0,
            friction: 0.5,
            restitution: 0.0,
            is_kinematic: false,
        }
    }
}

impl RigidBodyDesc {
    /// Dynamic body with the given shape and mass
    pub fn dynamic(shape: ShapeDesc, mass: f32) -> Self {
        Self {
            shape: Some(shape),
            mass,
            ..Self::default()
        }
    }

    /// Immovable body
    pub fn fixed(shape: ShapeDesc) -> Self {
        Self {
            shape: Some(shape),
            mass: 0.0,
            ..Self::default()
        }
    }

    /// Builder pattern: Set restitution
    #[must_use]
    pub fn with_restitution(mut self, restitution: f32) -> Self {
        self.restitution = restitution;
        self
    }

    /// Builder pattern: Set friction
    #[must_use]
    pub fn with_friction(mut self, friction: f32) -> Self {
        self.friction = friction;
        self
    }

    /// Builder pattern: Mark as kinematic
    #[must_use]
    pub fn kinematic(mut self) -> Self {
        self.is_kinematic = true;
        self.mass = 0.0;
        self
    }
}

/// ECS-side record of a physics body
#[derive(Debug, Clone, PartialEq)]
pub struct RigidBodyComponent {
    body: BodyHandle,
    shape: ShapeDesc,
    mass: f32,
    friction: f32,
    restitution: f32,
    is_kinematic: bool,
}

impl Component for RigidBodyComponent {
    const KIND: ComponentKind = ComponentKind::RigidBody;

    fn store(world: &World) -> &ComponentStore<Self> {
        &world.rigid_bodies
    }

    fn store_mut(world: &mut World) -> &mut ComponentStore<Self> {
        &mut world.rigid_bodies
    }
}

impl RigidBodyComponent {
    pub(crate) fn new(body: BodyHandle, shape: ShapeDesc, desc: &RigidBodyDesc) -> Self {
        Self {
            body,
            shape,
            mass: desc.mass,
            friction: desc.friction,
            restitution: desc.restitution,
            is_kinematic: desc.is_kinematic,
        }
    }

    /// Physics body handle
    pub fn body(&self) -> BodyHandle {
        self.body
    }

    /// Shape the body was created with
    pub fn shape(&self) -> &ShapeDesc {
        &self.shape
    }

    /// Mass in kilograms
    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// Friction coefficient
    pub fn friction(&self) -> f32 {
        self.friction
    }

    /// Restitution coefficient
    pub fn restitution(&self) -> f32 {
        self.restitution
    }

    /// Whether the body is kinematic
    pub fn is_kinematic(&self) -> bool {
        self.is_kinematic
    }

    /// Parameters that recreate this body
    pub fn to_desc(&self) -> RigidBodyDesc {
        RigidBodyDesc {
            shape: Some(self.shape.clone()),
            mass: self.mass,
            friction: self.friction,
            restitution: self.restitution,
            is_kinematic: self.is_kinematic,
        }
    }
}
