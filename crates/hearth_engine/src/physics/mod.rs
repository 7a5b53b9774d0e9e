//! Physics integration
//!
//! The rigid-body solver sits behind [`DynamicsWorld`] and is rapier by
//! default ([`RapierDynamicsWorld`]). [`PhysicsBridge`] owns it together with
//! the shared shapes and turns contact manifolds into per-entity
//! [`CollisionEvent`]s.

pub mod bridge;
pub mod dynamics;
pub mod events;
pub mod rapier;
pub mod shape;

pub use bridge::PhysicsBridge;
pub use dynamics::{
    BodyDesc, BodyHandle, ContactManifold, ContactPoint, DynamicsWorld, MotionStateSync, RemovedBody,
};
pub use events::CollisionEvent;
pub use rapier::RapierDynamicsWorld;
pub use shape::{ShapeDesc, ShapeKey, ShapeRegistry};

/// Physics errors
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// Body creation without a collision shape
    #[error("no collision shape supplied")]
    MissingShape,

    /// Shape dimensions are not positive and finite
    #[error("invalid collision shape: {0}")]
    InvalidShape(String),

    /// Shape key does not refer to a registered shape
    #[error("unknown collision shape")]
    UnknownShape,

    /// Body handle does not refer to a body in the world
    #[error("unknown rigid body")]
    UnknownBody,

    /// Mass is negative or not finite
    #[error("invalid mass {0}")]
    InvalidMass(f32),
}
