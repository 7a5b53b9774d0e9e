//! Collision events produced by the physics step

use crate::ecs::Entity;
use crate::foundation::math::Vec3;

/// One contact point as seen by one of the two bodies.
///
/// Every penetrating contact yields two events, one per participant, sharing
/// the same normal and position pair. The normal is the contact normal on
/// body B of the manifold and is not flipped for the B-side event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionEvent {
    /// Entity receiving the event
    pub entity: Entity,
    /// The other party
    pub other: Entity,
    /// Contact normal on body B, pointing from B towards A
    pub normal: Vec3,
    /// World contact position on body A
    pub position_a: Vec3,
    /// World contact position on body B
    pub position_b: Vec3,
}
