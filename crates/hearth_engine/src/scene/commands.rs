//! Deferred scene mutations
//!
//! Code running while the scene iterates its stores (script updates,
//! collision handlers) never mutates the scene directly. It records commands
//! here and the scene applies them once the iteration has finished.

use crate::ecs::components::{CameraComponent, LightComponent, RigidBodyDesc, Space, TransformComponent};
use crate::ecs::{ComponentKind, Entity};
use crate::foundation::math::{Quat, Vec3};

/// A mutation requested from inside a callback
#[derive(Debug, Clone, PartialEq)]
pub enum SceneCommand {
    /// Create an entity with the given transform
    Spawn {
        /// Display name
        name: String,
        /// Initial transform
        transform: TransformComponent,
    },
    /// Mark an entity for removal at the next flush
    Remove(Entity),
    /// Mark the first entity with this name for removal
    RemoveByName(String),
    /// Attach a camera
    AttachCamera(Entity, CameraComponent),
    /// Attach a light
    AttachLight(Entity, LightComponent),
    /// Attach a model loaded from geometry and material files
    AttachModel {
        /// Target entity
        entity: Entity,
        /// Geometry file
        geometry: String,
        /// Material file
        material: String,
    },
    /// Create a rigid body
    AttachRigidBody(Entity, RigidBodyDesc),
    /// Remove one component
    RemoveComponent(Entity, ComponentKind),
    /// Absolute position
    SetPosition(Entity, Vec3),
    /// Absolute rotation
    SetRotation(Entity, Quat),
    /// Absolute scale
    SetScale(Entity, Vec3),
    /// Relative move
    Translate(Entity, Vec3, Space),
    /// Relative rotation
    Rotate(Entity, Quat, Space),
    /// Force applied during the next physics step
    ApplyForce(Entity, Vec3),
    /// Instantaneous impulse
    ApplyImpulse(Entity, Vec3),
    /// Overwrite the linear velocity
    SetLinearVelocity(Entity, Vec3),
}

/// FIFO of pending [`SceneCommand`]s
#[derive(Debug, Default)]
pub struct CommandQueue {
    commands: Vec<SceneCommand>,
}

impl CommandQueue {
    /// Create an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a command
    pub fn push(&mut self, command: SceneCommand) {
        self.commands.push(command);
    }

    /// Record an entity removal
    pub fn remove(&mut self, entity: Entity) {
        self.push(SceneCommand::Remove(entity));
    }

    /// Record a relative move
    pub fn translate(&mut self, entity: Entity, offset: Vec3, space: Space) {
        self.push(SceneCommand::Translate(entity, offset, space));
    }

    /// Record an impulse
    pub fn apply_impulse(&mut self, entity: Entity, impulse: Vec3) {
        self.push(SceneCommand::ApplyImpulse(entity, impulse));
    }

    /// Number of pending commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Pending commands, in recording order
    pub fn iter(&self) -> impl Iterator<Item = &SceneCommand> {
        self.commands.iter()
    }

    /// Take every pending command, leaving the queue empty
    pub fn take(&mut self) -> Vec<SceneCommand> {
        std::mem::take(&mut self.commands)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::World;

    #[test]
    fn commands_drain_in_recording_order() {
        let mut world = World::new();
        let entity = world.create_entity("crate");
        let mut queue = CommandQueue::new();
        queue.translate(entity, Vec3::x(), Space::World);
        queue.remove(entity);
        assert_eq!(queue.len(), 2);

        let drained = queue.take();
        assert!(queue.is_empty());
        assert_eq!(drained[0], SceneCommand::Translate(entity, Vec3::x(), Space::World));
        assert_eq!(drained[1], SceneCommand::Remove(entity));
    }
}
