//! Script host contract
//!
//! The scripting VM is an external collaborator. The scene registers every
//! entity it creates, calls [`ScriptHost::update`] once per frame and hands
//! over each collision event. Hosts read the world and write through the
//! [`CommandQueue`], which the scene applies after the callback returns.

use crate::ecs::{Entity, World};
use crate::physics::CollisionEvent;
use crate::scene::CommandQueue;

/// Callbacks the scene makes into the scripting layer
pub trait ScriptHost {
    /// An entity was created
    fn register(&mut self, entity: Entity, name: &str);

    /// An entity is being torn down
    fn unregister(&mut self, entity: Entity);

    /// Per-frame update of attached scripts
    fn update(&mut self, world: &World, dt: f32, commands: &mut CommandQueue);

    /// Collision delivered to `event.entity`
    fn on_collision(&mut self, world: &World, event: &CollisionEvent, commands: &mut CommandQueue);
}

/// Host without scripts
#[derive(Debug, Default, Clone, Copy)]
pub struct NullScriptHost;

impl ScriptHost for NullScriptHost {
    fn register(&mut self, _entity: Entity, _name: &str) {}

    fn unregister(&mut self, _entity: Entity) {}

    fn update(&mut self, _world: &World, _dt: f32, _commands: &mut CommandQueue) {}

    fn on_collision(&mut self, _world: &World, _event: &CollisionEvent, _commands: &mut CommandQueue) {}
}
