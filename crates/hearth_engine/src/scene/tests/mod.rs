//! Scenario tests driving a whole [`Scene`](crate::scene::Scene)

mod collisions;
mod lifecycle;

use std::cell::RefCell;
use std::rc::Rc;

use crate::config::{PhysicsConfig, SceneConfig};
use crate::ecs::{Entity, World};
use crate::physics::CollisionEvent;
use crate::scene::{CommandQueue, Scene};
use crate::scripting::ScriptHost;

/// Scene without gravity so bodies stay where they are put
fn still_scene() -> Scene {
    Scene::new(SceneConfig::default().with_physics(PhysicsConfig {
        gravity: [0.0, 0.0, 0.0],
        ..PhysicsConfig::default()
    }))
}

#[derive(Default)]
struct ScriptLog {
    registered: Vec<(Entity, String)>,
    unregistered: Vec<Entity>,
    updates: usize,
    collisions: Vec<CollisionEvent>,
}

/// Script host that records every callback and removes entities tagged
/// "pickup" when they are hit
#[derive(Clone, Default)]
struct RecordingHost {
    log: Rc<RefCell<ScriptLog>>,
}

impl ScriptHost for RecordingHost {
    fn register(&mut self, entity: Entity, name: &str) {
        self.log.borrow_mut().registered.push((entity, name.to_string()));
    }

    fn unregister(&mut self, entity: Entity) {
        self.log.borrow_mut().unregistered.push(entity);
    }

    fn update(&mut self, _world: &World, _dt: f32, _commands: &mut CommandQueue) {
        self.log.borrow_mut().updates += 1;
    }

    fn on_collision(&mut self, world: &World, event: &CollisionEvent, commands: &mut CommandQueue) {
        self.log.borrow_mut().collisions.push(*event);
        if world.tag(event.entity) == Some("pickup") {
            commands.remove(event.entity);
        }
    }
}
