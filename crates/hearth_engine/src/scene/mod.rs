//! Scene management
//!
//! A [`Scene`] ties the ECS world to the physics bridge, the resource caches
//! and the script host. It owns entity creation, the deferred removal flush,
//! the per-frame tick and JSON persistence.
//!
//! ```text
//! scripts ──commands──▶ Scene ──transforms──▶ PhysicsBridge
//!                         ▲                        │
//!                         └── motion state, events ┘
//! ```

pub mod commands;
pub mod scene_manager;
pub mod serialization;

#[cfg(test)]
mod tests;

pub use commands::{CommandQueue, SceneCommand};
pub use scene_manager::{Scene, SceneStats, TickReport};
pub use serialization::{load_document, load_scene, save_scene, scene_to_document, LoadReport, PersistenceError};

use thiserror::Error;

use crate::assets::ResourceError;
use crate::ecs::{EcsError, Entity};
use crate::physics::PhysicsError;

/// Scene operation errors
#[derive(Error, Debug)]
pub enum SceneError {
    /// Entity or component bookkeeping refused the operation
    #[error(transparent)]
    Ecs(#[from] EcsError),

    /// Body or shape creation failed
    #[error(transparent)]
    Physics(#[from] PhysicsError),

    /// Geometry, material or texture loading failed
    #[error(transparent)]
    Resource(#[from] ResourceError),

    /// Attempt to remove the transform on its own
    #[error("entity {0} must keep its transform")]
    TransformRequired(Entity),
}
