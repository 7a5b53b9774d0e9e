//! # Hearth Engine
//!
//! Entity/component core of a small 3D engine.
//!
//! ## Features
//!
//! - **Component stores**: dense per-kind arrays with free lists, addressed
//!   through generational entity handles
//! - **Transform propagation**: every transform change refreshes the camera
//!   view and the physics body of its entity
//! - **Physics bridge**: rapier-backed rigid bodies, motion-state
//!   synchronization in both directions and per-entity collision events
//! - **Resource caches**: filename-keyed, reference-counted geometry,
//!   textures, shaders and materials
//! - **Scene manager**: deferred removal, ordered teardown, deferred commands
//!   and JSON persistence
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hearth_engine::prelude::*;
//!
//! let mut scene = Scene::new(SceneConfig::default());
//! let floor = scene.create_entity("Floor");
//! scene
//!     .attach_rigid_body(floor, RigidBodyDesc::fixed(ShapeDesc::Plane { normal: Vec3::y(), constant: 0.0 }))
//!     .unwrap();
//! let ball = scene.create_entity_at("Ball", TransformComponent::from_position(Vec3::new(0.0, 5.0, 0.0)));
//! scene
//!     .attach_rigid_body(ball, RigidBodyDesc::dynamic(ShapeDesc::Sphere { radius: 0.5 }, 1.0))
//!     .unwrap();
//!
//! for _ in 0..120 {
//!     let report = scene.tick(1.0 / 60.0);
//!     for event in &report.collisions {
//!         println!("{} touched {}", event.entity, event.other);
//!     }
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

pub mod assets;
pub mod config;
pub mod ecs;
pub mod foundation;
pub mod physics;
pub mod render;
pub mod scene;
pub mod scripting;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        assets::{MaterialFile, MaterialKind, Resources},
        config::{Config, EngineSettings, PhysicsConfig, SceneConfig},
        ecs::components::{
            CameraComponent, LightComponent, LightType, ModelComponent, RigidBodyDesc, Space,
            TransformComponent,
        },
        ecs::{ComponentKind, Entity, World},
        foundation::{
            math::{Mat4, Quat, Vec3},
            time::Timer,
        },
        physics::{CollisionEvent, ShapeDesc},
        render::{MeshData, RenderQueue},
        scene::{CommandQueue, Scene, SceneCommand, SceneError},
        scripting::{NullScriptHost, ScriptHost},
    };
}
