//! Entity-Component storage
//!
//! Entities are generational handles into a registry; each component kind
//! lives in its own dense store with a free list. Cross-system
//! synchronization (camera views, physics bodies) lives in [`systems`].

pub mod component;
pub mod components;
pub mod entity;
pub mod storage;
pub mod systems;
pub mod world;

pub use component::{Component, ComponentKind, ComponentMask};
pub use entity::{Entity, EntityRecord, EntityRegistry};
pub use storage::{ComponentRecord, ComponentStore};
pub use world::{AttachableComponent, EcsError, MutableComponent, World};
