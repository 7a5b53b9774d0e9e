//! The world: entity registry plus one dense store per component kind
//!
//! All lookups go through the entity's slot table, so a stale handle or a
//! missing component resolves to `None` instead of someone else's data.

use super::component::{Component, ComponentKind};
use super::components::{
    CameraComponent, InstanceUniforms, LightComponent, ModelComponent, RigidBodyComponent, TransformComponent,
};
use super::entity::{Entity, EntityRecord, EntityRegistry};
use super::storage::ComponentStore;

/// ECS errors
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum EcsError {
    /// Handle is stale or was never allocated
    #[error("entity {0} is not alive")]
    InvalidEntity(Entity),

    /// Component kind is already attached
    #[error("entity {entity} already has a {kind} component")]
    AlreadyAttached {
        /// Target entity
        entity: Entity,
        /// Kind that was already present
        kind: ComponentKind,
    },

    /// Component kind is not attached
    #[error("entity {entity} has no {kind} component")]
    NotAttached {
        /// Target entity
        entity: Entity,
        /// Missing kind
        kind: ComponentKind,
    },

    /// Slot tables and stores disagree
    #[error("store invariant violated: {0}")]
    Corrupted(String),
}

/// Components that may be edited in place through [`World::get_mut`].
///
/// Transforms must go through the propagation functions so cameras and
/// bodies stay in sync. Models hold cache references and rigid bodies are
/// owned by the physics bridge, so both are edited through narrower calls.
pub trait MutableComponent: Component {}

impl MutableComponent for CameraComponent {}
impl MutableComponent for LightComponent {}

/// Components that carry no external references and may be attached directly
/// through [`World::attach`].
///
/// Models and rigid bodies are attached by the scene, which takes the cache
/// and physics references they stand for.
pub trait AttachableComponent: Component {}

impl AttachableComponent for CameraComponent {}
impl AttachableComponent for LightComponent {}

/// Entity registry and component stores
#[derive(Debug, Default)]
pub struct World {
    pub(crate) registry: EntityRegistry,
    pub(crate) transforms: ComponentStore<TransformComponent>,
    pub(crate) cameras: ComponentStore<CameraComponent>,
    pub(crate) models: ComponentStore<ModelComponent>,
    pub(crate) lights: ComponentStore<LightComponent>,
    pub(crate) rigid_bodies: ComponentStore<RigidBodyComponent>,
}

impl World {
    /// Create an empty world
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an entity with an identity transform attached
    pub fn create_entity(&mut self, name: &str) -> Entity {
        self.create_entity_with(name, TransformComponent::identity())
    }

    /// Create an entity with the given transform attached
    pub fn create_entity_with(&mut self, name: &str, transform: TransformComponent) -> Entity {
        let entity = self.registry.create(name);
        let slot = self.transforms.insert(entity, transform);
        if let Some(record) = self.registry.get_mut(entity) {
            record.set_slot(ComponentKind::Transform, Some(slot));
        }
        log::trace!("created entity {entity} '{name}'");
        entity
    }

    /// Whether the handle refers to a live entity
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.registry.is_alive(entity)
    }

    /// Number of live entities
    pub fn entity_count(&self) -> usize {
        self.registry.len()
    }

    /// Live entities in slot order
    pub fn entities(&self) -> impl Iterator<Item = Entity> + '_ {
        self.registry.iter().map(|(entity, _)| entity)
    }

    /// Registry record for an entity
    pub fn record(&self, entity: Entity) -> Option<&EntityRecord> {
        self.registry.get(entity)
    }

    /// Display name
    pub fn name(&self, entity: Entity) -> Option<&str> {
        self.registry.get(entity).map(|record| record.name.as_str())
    }

    /// Tag string
    pub fn tag(&self, entity: Entity) -> Option<&str> {
        self.registry.get(entity).map(|record| record.tag.as_str())
    }

    /// Rename an entity
    pub fn set_name(&mut self, entity: Entity, name: &str) -> bool {
        match self.registry.get_mut(entity) {
            Some(record) => {
                record.name = name.to_owned();
                true
            }
            None => {
                log::warn!("World::set_name: invalid entity {entity}");
                false
            }
        }
    }

    /// Retag an entity
    pub fn set_tag(&mut self, entity: Entity, tag: &str) -> bool {
        match self.registry.get_mut(entity) {
            Some(record) => {
                record.tag = tag.to_owned();
                true
            }
            None => {
                log::warn!("World::set_tag: invalid entity {entity}");
                false
            }
        }
    }

    /// First live entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.registry.find_by_name(name)
    }

    /// Live entities with the given tag
    pub fn find_by_tag(&self, tag: &str) -> Vec<Entity> {
        self.registry.find_by_tag(tag)
    }

    /// Attach a component, refusing if the kind is already present
    pub fn attach<T: AttachableComponent>(&mut self, entity: Entity, component: T) -> Result<u32, EcsError> {
        self.attach_component(entity, component)
    }

    pub(crate) fn attach_component<T: Component>(&mut self, entity: Entity, component: T) -> Result<u32, EcsError> {
        let Some(record) = self.registry.get(entity) else {
            log::warn!("World::attach: invalid entity {entity}");
            return Err(EcsError::InvalidEntity(entity));
        };
        if record.has(T::KIND) {
            log::warn!("World::attach: entity {entity} already has a {} component", T::KIND);
            return Err(EcsError::AlreadyAttached { entity, kind: T::KIND });
        }
        let slot = T::store_mut(self).insert(entity, component);
        if let Some(record) = self.registry.get_mut(entity) {
            record.set_slot(T::KIND, Some(slot));
        }
        Ok(slot)
    }

    /// Component of type `T`, if the entity is alive and has one
    pub fn get<T: Component>(&self, entity: Entity) -> Option<&T> {
        let slot = self.registry.get(entity)?.slot(T::KIND)?;
        T::store(self).get(slot)
    }

    /// Mutable component for kinds without synchronization side effects
    pub fn get_mut<T: MutableComponent>(&mut self, entity: Entity) -> Option<&mut T> {
        self.component_mut(entity)
    }

    pub(crate) fn component_mut<T: Component>(&mut self, entity: Entity) -> Option<&mut T> {
        let slot = self.registry.get(entity)?.slot(T::KIND)?;
        T::store_mut(self).get_mut(slot)
    }

    /// Show or hide an entity's model; false if it has none
    pub fn set_model_visible(&mut self, entity: Entity, visible: bool) -> bool {
        match self.component_mut::<ModelComponent>(entity) {
            Some(model) => {
                model.set_visible(visible);
                true
            }
            None => {
                log::warn!("World::set_model_visible: entity {entity} has no model");
                false
            }
        }
    }

    /// Replace the per-instance uniform block of an entity's model
    pub fn set_model_uniforms(&mut self, entity: Entity, uniforms: InstanceUniforms) -> bool {
        match self.component_mut::<ModelComponent>(entity) {
            Some(model) => {
                model.set_uniforms(uniforms);
                true
            }
            None => {
                log::warn!("World::set_model_uniforms: entity {entity} has no model");
                false
            }
        }
    }

    /// Whether the entity has a component of the given kind
    pub fn has(&self, entity: Entity, kind: ComponentKind) -> bool {
        self.registry.get(entity).is_some_and(|record| record.has(kind))
    }

    /// Store slot of the entity's component of the given kind
    pub fn slot(&self, entity: Entity, kind: ComponentKind) -> Option<u32> {
        self.registry.get(entity)?.slot(kind)
    }

    /// Iterate `(owner, component)` over every valid component of type `T`
    pub fn query<T: Component>(&self) -> impl Iterator<Item = (Entity, &T)> + '_ {
        T::store(self).iter().map(|(_, owner, component)| (owner, component))
    }

    /// Mark the component record invalid, free its slot and clear the entity's slot.
    ///
    /// Kind-specific teardown (GPU handles, physics bodies) is the caller's job.
    pub(crate) fn detach(&mut self, entity: Entity, kind: ComponentKind) -> bool {
        let Some(slot) = self.slot(entity, kind) else {
            log::warn!("World::detach: entity {entity} has no {kind} component");
            return false;
        };
        let freed = match kind {
            ComponentKind::Transform => self.transforms.remove(slot),
            ComponentKind::Camera => self.cameras.remove(slot),
            ComponentKind::Model => self.models.remove(slot),
            ComponentKind::Light => self.lights.remove(slot),
            ComponentKind::RigidBody => self.rigid_bodies.remove(slot),
        };
        debug_assert!(freed, "slot table pointed at an invalid record");
        if let Some(record) = self.registry.get_mut(entity) {
            record.set_slot(kind, None);
        }
        freed
    }

    /// Detach everything in teardown order and release the entity slot
    pub(crate) fn destroy_entity(&mut self, entity: Entity) -> bool {
        if !self.registry.is_alive(entity) {
            log::warn!("World::destroy_entity: invalid entity {entity}");
            return false;
        }
        for kind in ComponentKind::TEARDOWN_ORDER {
            if self.has(entity, kind) {
                self.detach(entity, kind);
            }
        }
        self.registry.free(entity)
    }

    fn owner_of(&self, kind: ComponentKind, slot: u32) -> Option<Entity> {
        match kind {
            ComponentKind::Transform => self.transforms.record(slot).map(|r| r.node),
            ComponentKind::Camera => self.cameras.record(slot).map(|r| r.node),
            ComponentKind::Model => self.models.record(slot).map(|r| r.node),
            ComponentKind::Light => self.lights.record(slot).map(|r| r.node),
            ComponentKind::RigidBody => self.rigid_bodies.record(slot).map(|r| r.node),
        }
    }

    fn store_len(&self, kind: ComponentKind) -> usize {
        match kind {
            ComponentKind::Transform => self.transforms.len(),
            ComponentKind::Camera => self.cameras.len(),
            ComponentKind::Model => self.models.len(),
            ComponentKind::Light => self.lights.len(),
            ComponentKind::RigidBody => self.rigid_bodies.len(),
        }
    }

    /// Check that every slot index is empty or points at a valid record owned
    /// by the entity, that every entity has a transform, and that no store
    /// holds valid records nobody points at.
    pub fn validate(&self) -> Result<(), EcsError> {
        let mut referenced = [0usize; ComponentKind::COUNT];
        for (entity, record) in self.registry.iter() {
            if !record.has(ComponentKind::Transform) {
                return Err(EcsError::Corrupted(format!("entity {entity} has no transform")));
            }
            for kind in ComponentKind::ALL {
                let Some(slot) = record.slot(kind) else {
                    continue;
                };
                match self.owner_of(kind, slot) {
                    Some(owner) if owner == entity => referenced[kind.index()] += 1,
                    Some(owner) => {
                        return Err(EcsError::Corrupted(format!(
                            "{kind} slot {slot} of entity {entity} is owned by {owner}"
                        )))
                    }
                    None => {
                        return Err(EcsError::Corrupted(format!(
                            "{kind} slot {slot} of entity {entity} is not a valid record"
                        )))
                    }
                }
            }
        }
        for kind in ComponentKind::ALL {
            let valid = self.store_len(kind);
            if valid != referenced[kind.index()] {
                return Err(EcsError::Corrupted(format!(
                    "{kind} store holds {valid} valid records but {} are referenced",
                    referenced[kind.index()]
                )));
            }
        }
        Ok(())
    }
}
