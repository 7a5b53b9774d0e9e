//! Entity handles and the entity registry
//!
//! An [`Entity`] is a slot index paired with a generation. Slots are reused
//! after deferred removal; the generation is bumped when a slot is freed so a
//! stale handle held by a script never resolves to the entity that replaced it.

use std::fmt;

use super::component::{ComponentKind, ComponentMask};

/// Entity identifier
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Entity {
    index: u32,
    generation: u32,
}

impl Entity {
    /// Create an entity handle from raw parts
    pub(crate) fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Storage slot of this entity
    pub fn index(&self) -> u32 {
        self.index
    }

    /// Generation of the slot when this handle was issued
    pub fn generation(&self) -> u32 {
        self.generation
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}

/// Per-entity bookkeeping: name, tag and the component slot table
#[derive(Debug, Clone)]
pub struct EntityRecord {
    /// Display name
    pub name: String,
    /// Free-form tag used for gameplay queries
    pub tag: String,
    slots: [Option<u32>; ComponentKind::COUNT],
    mask: ComponentMask,
    generation: u32,
    alive: bool,
}

impl EntityRecord {
    fn new(name: &str, generation: u32) -> Self {
        Self {
            name: name.to_string(),
            tag: String::new(),
            slots: [None; ComponentKind::COUNT],
            mask: ComponentMask::empty(),
            generation,
            alive: true,
        }
    }

    /// Slot index of the given component kind, `None` when absent
    pub fn slot(&self, kind: ComponentKind) -> Option<u32> {
        self.slots[kind.index()]
    }

    /// Component kinds currently attached
    pub fn mask(&self) -> ComponentMask {
        self.mask
    }

    /// Whether the entity has a component of this kind
    pub fn has(&self, kind: ComponentKind) -> bool {
        self.mask.contains(kind.mask())
    }

    pub(crate) fn set_slot(&mut self, kind: ComponentKind, slot: Option<u32>) {
        self.slots[kind.index()] = slot;
        self.mask.set(kind.mask(), slot.is_some());
    }
}

/// Owns entity handles and the per-entity component slot table
///
/// Records live in a dense array indexed by `Entity::index`. Freed slots go
/// onto a free list and are handed out again by [`EntityRegistry::create`].
#[derive(Debug, Default)]
pub struct EntityRegistry {
    records: Vec<EntityRecord>,
    free_list: Vec<u32>,
    live_count: usize,
}

impl EntityRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a handle, reusing a freed slot when one is available
    pub fn create(&mut self, name: &str) -> Entity {
        self.live_count += 1;
        if let Some(index) = self.free_list.pop() {
            let record = &mut self.records[index as usize];
            // Generation was already bumped when the slot was freed
            *record = EntityRecord::new(name, record.generation);
            return Entity::new(index, record.generation);
        }

        let index = u32::try_from(self.records.len()).unwrap_or(u32::MAX);
        debug_assert!(index < u32::MAX, "entity registry exhausted");
        self.records.push(EntityRecord::new(name, 0));
        Entity::new(index, 0)
    }

    /// Release a slot back to the free list
    ///
    /// The caller is responsible for tearing down components first; the slot
    /// table must already be empty.
    pub fn free(&mut self, entity: Entity) -> bool {
        let Some(record) = self.get_mut(entity) else {
            log::warn!("EntityRegistry::free: stale or invalid entity {entity}");
            return false;
        };
        debug_assert!(record.mask.is_empty(), "freeing entity with attached components");
        record.alive = false;
        record.generation = record.generation.wrapping_add(1);
        self.free_list.push(entity.index);
        self.live_count -= 1;
        true
    }

    /// Whether the handle refers to a live entity of the current generation
    pub fn is_alive(&self, entity: Entity) -> bool {
        self.get(entity).is_some()
    }

    /// Resolve a handle to its record
    pub fn get(&self, entity: Entity) -> Option<&EntityRecord> {
        self.records
            .get(entity.index as usize)
            .filter(|record| record.alive && record.generation == entity.generation)
    }

    /// Resolve a handle to its mutable record
    pub fn get_mut(&mut self, entity: Entity) -> Option<&mut EntityRecord> {
        self.records
            .get_mut(entity.index as usize)
            .filter(|record| record.alive && record.generation == entity.generation)
    }

    /// Number of live entities
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Whether no entity is alive
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Iterate over live entities in slot order
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &EntityRecord)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.alive)
            .map(|(index, record)| {
                #[allow(clippy::cast_possible_truncation)]
                let entity = Entity::new(index as u32, record.generation);
                (entity, record)
            })
    }

    /// First live entity with the given name
    pub fn find_by_name(&self, name: &str) -> Option<Entity> {
        self.iter()
            .find(|(_, record)| record.name == name)
            .map(|(entity, _)| entity)
    }

    /// All live entities with the given tag
    pub fn find_by_tag(&self, tag: &str) -> Vec<Entity> {
        self.iter()
            .filter(|(_, record)| record.tag == tag)
            .map(|(entity, _)| entity)
            .collect()
    }
}
