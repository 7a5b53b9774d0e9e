//! Dense component storage with a free list
//!
//! Each component kind lives in one [`ComponentStore`]: a dense array of
//! records plus the indices of records that were logically removed. A removed
//! record keeps its data and is flagged invalid until its slot is reused.
//!
//! Slot indices are stable until reuse, but a reference obtained from the
//! store is invalidated by any insert (the backing `Vec` may reallocate).
//! Hold slot indices or entity handles across calls, never references.

use super::entity::Entity;

/// One slot of a component store
#[derive(Debug, Clone)]
pub struct ComponentRecord<T> {
    /// Entity owning this record
    pub node: Entity,
    /// False once the component was removed and until the slot is reused
    pub valid: bool,
    /// Component data
    pub data: T,
}

/// Dense array + free-list container for one component kind
#[derive(Debug, Clone)]
pub struct ComponentStore<T> {
    records: Vec<ComponentRecord<T>>,
    free_indices: Vec<u32>,
}

impl<T> Default for ComponentStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> ComponentStore<T> {
    /// Create an empty store
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            free_indices: Vec::new(),
        }
    }

    /// Insert a record and return its slot, reusing a freed slot when possible
    pub fn insert(&mut self, node: Entity, data: T) -> u32 {
        let record = ComponentRecord { node, valid: true, data };
        if let Some(slot) = self.free_indices.pop() {
            self.records[slot as usize] = record;
            slot
        } else {
            let slot = u32::try_from(self.records.len()).unwrap_or(u32::MAX);
            self.records.push(record);
            slot
        }
    }

    /// Mark a record invalid and return its slot to the free list
    pub fn remove(&mut self, slot: u32) -> bool {
        match self.records.get_mut(slot as usize) {
            Some(record) if record.valid => {
                record.valid = false;
                self.free_indices.push(slot);
                true
            }
            _ => false,
        }
    }

    /// Resolve a slot to a valid record
    pub fn record(&self, slot: u32) -> Option<&ComponentRecord<T>> {
        self.records.get(slot as usize).filter(|record| record.valid)
    }

    /// Component data at a valid slot
    pub fn get(&self, slot: u32) -> Option<&T> {
        self.record(slot).map(|record| &record.data)
    }

    /// Mutable component data at a valid slot
    pub fn get_mut(&mut self, slot: u32) -> Option<&mut T> {
        self.records
            .get_mut(slot as usize)
            .filter(|record| record.valid)
            .map(|record| &mut record.data)
    }

    /// Number of valid records
    pub fn len(&self) -> usize {
        self.records.len() - self.free_indices.len()
    }

    /// Whether no valid record exists
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Total slots ever allocated (valid or not)
    pub fn capacity_used(&self) -> usize {
        self.records.len()
    }

    /// Iterate valid records as `(slot, owner, data)`
    pub fn iter(&self) -> impl Iterator<Item = (u32, Entity, &T)> + '_ {
        self.records
            .iter()
            .enumerate()
            .filter(|(_, record)| record.valid)
            .map(|(slot, record)| {
                #[allow(clippy::cast_possible_truncation)]
                let slot = slot as u32;
                (slot, record.node, &record.data)
            })
    }

    /// Iterate valid records mutably as `(owner, data)`
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (Entity, &mut T)> + '_ {
        self.records
            .iter_mut()
            .filter(|record| record.valid)
            .map(|record| (record.node, &mut record.data))
    }
}
