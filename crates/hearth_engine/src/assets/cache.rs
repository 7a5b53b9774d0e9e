//! Filename-keyed, reference-counted resource cache
//!
//! Acquiring a name that is already cached bumps its count and hands back the
//! same handle. Releasing drops the count; at zero the entry and its name are
//! removed and the data is returned so the owner can free what it holds.

use std::collections::HashMap;

use super::ResourceError;
use crate::foundation::collections::{HandleMap, TypedHandle};

#[derive(Debug)]
struct Entry<T> {
    name: String,
    refs: u32,
    data: T,
}

/// Cache of `T` keyed by file name
#[derive(Debug)]
pub struct ResourceCache<T> {
    entries: HandleMap<Entry<T>>,
    by_name: HashMap<String, slotmap::DefaultKey>,
}

impl<T> Default for ResourceCache<T> {
    fn default() -> Self {
        Self {
            entries: HandleMap::new(),
            by_name: HashMap::new(),
        }
    }
}

impl<T> ResourceCache<T> {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached handle for `name` with one more reference, or run
    /// `load` and cache the result with a count of one
    pub fn acquire<E>(
        &mut self,
        name: &str,
        load: impl FnOnce() -> Result<T, E>,
    ) -> Result<TypedHandle<T>, E> {
        if let Some(handle) = self.find(name) {
            if let Some(entry) = self.entries.get_mut(handle.key()) {
                entry.refs += 1;
                log::trace!("cache hit '{name}' ({} refs)", entry.refs);
                return Ok(handle);
            }
        }

        let data = load()?;
        let key = self.entries.insert(Entry {
            name: name.to_owned(),
            refs: 1,
            data,
        });
        self.by_name.insert(name.to_owned(), key);
        Ok(TypedHandle::new(key))
    }

    /// Add a reference to a live entry
    pub fn retain(&mut self, handle: TypedHandle<T>) -> Result<u32, ResourceError> {
        let entry = self
            .entries
            .get_mut(handle.key())
            .ok_or(ResourceError::InvalidHandle)?;
        entry.refs += 1;
        Ok(entry.refs)
    }

    /// Drop a reference; returns the data when the count reached zero
    pub fn release(&mut self, handle: TypedHandle<T>) -> Result<Option<T>, ResourceError> {
        let Some(entry) = self.entries.get_mut(handle.key()) else {
            log::warn!("ResourceCache::release: stale or invalid handle {handle:?}");
            return Err(ResourceError::InvalidHandle);
        };
        entry.refs -= 1;
        if entry.refs > 0 {
            return Ok(None);
        }
        match self.entries.remove(handle.key()) {
            Some(entry) => {
                self.by_name.remove(&entry.name);
                log::trace!("evicted '{}'", entry.name);
                Ok(Some(entry.data))
            }
            None => Ok(None),
        }
    }

    /// Cached data
    pub fn get(&self, handle: TypedHandle<T>) -> Option<&T> {
        self.entries.get(handle.key()).map(|entry| &entry.data)
    }

    pub(crate) fn get_mut(&mut self, handle: TypedHandle<T>) -> Option<&mut T> {
        self.entries.get_mut(handle.key()).map(|entry| &mut entry.data)
    }

    /// Current reference count
    pub fn refcount(&self, handle: TypedHandle<T>) -> Option<u32> {
        self.entries.get(handle.key()).map(|entry| entry.refs)
    }

    /// File name the entry was loaded from
    pub fn name(&self, handle: TypedHandle<T>) -> Option<&str> {
        self.entries.get(handle.key()).map(|entry| entry.name.as_str())
    }

    /// Handle for a cached name, without touching the count
    pub fn find(&self, name: &str) -> Option<TypedHandle<T>> {
        self.by_name.get(name).copied().map(TypedHandle::new)
    }

    /// Number of cached entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn same_name_shares_one_entry() {
        let mut cache: ResourceCache<u32> = ResourceCache::new();
        let mut loads = 0;
        let a = cache
            .acquire("rock.obj", || {
                loads += 1;
                Ok::<_, Infallible>(7)
            })
            .unwrap();
        let b = cache
            .acquire("rock.obj", || {
                loads += 1;
                Ok::<_, Infallible>(8)
            })
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(loads, 1);
        assert_eq!(cache.refcount(a), Some(2));
        assert_eq!(cache.get(a), Some(&7));
    }

    #[test]
    fn data_is_returned_once_at_zero() {
        let mut cache: ResourceCache<&str> = ResourceCache::new();
        let h = cache.acquire("a", || Ok::<_, Infallible>("data")).unwrap();
        cache.retain(h).unwrap();
        assert_eq!(cache.release(h).unwrap(), None);
        assert_eq!(cache.release(h).unwrap(), Some("data"));
        assert!(cache.find("a").is_none());
        assert!(matches!(cache.release(h), Err(ResourceError::InvalidHandle)));
    }

    #[test]
    fn failed_load_caches_nothing() {
        let mut cache: ResourceCache<u32> = ResourceCache::new();
        let result = cache.acquire("missing", || Err("not found"));
        assert_eq!(result, Err("not found"));
        assert!(cache.is_empty());
    }

    #[test]
    fn reloading_after_eviction_gets_a_fresh_handle() {
        let mut cache: ResourceCache<u32> = ResourceCache::new();
        let old = cache.acquire("a", || Ok::<_, Infallible>(1)).unwrap();
        cache.release(old).unwrap();
        let new = cache.acquire("a", || Ok::<_, Infallible>(2)).unwrap();
        assert_ne!(old, new);
        assert!(cache.get(old).is_none());
        assert_eq!(cache.name(new), Some("a"));
    }
}
