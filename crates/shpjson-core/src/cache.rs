//! Caller-owned result cache keyed by source identifier.
//!
//! Decoding is deterministic, so a cached entry is interchangeable with a
//! fresh decode of the same bytes and transform. The cache holds at most
//! `capacity` entries and evicts the least recently used one on overflow.

use std::num::NonZeroUsize;
use std::sync::Arc;

use lru::LruCache;

use crate::ShapeFile;

/// Default number of cached sources.
pub const DEFAULT_CACHE_CAPACITY: usize = 20;

/// Bounded LRU cache of decoded shapefiles.
///
/// # Examples
/// ```
/// use shpjson_core::{ShapeCache, parse_shp};
///
/// let mut bytes = vec![0u8; 100];
/// bytes[24..28].copy_from_slice(&50u32.to_be_bytes());
/// bytes[32..36].copy_from_slice(&5i32.to_le_bytes());
///
/// let mut cache = ShapeCache::new(2);
/// let first = cache.get_or_try_insert_with("parcels.shp", || parse_shp(&bytes))?;
/// let second = cache.get_or_try_insert_with("parcels.shp", || parse_shp(&bytes))?;
/// assert!(std::sync::Arc::ptr_eq(&first, &second));
/// assert_eq!(cache.hits(), 1);
/// # Ok::<(), shpjson_core::ShpError>(())
/// ```
#[derive(Debug)]
pub struct ShapeCache {
    entries: LruCache<String, Arc<ShapeFile>>,
    hits: u64,
    misses: u64,
}

impl Default for ShapeCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

impl ShapeCache {
    /// A capacity of 0 is raised to 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: LruCache::new(capacity),
            hits: 0,
            misses: 0,
        }
    }

    pub fn capacity(&self) -> usize {
        self.entries.cap().get()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains(key)
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    /// Look up `key`, marking it most recently used on a hit.
    pub fn get(&mut self, key: &str) -> Option<Arc<ShapeFile>> {
        match self.entries.get(key) {
            Some(entry) => {
                self.hits += 1;
                Some(Arc::clone(entry))
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Insert or replace the entry for `key` (last writer wins).
    pub fn insert(&mut self, key: impl Into<String>, shapes: ShapeFile) -> Arc<ShapeFile> {
        let key = key.into();
        let entry = Arc::new(shapes);
        // `push` also hands back the old value when `key` was already cached.
        if let Some((evicted, _)) = self.entries.push(key.clone(), Arc::clone(&entry)) {
            if evicted != key {
                tracing::debug!(key = %evicted, "evicted cached shapefile");
            }
        }
        entry
    }

    /// Return the cached entry or run `decode` and cache its success.
    ///
    /// # Errors
    /// Propagates the error of `decode`; nothing is cached in that case.
    pub fn get_or_try_insert_with<E, F>(&mut self, key: &str, decode: F) -> Result<Arc<ShapeFile>, E>
    where
        F: FnOnce() -> Result<ShapeFile, E>,
    {
        if let Some(entry) = self.get(key) {
            return Ok(entry);
        }
        let shapes = decode()?;
        Ok(self.insert(key, shapes))
    }

    pub fn remove(&mut self, key: &str) -> Option<Arc<ShapeFile>> {
        self.entries.pop(key)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
