//! LruCache: hash index plus recency list over one entry arena

use std::fmt;

use tracing::trace;

use crate::config::{resolve_initial_buckets, CacheConfig, DEFAULT_INITIAL_BUCKETS};
use crate::entry::Slab;
use crate::error::Result;
use crate::index::{HashIndex, Upsert};
use crate::recency::RecencyList;
use crate::stats::CacheStats;

/// String-keyed cache holding at most `capacity` entries.
///
/// Every entry sits in exactly one bucket chain and, while listed, in one
/// position of the recency list. Entries are only created and destroyed
/// here, so both structures always change together: an eviction removes the
/// victim from the recency list, the hash index and the arena in one step.
pub struct LruCache<V> {
    slab: Slab<V>,
    index: HashIndex,
    recency: RecencyList,
    config: CacheConfig,
    initial_buckets: usize,
    stats: CacheStats,
}

impl<V> LruCache<V> {
    /// Create a cache with default settings
    ///
    /// # Arguments
    /// * `capacity` - Maximum number of entries; 0 stores nothing
    pub fn new(capacity: usize) -> Self {
        Self::build(CacheConfig::new(capacity), DEFAULT_INITIAL_BUCKETS)
    }

    /// Create a cache from explicit settings
    ///
    /// # Errors
    /// * `Error::InvalidBucketSize` - initial bucket count cannot hold an empty table
    pub fn with_config(config: CacheConfig) -> Result<Self> {
        let bucket_size = resolve_initial_buckets(config.initial_buckets)?;
        Ok(Self::build(config, bucket_size))
    }

    fn build(config: CacheConfig, bucket_size: usize) -> Self {
        Self {
            slab: Slab::new(),
            index: HashIndex::new(bucket_size),
            recency: RecencyList::new(),
            config,
            initial_buckets: bucket_size,
            stats: CacheStats::new(),
        }
    }

    /// Insert or overwrite a value and mark it most recently used.
    ///
    /// Inserting a new key into a full cache evicts the least recently used
    /// entry first. Returns `true` if the key was new.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> bool {
        if self.config.capacity == 0 {
            return false;
        }

        match self.index.insert_or_update(&mut self.slab, key.into(), value) {
            Upsert::Updated(id) => {
                self.recency.touch(&mut self.slab, id);
                self.stats.record_update();
                false
            }
            Upsert::Inserted(id) => {
                if self.index.len() > self.config.capacity {
                    self.evict_oldest();
                }
                self.recency.touch(&mut self.slab, id);
                self.stats.record_insert();
                true
            }
        }
    }

    /// Get a value, refreshing its recency when `touch_on_read` is set
    pub fn get(&mut self, key: &str) -> Option<&V> {
        match self.index.lookup(&self.slab, key) {
            Some(id) => {
                self.stats.record_hit();
                if self.config.touch_on_read {
                    self.recency.touch(&mut self.slab, id);
                }
                Some(&self.slab[id].value)
            }
            None => {
                self.stats.record_miss();
                None
            }
        }
    }

    /// Get a value without affecting recency or statistics
    pub fn peek(&self, key: &str) -> Option<&V> {
        self.index
            .lookup(&self.slab, key)
            .map(|id| &self.slab[id].value)
    }

    /// Remove `key`. Returns `false` if it was not present.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.remove(&mut self.slab, key) {
            Some(id) => {
                self.recency.remove(&mut self.slab, id);
                self.slab.remove(id);
                self.stats.record_removal();
                true
            }
            None => false,
        }
    }

    /// Check whether `key` is cached, without touching it
    pub fn contains(&self, key: &str) -> bool {
        self.index.lookup(&self.slab, key).is_some()
    }

    /// Number of cached entries
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the cache is empty
    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    /// Get cache capacity
    pub fn capacity(&self) -> usize {
        self.config.capacity
    }

    /// Current number of hash buckets
    pub fn bucket_size(&self) -> usize {
        self.index.bucket_size()
    }

    /// Settings this cache was built with
    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    /// Get cache statistics
    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Zero the statistics counters
    pub fn reset_stats(&mut self) {
        self.stats.reset();
    }

    /// Drop every entry; statistics are kept
    pub fn clear(&mut self) {
        self.slab.clear();
        self.index.reset(self.initial_buckets);
        self.recency.clear();
    }

    /// Iterate from most to least recently used
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> + '_ {
        self.recency.iter(&self.slab).map(move |id| {
            let entry = &self.slab[id];
            (entry.key.as_str(), &entry.value)
        })
    }

    fn evict_oldest(&mut self) {
        if let Some(id) = self.recency.evict_oldest(&mut self.slab) {
            self.index.detach(&mut self.slab, id);
            let entry = self.slab.remove(id);
            self.stats.record_eviction();
            trace!(key = %entry.key, "evicted least recently used entry");
        }
    }
}

impl<V> fmt::Display for LruCache<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "buckets: {}, items: {}, capacity: {}",
            self.bucket_size(),
            self.len(),
            self.capacity()
        )
    }
}
