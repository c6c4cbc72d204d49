//! Cache configuration

use crate::error::{Error, Result};
use crate::index::SMALL_TABLE_LIMIT;
use crate::primes::{bucket_size_for, primes};

/// Bucket count a new table starts with
pub const DEFAULT_INITIAL_BUCKETS: usize = 97;

/// Settings for an [`LruCache`](crate::LruCache)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of retained entries; 0 rejects every insert
    pub capacity: usize,

    /// Requested starting bucket count, rounded up to a prime
    pub initial_buckets: usize,

    /// Whether a `get` hit counts as a use for eviction order
    pub touch_on_read: bool,
}

impl CacheConfig {
    /// Default settings for the given capacity
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            initial_buckets: DEFAULT_INITIAL_BUCKETS,
            touch_on_read: true,
        }
    }

    /// Set the starting bucket count
    pub fn with_initial_buckets(mut self, initial_buckets: usize) -> Self {
        self.initial_buckets = initial_buckets;
        self
    }

    /// Choose whether reads refresh recency
    pub fn with_touch_on_read(mut self, touch_on_read: bool) -> Self {
        self.touch_on_read = touch_on_read;
        self
    }

    /// Check that the settings describe a usable cache
    pub fn validate(&self) -> Result<()> {
        resolve_initial_buckets(self.initial_buckets).map(|_| ())
    }
}

/// Round a requested starting bucket count up to a prime.
///
/// An empty table must be small to pass the load check, so anything that
/// resolves to `SMALL_TABLE_LIMIT` or more is rejected, as is zero.
pub(crate) fn resolve_initial_buckets(requested: usize) -> Result<usize> {
    if requested == 0 {
        return Err(Error::InvalidBucketSize(requested));
    }

    let size = bucket_size_for(primes(), requested);
    if size >= SMALL_TABLE_LIMIT {
        return Err(Error::InvalidBucketSize(requested));
    }
    Ok(size)
}
