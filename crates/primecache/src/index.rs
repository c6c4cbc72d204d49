//! Hash index: chained buckets over the entry arena
//!
//! The index knows nothing about recency. It maps keys to entry ids, keeps
//! the item count, and resizes the bucket array after every structural
//! change:
//!
//! - load `>= 0.7`: grow to at least `2 * items` buckets
//! - load `<= 0.3`: shrink to at least `items / 2` buckets
//!
//! The minimum is rounded up to a prime (or an even number past the prime
//! table), a fresh bucket array is filled from the old chains, and then
//! swapped in. Entry ids and recency links are untouched by a rehash.

use tracing::debug;

use crate::entry::{Entry, Slab, NIL};
use crate::hash::prime_weighted_hash;
use crate::primes::{bucket_size_for, primes};

/// Bucket counts below this are always acceptable, whatever the load
pub const SMALL_TABLE_LIMIT: usize = 100;

/// Outcome of [`HashIndex::insert_or_update`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Upsert {
    /// A new entry was created
    Inserted(usize),
    /// The key was present and its value overwritten
    Updated(usize),
}

/// Chained hash index
pub struct HashIndex {
    buckets: Vec<usize>,
    item_count: usize,
    primes: &'static [u64],
}

impl HashIndex {
    /// Create an empty index with exactly `bucket_size` buckets
    pub fn new(bucket_size: usize) -> Self {
        assert!(bucket_size > 0, "bucket size must be positive");

        Self {
            buckets: vec![NIL; bucket_size],
            item_count: 0,
            primes: primes(),
        }
    }

    /// Number of indexed entries
    pub fn len(&self) -> usize {
        self.item_count
    }

    /// Current bucket count
    pub fn bucket_size(&self) -> usize {
        self.buckets.len()
    }

    /// Find the entry for `key`
    pub fn lookup<V>(&self, slab: &Slab<V>, key: &str) -> Option<usize> {
        self.check_size();
        self.find(slab, prime_weighted_hash(key, self.primes), key)
    }

    /// Overwrite the value for `key`, or prepend a new entry to its bucket
    pub fn insert_or_update<V>(&mut self, slab: &mut Slab<V>, key: String, value: V) -> Upsert {
        self.check_size();

        let hash = prime_weighted_hash(&key, self.primes);
        if let Some(id) = self.find(slab, hash, &key) {
            slab[id].value = value;
            return Upsert::Updated(id);
        }

        let bucket = self.bucket_of(hash);

        let mut entry = Entry::new(key, value, hash);
        entry.chain_next = self.buckets[bucket];
        let id = slab.insert(entry);

        self.buckets[bucket] = id;
        self.item_count += 1;
        self.maybe_resize(slab);

        Upsert::Inserted(id)
    }

    /// Unlink the entry for `key` from its chain.
    ///
    /// The entry stays in the slab; the caller releases it once every other
    /// structure has let go of it.
    pub fn remove<V>(&mut self, slab: &mut Slab<V>, key: &str) -> Option<usize> {
        let hash = prime_weighted_hash(key, self.primes);
        self.unlink(slab, hash, |_, entry| entry.hash == hash && entry.key == key)
    }

    /// Unlink a known live entry from its chain
    pub fn detach<V>(&mut self, slab: &mut Slab<V>, id: usize) {
        let hash = slab[id].hash;
        let found = self.unlink(slab, hash, |candidate, _| candidate == id);
        assert!(found.is_some(), "entry {} missing from its bucket chain", id);
    }

    /// Drop every chain and start over with `bucket_size` buckets
    pub fn reset(&mut self, bucket_size: usize) {
        assert!(bucket_size > 0, "bucket size must be positive");

        self.buckets = vec![NIL; bucket_size];
        self.item_count = 0;
    }

    fn find<V>(&self, slab: &Slab<V>, hash: u64, key: &str) -> Option<usize> {
        let mut id = self.buckets[self.bucket_of(hash)];
        while id != NIL {
            let entry = &slab[id];
            if entry.hash == hash && entry.key == key {
                return Some(id);
            }
            id = entry.chain_next;
        }
        None
    }

    fn bucket_of(&self, hash: u64) -> usize {
        (hash % self.buckets.len() as u64) as usize
    }

    /// Panics unless the bucket count is small or at least 30% loaded
    fn check_size(&self) {
        let size = self.bucket_size();
        assert!(
            size < SMALL_TABLE_LIMIT || self.item_count * 10 >= size * 3,
            "unreasonable bucket size {} for {} items",
            size,
            self.item_count
        );
    }

    fn unlink<V>(
        &mut self,
        slab: &mut Slab<V>,
        hash: u64,
        matches: impl Fn(usize, &Entry<V>) -> bool,
    ) -> Option<usize> {
        let bucket = self.bucket_of(hash);
        let mut prev = NIL;
        let mut id = self.buckets[bucket];

        while id != NIL {
            if matches(id, &slab[id]) {
                break;
            }
            prev = id;
            id = slab[id].chain_next;
        }
        if id == NIL {
            return None;
        }

        let next = slab[id].chain_next;
        if prev == NIL {
            self.buckets[bucket] = next;
        } else {
            slab[prev].chain_next = next;
        }
        slab[id].chain_next = NIL;

        self.item_count -= 1;
        self.maybe_resize(slab);

        Some(id)
    }

    fn maybe_resize<V>(&mut self, slab: &mut Slab<V>) {
        let size = self.bucket_size();
        let target = if self.item_count * 10 >= size * 7 {
            self.item_count * 2
        } else if self.item_count * 10 <= size * 3 {
            self.item_count / 2
        } else {
            return;
        };

        let new_size = bucket_size_for(self.primes, target);
        if new_size != size {
            self.rehash(slab, new_size);
        }
    }

    fn rehash<V>(&mut self, slab: &mut Slab<V>, new_size: usize) {
        let mut buckets = vec![NIL; new_size];

        for &head in &self.buckets {
            let mut id = head;
            while id != NIL {
                let entry = &mut slab[id];
                let next = entry.chain_next;
                let bucket = (entry.hash % new_size as u64) as usize;

                entry.chain_next = buckets[bucket];
                buckets[bucket] = id;
                id = next;
            }
        }

        debug!(
            from = self.buckets.len(),
            to = new_size,
            items = self.item_count,
            "rehashed bucket array"
        );
        self.buckets = buckets;
    }

    /// Every entry id reachable from the buckets, in bucket order
    #[cfg(test)]
    pub fn chained_ids<V>(&self, slab: &Slab<V>) -> Vec<usize> {
        let mut ids = Vec::new();
        for &head in &self.buckets {
            let mut id = head;
            while id != NIL {
                ids.push(id);
                id = slab[id].chain_next;
            }
        }
        ids
    }
}
