//! Plain hash table without eviction

use std::fmt;

use crate::config::{resolve_initial_buckets, DEFAULT_INITIAL_BUCKETS};
use crate::entry::Slab;
use crate::error::Result;
use crate::index::{HashIndex, Upsert};

/// String-keyed hash table with prime-sized, self-resizing buckets.
///
/// Unbounded: entries leave only through [`delete`](HashTable::delete).
/// Use [`LruCache`](crate::LruCache) for a capacity bound.
pub struct HashTable<V> {
    slab: Slab<V>,
    index: HashIndex,
    initial_buckets: usize,
}

impl<V> HashTable<V> {
    /// Create an empty table with the default 97 buckets
    pub fn new() -> Self {
        Self::build(DEFAULT_INITIAL_BUCKETS)
    }

    /// Create an empty table starting from the smallest prime `>= requested`
    ///
    /// # Errors
    /// * `Error::InvalidBucketSize` - `requested` is 0 or resolves to 100 or more
    pub fn with_initial_buckets(requested: usize) -> Result<Self> {
        Ok(Self::build(resolve_initial_buckets(requested)?))
    }

    fn build(bucket_size: usize) -> Self {
        Self {
            slab: Slab::new(),
            index: HashIndex::new(bucket_size),
            initial_buckets: bucket_size,
        }
    }

    /// Insert or overwrite a value.
    ///
    /// Returns `true` if the key was new, `false` if an existing value was
    /// replaced.
    pub fn put(&mut self, key: impl Into<String>, value: V) -> bool {
        matches!(
            self.index.insert_or_update(&mut self.slab, key.into(), value),
            Upsert::Inserted(_)
        )
    }

    /// Get the value stored for `key`
    pub fn get(&self, key: &str) -> Option<&V> {
        self.index
            .lookup(&self.slab, key)
            .map(|id| &self.slab[id].value)
    }

    /// Remove `key`. Returns `false` if it was not present.
    pub fn delete(&mut self, key: &str) -> bool {
        match self.index.remove(&mut self.slab, key) {
            Some(id) => {
                self.slab.remove(id);
                true
            }
            None => false,
        }
    }

    /// Check whether `key` is present
    pub fn contains(&self, key: &str) -> bool {
        self.index.lookup(&self.slab, key).is_some()
    }

    /// Number of stored entries
    #[doc(alias = "size")]
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.index.len() == 0
    }

    /// Current number of buckets
    pub fn bucket_size(&self) -> usize {
        self.index.bucket_size()
    }

    /// Drop every entry and return to the initial bucket count
    pub fn clear(&mut self) {
        self.slab.clear();
        self.index.reset(self.initial_buckets);
    }

    /// Iterate over all entries in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.slab
            .iter()
            .map(|(_, entry)| (entry.key.as_str(), &entry.value))
    }
}

impl<V> Default for HashTable<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> fmt::Display for HashTable<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "buckets: {}, items: {}", self.bucket_size(), self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use ahash::AHashMap;
    use proptest::prelude::*;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_functional() {
        let mut table = HashTable::new();

        assert!(table.put("aaa", 1));
        assert_eq!(table.get("aaa"), Some(&1));
        assert_eq!(table.len(), 1);

        assert!(table.put("bbb", 2));
        assert!(table.put("ccc", 3));
        assert!(table.put("ddd", 4));
        assert_eq!(table.get("aaa"), Some(&1));
        assert_eq!(table.get("bbb"), Some(&2));
        assert_eq!(table.get("ccc"), Some(&3));
        assert_eq!(table.get("ddd"), Some(&4));
        assert_eq!(table.get("a"), None);
        assert_eq!(table.get("aa"), None);
        assert_eq!(table.get("aaaa"), None);
        assert_eq!(table.len(), 4);

        assert!(!table.put("aaa", 11));
        assert_eq!(table.get("aaa"), Some(&11));
        assert_eq!(table.len(), 4);

        assert!(table.delete("aaa"));
        assert_eq!(table.get("aaa"), None);
        assert_eq!(table.len(), 3);

        assert!(!table.delete("a"));
        assert!(!table.delete("aa"));
        assert!(!table.delete("aaa"));
        assert!(!table.delete("aaaa"));

        assert!(table.delete("ddd"));
        assert!(table.delete("ccc"));
        assert!(table.delete("bbb"));
        assert_eq!(table.get("bbb"), None);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_permuted_keys() {
        let mut table = HashTable::new();
        let keys = ["abc", "acb", "bac", "bca", "cab", "cba"];

        for (i, key) in keys.iter().enumerate() {
            assert!(table.put(*key, i));
        }
        for (i, key) in keys.iter().enumerate() {
            assert_eq!(table.get(key), Some(&i));
        }
        assert_eq!(table.len(), 6);

        for key in ["abc", "cba", "bac", "bca", "acb", "cab"] {
            assert!(table.delete(key));
        }
        assert!(table.is_empty());
    }

    #[test]
    fn test_empty_key() {
        let mut table = HashTable::new();

        assert!(table.put("", "empty"));
        assert!(table.put("a", "a"));
        assert_eq!(table.get(""), Some(&"empty"));
        assert!(!table.put("", "still empty"));
        assert_eq!(table.get(""), Some(&"still empty"));
        assert!(table.delete(""));
        assert_eq!(table.get(""), None);
        assert_eq!(table.get("a"), Some(&"a"));
    }

    #[test]
    fn test_random_keys_round_trip() {
        let mut rng = StdRng::seed_from_u64(7);
        let keys: Vec<String> = (0..1_000)
            .map(|_| rng.gen_range(0..=100_000_000u32).to_string())
            .collect();

        let mut table = HashTable::new();
        for key in &keys {
            table.put(key.clone(), key.clone());
        }
        for key in &keys {
            assert_eq!(table.get(key), Some(key));
        }

        for key in &keys {
            table.delete(key);
        }
        assert_eq!(table.len(), 0);
        for key in &keys {
            assert_eq!(table.get(key), None);
        }
    }

    #[test]
    fn test_resize_is_transparent() {
        let mut table = HashTable::new();
        let mut sizes = vec![table.bucket_size()];

        for i in 0..3_000 {
            table.put(format!("k{}", i), i);
            if *sizes.last().unwrap() != table.bucket_size() {
                sizes.push(table.bucket_size());
            }
        }
        assert!(sizes.len() > 5);
        for i in 0..3_000 {
            assert_eq!(table.get(&format!("k{}", i)), Some(&i));
        }
    }

    #[test]
    fn test_iter_and_clear() {
        let mut table = HashTable::new();
        for i in 0..50 {
            table.put(i.to_string(), i);
        }

        let mut seen: Vec<i32> = table.iter().map(|(_, v)| *v).collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..50).collect::<Vec<_>>());

        table.clear();
        assert!(table.is_empty());
        assert_eq!(table.bucket_size(), 97);
        assert!(!table.contains("1"));
        assert!(table.put("1", 1));
    }

    #[test]
    fn test_initial_buckets() {
        let table: HashTable<()> = HashTable::with_initial_buckets(20).unwrap();
        assert_eq!(table.bucket_size(), 23);
        assert_eq!(table.to_string(), "buckets: 23, items: 0");

        assert!(matches!(
            HashTable::<()>::with_initial_buckets(0),
            Err(Error::InvalidBucketSize(0))
        ));
        assert!(HashTable::<()>::with_initial_buckets(101).is_err());
    }

    #[derive(Clone, Debug)]
    enum Op {
        Put(String, u32),
        Get(String),
        Delete(String),
    }

    fn op_strategy() -> impl Strategy<Value = Op> {
        let key = "[a-d]{0,3}";
        prop_oneof![
            (key, any::<u32>()).prop_map(|(k, v)| Op::Put(k, v)),
            key.prop_map(Op::Get),
            key.prop_map(Op::Delete),
        ]
    }

    proptest! {
        #[test]
        fn prop_matches_map_model(ops in proptest::collection::vec(op_strategy(), 0..300)) {
            let mut table = HashTable::new();
            let mut model: AHashMap<String, u32> = AHashMap::new();

            for op in ops {
                match op {
                    Op::Put(k, v) => {
                        let inserted = model.insert(k.clone(), v).is_none();
                        prop_assert_eq!(table.put(k, v), inserted);
                    }
                    Op::Get(k) => prop_assert_eq!(table.get(&k), model.get(&k)),
                    Op::Delete(k) => {
                        prop_assert_eq!(table.delete(&k), model.remove(&k).is_some());
                    }
                }
                prop_assert_eq!(table.len(), model.len());
            }
        }
    }
}
