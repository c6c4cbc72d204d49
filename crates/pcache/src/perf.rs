//! Load test: timed batches of random puts and gets
//!
//! Each batch reseeds the RNG with its iteration number, so the delete
//! phase can regenerate exactly the keys that were inserted.

use std::io::Write;
use std::time::Instant;

use anyhow::{bail, Result};
use primecache::{HashTable, LruCache};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::info;

/// Largest random key value, inclusive
const KEY_RANGE_MAX: u32 = 100_000_000;

/// Settings for one load test
#[derive(Debug, Clone)]
pub struct PerfOptions {
    pub iterations: u64,
    pub batch: usize,
    pub capacity: Option<usize>,
}

/// Operations the load test needs from a container
trait Store {
    fn put(&mut self, key: String, value: String) -> bool;
    fn get(&mut self, key: &str) -> bool;
    fn delete(&mut self, key: &str) -> bool;
    fn len(&self) -> usize;
    fn bucket_size(&self) -> usize;
}

impl Store for HashTable<String> {
    fn put(&mut self, key: String, value: String) -> bool {
        HashTable::put(self, key, value)
    }

    fn get(&mut self, key: &str) -> bool {
        HashTable::get(self, key).is_some()
    }

    fn delete(&mut self, key: &str) -> bool {
        HashTable::delete(self, key)
    }

    fn len(&self) -> usize {
        HashTable::len(self)
    }

    fn bucket_size(&self) -> usize {
        HashTable::bucket_size(self)
    }
}

impl Store for LruCache<String> {
    fn put(&mut self, key: String, value: String) -> bool {
        LruCache::put(self, key, value)
    }

    fn get(&mut self, key: &str) -> bool {
        LruCache::get(self, key).is_some()
    }

    fn delete(&mut self, key: &str) -> bool {
        LruCache::delete(self, key)
    }

    fn len(&self) -> usize {
        LruCache::len(self)
    }

    fn bucket_size(&self) -> usize {
        LruCache::bucket_size(self)
    }
}

/// Run the load test, writing `<iteration> <seconds>` per batch to `out`
pub fn run<W: Write>(options: &PerfOptions, out: &mut W) -> Result<()> {
    match options.capacity {
        Some(capacity) => {
            info!("Load testing LRU cache with capacity {}", capacity);
            drive(LruCache::new(capacity), options, out)
        }
        None => {
            info!("Load testing plain hash table");
            drive(HashTable::new(), options, out)
        }
    }
}

fn batch_keys(seed: u64, batch: usize) -> impl Iterator<Item = String> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..batch).map(move |_| rng.gen_range(0..=KEY_RANGE_MAX).to_string())
}

fn drive<S: Store, W: Write>(mut store: S, options: &PerfOptions, out: &mut W) -> Result<()> {
    for iteration in 0..options.iterations {
        let begin = Instant::now();
        for key in batch_keys(iteration, options.batch) {
            store.put(key.clone(), key);
        }
        let mut hits = 0usize;
        for key in batch_keys(iteration, options.batch) {
            hits += usize::from(store.get(&key));
        }
        writeln!(out, "{} {:.6}", iteration, begin.elapsed().as_secs_f64())?;

        if hits < options.batch {
            info!("Batch {}: {} of {} keys found", iteration, hits, options.batch);
        }
    }

    info!(
        "Loaded {} items into {} buckets",
        store.len(),
        store.bucket_size()
    );

    let mut deleted = 0usize;
    for iteration in 0..options.iterations {
        for key in batch_keys(iteration, options.batch) {
            deleted += usize::from(store.delete(&key));
        }
    }

    if store.len() != 0 {
        bail!("{} items left after deleting every key", store.len());
    }
    info!("Deleted {} items, {} buckets remain", deleted, store.bucket_size());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_to_string(options: &PerfOptions) -> String {
        let mut out = Vec::new();
        run(options, &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn test_batch_keys_are_reproducible() {
        let first: Vec<String> = batch_keys(3, 50).collect();
        let second: Vec<String> = batch_keys(3, 50).collect();
        let other: Vec<String> = batch_keys(4, 50).collect();

        assert_eq!(first, second);
        assert_ne!(first, other);
        assert!(first
            .iter()
            .all(|k| k.parse::<u32>().unwrap() <= KEY_RANGE_MAX));
    }

    #[test]
    fn test_perf_plain_table() {
        let options = PerfOptions {
            iterations: 3,
            batch: 500,
            capacity: None,
        };
        let output = run_to_string(&options);

        let lines: Vec<&str> = output.lines().collect();
        assert_eq!(lines.len(), 3);
        for (i, line) in lines.iter().enumerate() {
            let (iteration, seconds) = line.split_once(' ').unwrap();
            assert_eq!(iteration.parse::<usize>().unwrap(), i);
            assert!(seconds.parse::<f64>().unwrap() >= 0.0);
        }
    }

    #[test]
    fn test_perf_lru_cache() {
        let options = PerfOptions {
            iterations: 2,
            batch: 300,
            capacity: Some(100),
        };
        let output = run_to_string(&options);
        assert_eq!(output.lines().count(), 2);
    }

    #[test]
    fn test_perf_zero_capacity() {
        let options = PerfOptions {
            iterations: 1,
            batch: 10,
            capacity: Some(0),
        };
        assert!(run(&options, &mut Vec::new()).is_ok());
    }
}
