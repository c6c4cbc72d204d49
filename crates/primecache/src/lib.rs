//! # primecache
//!
//! String-keyed hash table and LRU cache built on one entry arena.
//!
//! ## Architecture
//! - **Hash index**: chained buckets, prime bucket counts, rehash on load
//! - **Recency list**: doubly linked list threaded through the same entries
//! - **Arena**: entries addressed by stable ids instead of pointers
//!
//! [`HashTable`] uses the hash index alone. [`LruCache`] adds the recency
//! list and evicts the least recently used entry when over capacity.
//!
//! Neither type is thread-safe; wrap one in a lock to share it.

#![warn(missing_docs)]

mod cache;
mod config;
mod entry;
mod error;
mod hash;
mod index;
mod primes;
mod recency;
mod stats;
mod table;

pub use cache::LruCache;
pub use config::{CacheConfig, DEFAULT_INITIAL_BUCKETS};
pub use error::{Error, Result};
pub use stats::CacheStats;
pub use table::HashTable;
