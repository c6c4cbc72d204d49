//! Entry arena
//!
//! Entries live in a slab and are addressed by stable `usize` ids. The bucket
//! chains and the recency list link entries by id, with `NIL` as "none", so
//! removing an entry can never leave a dangling reference behind.

use std::ops::{Index, IndexMut};

/// Sentinel id marking the end of a chain or list
pub const NIL: usize = usize::MAX;

/// One stored association
#[derive(Debug)]
pub struct Entry<V> {
    pub key: String,
    pub value: V,
    /// Full hash of `key`, kept so a rehash only recomputes the modulus
    pub hash: u64,
    /// Next entry in the same bucket
    pub chain_next: usize,
    /// Neighbour touched just before this one
    pub older: usize,
    /// Neighbour touched just after this one
    pub newer: usize,
}

impl<V> Entry<V> {
    pub fn new(key: String, value: V, hash: u64) -> Self {
        Self {
            key,
            value,
            hash,
            chain_next: NIL,
            older: NIL,
            newer: NIL,
        }
    }
}

/// Arena of entries with slot reuse
#[derive(Debug)]
pub struct Slab<V> {
    slots: Vec<Option<Entry<V>>>,
    free_list: Vec<usize>,
}

impl<V> Slab<V> {
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Store an entry and return its id
    pub fn insert(&mut self, entry: Entry<V>) -> usize {
        if let Some(id) = self.free_list.pop() {
            self.slots[id] = Some(entry);
            id
        } else {
            self.slots.push(Some(entry));
            self.slots.len() - 1
        }
    }

    /// Release a live entry; its id may be handed out again
    pub fn remove(&mut self, id: usize) -> Entry<V> {
        match self.slots.get_mut(id).and_then(Option::take) {
            Some(entry) => {
                self.free_list.push(id);
                entry
            }
            None => panic!("entry {} is not live", id),
        }
    }

    /// Number of live entries
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
    }

    /// Live entries in slot order
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Entry<V>)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(id, slot)| slot.as_ref().map(|entry| (id, entry)))
    }
}

impl<V> Index<usize> for Slab<V> {
    type Output = Entry<V>;

    fn index(&self, id: usize) -> &Entry<V> {
        match self.slots.get(id) {
            Some(Some(entry)) => entry,
            _ => panic!("entry {} is not live", id),
        }
    }
}

impl<V> IndexMut<usize> for Slab<V> {
    fn index_mut(&mut self, id: usize) -> &mut Entry<V> {
        match self.slots.get_mut(id) {
            Some(Some(entry)) => entry,
            _ => panic!("entry {} is not live", id),
        }
    }
}
