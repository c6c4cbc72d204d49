//! Recency list threaded through the entry arena
//!
//! A doubly linked list over entry ids, oldest at one end and newest at the
//! other. It decides which entry to evict but never frees anything itself:
//! the cache removes the victim from the hash index and the slab.

use crate::entry::{Slab, NIL};

/// Touch order of live entries
#[derive(Debug)]
pub struct RecencyList {
    oldest: usize,
    newest: usize,
}

impl RecencyList {
    pub fn new() -> Self {
        Self {
            oldest: NIL,
            newest: NIL,
        }
    }

    /// Move `id` to the newest end, linking it in if it is not listed yet
    pub fn touch<V>(&mut self, slab: &mut Slab<V>, id: usize) {
        if self.newest == id {
            return;
        }
        if self.contains(slab, id) {
            self.unlink(slab, id);
        }

        let entry = &mut slab[id];
        entry.older = self.newest;
        entry.newer = NIL;

        match self.newest {
            NIL => self.oldest = id,
            newest => slab[newest].newer = id,
        }
        self.newest = id;
    }

    /// Unlink and return the least recently touched entry
    pub fn evict_oldest<V>(&mut self, slab: &mut Slab<V>) -> Option<usize> {
        if self.oldest == NIL {
            return None;
        }
        let id = self.oldest;
        self.unlink(slab, id);
        Some(id)
    }

    /// Unlink `id` wherever it sits; no-op if it is not listed
    pub fn remove<V>(&mut self, slab: &mut Slab<V>, id: usize) {
        if self.contains(slab, id) {
            self.unlink(slab, id);
        }
    }

    pub fn clear(&mut self) {
        self.oldest = NIL;
        self.newest = NIL;
    }

    /// Entry ids from newest to oldest
    pub fn iter<'a, V>(&self, slab: &'a Slab<V>) -> impl Iterator<Item = usize> + 'a {
        let start = (self.newest != NIL).then_some(self.newest);
        std::iter::successors(start, move |&id| {
            let older = slab[id].older;
            (older != NIL).then_some(older)
        })
    }

    // Every listed entry except the oldest has an older neighbour.
    fn contains<V>(&self, slab: &Slab<V>, id: usize) -> bool {
        self.oldest == id || slab[id].older != NIL
    }

    fn unlink<V>(&mut self, slab: &mut Slab<V>, id: usize) {
        let (older, newer) = {
            let entry = &slab[id];
            (entry.older, entry.newer)
        };

        match older {
            NIL => self.oldest = newer,
            older => slab[older].newer = newer,
        }
        match newer {
            NIL => self.newest = older,
            newer => slab[newer].older = older,
        }

        let entry = &mut slab[id];
        entry.older = NIL;
        entry.newer = NIL;
    }
}
