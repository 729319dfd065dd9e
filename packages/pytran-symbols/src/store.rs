//! Bucket-chained hash store for identifier entries.

use std::cell::Cell;

use la_arena::{Arena, Idx};
use smol_str::SmolStr;
use thiserror::Error;

use crate::entry::IdentifierEntry;

pub type EntryId = Idx<IdentifierEntry>;

/// Load factor above which the bucket array doubles.
pub const LOAD_FACTOR_THRESHOLD: f64 = 0.75;

const INITIAL_CAPACITY: usize = 8;

/// Attempted to insert a name that is already present in the same store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("identifier `{name}` is already declared in this scope")]
pub struct DuplicateName {
    pub name: SmolStr,
    /// (line, column) of the existing declaration.
    pub previous: (u32, u32),
}

/// Hash table mapping identifier names to declaration entries.
///
/// Entries live in an insertion-ordered arena; buckets chain arena indices.
/// Rehashing rebuilds the buckets by walking the arena, so intra-bucket order
/// always follows the global insertion order.
#[derive(Debug)]
pub struct HashStore {
    entries: Arena<IdentifierEntry>,
    buckets: Vec<Vec<EntryId>>,
    insertions: u64,
    collisions: u64,
    searches: Cell<u64>,
    probes: Cell<u64>,
}

impl Default for HashStore {
    fn default() -> Self {
        Self::new()
    }
}

impl HashStore {
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Capacity is rounded up to a power of two, minimum 2.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(2).next_power_of_two();
        Self {
            entries: Arena::new(),
            buckets: vec![Vec::new(); capacity],
            insertions: 0,
            collisions: 0,
            searches: Cell::new(0),
            probes: Cell::new(0),
        }
    }

    /// Polynomial rolling hash, base 31, masked to 31 bits at every step.
    /// Must be applied identically on insert and lookup; it is the addressing
    /// function, not a convenience.
    fn bucket_index(name: &str, capacity: usize) -> usize {
        let mut h: u64 = 0;
        for ch in name.chars() {
            h = (h * 31 + ch as u64) & 0x7FFF_FFFF;
        }
        h as usize % capacity
    }

    pub fn insert(&mut self, entry: IdentifierEntry) -> Result<EntryId, DuplicateName> {
        if let Some(existing) = self.lookup(&entry.name) {
            return Err(DuplicateName {
                name: existing.name.clone(),
                previous: existing.declared_at,
            });
        }
        if self.load_factor() >= LOAD_FACTOR_THRESHOLD {
            self.grow();
        }
        let bucket = Self::bucket_index(&entry.name, self.capacity());
        let id = self.entries.alloc(entry);
        self.buckets[bucket].push(id);
        self.probes.set(self.probes.get() + 1);
        self.insertions += 1;
        if self.buckets[bucket].len() > 1 {
            self.collisions += 1;
        }
        Ok(id)
    }

    /// Overwrite the entry for `entry.name` in place, keeping its position in
    /// both the bucket chain and the global insertion order. Returns `None`
    /// if the name is absent.
    pub fn replace(&mut self, entry: IdentifierEntry) -> Option<EntryId> {
        let bucket = Self::bucket_index(&entry.name, self.capacity());
        let id = self.buckets[bucket]
            .iter()
            .copied()
            .find(|&id| self.entries[id].name == entry.name)?;
        self.entries[id] = entry;
        Some(id)
    }

    pub fn lookup(&self, name: &str) -> Option<&IdentifierEntry> {
        self.searches.set(self.searches.get() + 1);
        let bucket = &self.buckets[Self::bucket_index(name, self.capacity())];
        for &id in bucket {
            self.probes.set(self.probes.get() + 1);
            let entry = &self.entries[id];
            if entry.name == name {
                return Some(entry);
            }
        }
        None
    }

    /// All entries in global insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &IdentifierEntry> {
        self.entries.iter().map(|(_, entry)| entry)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.buckets.len()
    }

    pub fn load_factor(&self) -> f64 {
        self.len() as f64 / self.capacity() as f64
    }

    /// Chain length of every bucket, including empty ones.
    pub fn chain_lengths(&self) -> impl Iterator<Item = usize> + '_ {
        self.buckets.iter().map(Vec::len)
    }

    pub fn insertions(&self) -> u64 {
        self.insertions
    }

    pub fn collisions(&self) -> u64 {
        self.collisions
    }

    pub fn searches(&self) -> u64 {
        self.searches.get()
    }

    pub fn probes(&self) -> u64 {
        self.probes.get()
    }

    fn grow(&mut self) {
        let new_capacity = self.capacity() * 2;
        let mut buckets = vec![Vec::new(); new_capacity];
        for (id, entry) in self.entries.iter() {
            buckets[Self::bucket_index(&entry.name, new_capacity)].push(id);
        }
        self.buckets = buckets;
    }
}
