//! Sharded in-memory store
//!
//! DashMap of key → slot, where a slot is either a plain value or a hash
//! of field → value.
//!
//! # Design
//!
//! - DashMap: 16-way sharded by default, reads take a shard read lock
//! - FxHashMap: hash fields, fast non-crypto hash
//! - One global `AtomicU64` stamps every write with a fresh version
//!
//! # Atomic update
//!
//! `update` obtains the key's slot through `DashMap::entry`, which holds the
//! shard write lock until the entry guard drops. The transform runs under
//! that lock, so no other write to the key can interleave between read and
//! write. The transform must not touch the store or it will deadlock on
//! its own shard.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use fieldpatch_core::{CasOutcome, Location, Storage, StorageError, Versioned};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

use crate::stored_value::StoredValue;

/// What a key holds
#[derive(Debug, Clone)]
enum Slot {
    Plain(StoredValue),
    Hash(FxHashMap<String, StoredValue>),
}

impl Slot {
    fn expect_plain(&self, key: &str) -> Result<&StoredValue, StorageError> {
        match self {
            Slot::Plain(v) => Ok(v),
            Slot::Hash(_) => Err(wrong_type(key, "plain")),
        }
    }

    fn expect_hash(&self, key: &str) -> Result<&FxHashMap<String, StoredValue>, StorageError> {
        match self {
            Slot::Hash(h) => Ok(h),
            Slot::Plain(_) => Err(wrong_type(key, "hash")),
        }
    }

    /// Stored value at `location` inside this slot
    fn lookup(&self, location: &Location) -> Result<Option<&StoredValue>, StorageError> {
        match location {
            Location::Key { key } => self.expect_plain(key).map(Some),
            Location::HashField { key, field } => Ok(self.expect_hash(key)?.get(field)),
        }
    }

    /// Write `value` at `location` inside this slot
    fn store(&mut self, location: &Location, text: String, version: u64) -> Result<(), StorageError> {
        match (self, location) {
            (Slot::Plain(v), Location::Key { .. }) => {
                v.replace(text, version);
                Ok(())
            }
            (Slot::Hash(h), Location::HashField { field, .. }) => {
                h.insert(field.clone(), StoredValue::new(text, version));
                Ok(())
            }
            (Slot::Hash(_), Location::Key { key }) => Err(wrong_type(key, "plain")),
            (Slot::Plain(_), Location::HashField { key, .. }) => Err(wrong_type(key, "hash")),
        }
    }

    /// Fresh slot holding only `value` at `location`
    fn fresh(location: &Location, text: String, version: u64) -> Self {
        match location {
            Location::Key { .. } => Slot::Plain(StoredValue::new(text, version)),
            Location::HashField { field, .. } => {
                let mut h = FxHashMap::default();
                h.insert(field.clone(), StoredValue::new(text, version));
                Slot::Hash(h)
            }
        }
    }
}

fn wrong_type(key: &str, expected: &'static str) -> StorageError {
    StorageError::WrongType {
        key: key.to_string(),
        expected,
    }
}

/// In-memory, thread-safe key-value store
///
/// Holds plain values and hashes side by side. Every write takes a version
/// from one counter, so versions are unique across keys and strictly
/// increase per location.
#[derive(Debug, Default)]
pub struct ShardedStore {
    slots: DashMap<String, Slot>,
    version: AtomicU64,
    closed: AtomicBool,
}

impl ShardedStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store sized for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        ShardedStore {
            slots: DashMap::with_capacity(capacity),
            version: AtomicU64::new(0),
            closed: AtomicBool::new(false),
        }
    }

    /// Number of keys (a hash counts once)
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if no key is stored
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Remove every key
    pub fn clear(&self) {
        self.slots.clear();
    }

    /// Increment version and return new value
    #[inline]
    fn next_version(&self) -> u64 {
        self.version.fetch_add(1, Ordering::AcqRel) + 1
    }

    #[inline]
    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed.load(Ordering::Acquire) {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

impl Storage for ShardedStore {
    fn get(&self, key: &str) -> Result<Option<Versioned<String>>, StorageError> {
        self.ensure_open()?;
        match self.slots.get(key) {
            Some(slot) => Ok(Some(slot.expect_plain(key)?.to_versioned())),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: String) -> Result<u64, StorageError> {
        self.ensure_open()?;
        // overwrites whatever the key held, hash included
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let version = self.next_version();
                occupied.insert(Slot::Plain(StoredValue::new(value, version)));
                Ok(version)
            }
            Entry::Vacant(vacant) => {
                let version = self.next_version();
                vacant.insert(Slot::Plain(StoredValue::new(value, version)));
                Ok(version)
            }
        }
    }

    fn hget(&self, key: &str, field: &str) -> Result<Option<Versioned<String>>, StorageError> {
        self.ensure_open()?;
        match self.slots.get(key) {
            Some(slot) => Ok(slot.expect_hash(key)?.get(field).map(StoredValue::to_versioned)),
            None => Ok(None),
        }
    }

    fn hset(&self, key: &str, field: &str, value: String) -> Result<u64, StorageError> {
        self.ensure_open()?;
        let location = Location::hash_field(key, field);
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                occupied.get().expect_hash(key)?;
                let version = self.next_version();
                occupied.get_mut().store(&location, value, version)?;
                Ok(version)
            }
            Entry::Vacant(vacant) => {
                let version = self.next_version();
                vacant.insert(Slot::fresh(&location, value, version));
                Ok(version)
            }
        }
    }

    fn delete(&self, key: &str) -> Result<bool, StorageError> {
        self.ensure_open()?;
        Ok(self.slots.remove(key).is_some())
    }

    fn exists(&self, key: &str) -> Result<bool, StorageError> {
        self.ensure_open()?;
        Ok(self.slots.contains_key(key))
    }

    fn compare_and_swap(
        &self,
        location: &Location,
        expected_version: u64,
        value: String,
    ) -> Result<CasOutcome, StorageError> {
        self.ensure_open()?;
        let key = location.store_key();
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let current = occupied.get().lookup(location)?.map(StoredValue::version);
                if current != Some(expected_version) {
                    return Ok(CasOutcome::Mismatch { current });
                }
                let version = self.next_version();
                occupied.get_mut().store(location, value, version)?;
                Ok(CasOutcome::Swapped(version))
            }
            Entry::Vacant(_) => Ok(CasOutcome::Mismatch { current: None }),
        }
    }

    fn update<F, E>(&self, location: &Location, f: F) -> Result<Versioned<String>, E>
    where
        F: FnOnce(Option<&str>) -> Result<String, E>,
        E: From<StorageError>,
    {
        self.ensure_open()?;
        let key = location.store_key();
        match self.slots.entry(key.to_string()) {
            Entry::Occupied(mut occupied) => {
                let text = {
                    let current = occupied.get().lookup(location)?;
                    f(current.map(StoredValue::text))?
                };
                let version = self.next_version();
                occupied.get_mut().store(location, text.clone(), version)?;
                Ok(Versioned::new(text, version))
            }
            Entry::Vacant(vacant) => {
                let text = f(None)?;
                let version = self.next_version();
                vacant.insert(Slot::fresh(location, text.clone(), version));
                Ok(Versioned::new(text, version))
            }
        }
    }

    fn current_version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    fn close(&self) {
        if !self.closed.swap(true, Ordering::AcqRel) {
            debug!(target: "fieldpatch::storage", keys = self.slots.len(), "store closed");
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}
