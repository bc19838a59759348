//! Storage abstraction
//!
//! The patch engine never touches the store. The invocation layer needs
//! exactly three things from it: read the text at a location, write text
//! back, and run a read-transform-write against one location without any
//! other writer interleaving. [`Storage`] captures those plus the plain and
//! hash primitives callers use to seed documents.

use crate::error::StorageError;
use crate::types::{Location, Versioned};

/// Outcome of [`Storage::compare_and_swap`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CasOutcome {
    /// Value replaced; carries the new version
    Swapped(u64),
    /// Stored version differed (`None` if nothing is stored)
    Mismatch {
        /// Version currently stored
        current: Option<u64>,
    },
}

impl CasOutcome {
    /// True if the swap happened
    pub fn is_swapped(&self) -> bool {
        matches!(self, CasOutcome::Swapped(_))
    }
}

/// Key-value store holding documents as text
///
/// Keys hold either a plain value or a hash of field → value; using a hash
/// operation on a plain key (or the reverse) fails with
/// [`StorageError::WrongType`]. Every write is stamped with a version from
/// a single monotonically increasing counter.
///
/// Thread safety: all methods must be safe to call concurrently.
pub trait Storage: Send + Sync {
    /// Get the plain value of `key`
    fn get(&self, key: &str) -> Result<Option<Versioned<String>>, StorageError>;

    /// Set the plain value of `key`, returning the new version
    fn set(&self, key: &str, value: String) -> Result<u64, StorageError>;

    /// Get `field` of the hash at `key`
    fn hget(&self, key: &str, field: &str) -> Result<Option<Versioned<String>>, StorageError>;

    /// Set `field` of the hash at `key`, creating the hash if needed
    fn hset(&self, key: &str, field: &str, value: String) -> Result<u64, StorageError>;

    /// Remove `key` and everything under it; returns whether it existed
    fn delete(&self, key: &str) -> Result<bool, StorageError>;

    /// True if `key` holds anything, plain or hash
    fn exists(&self, key: &str) -> Result<bool, StorageError>;

    /// Replace the value at `location` only if its version is `expected_version`
    fn compare_and_swap(
        &self,
        location: &Location,
        expected_version: u64,
        value: String,
    ) -> Result<CasOutcome, StorageError>;

    /// Run `f` on the current value at `location` and store its result
    ///
    /// No other write to `location` can happen between the read handed to
    /// `f` and the write of its result. If `f` fails nothing is written and
    /// its error is returned. `f` must not call back into the store.
    fn update<F, E>(&self, location: &Location, f: F) -> Result<Versioned<String>, E>
    where
        Self: Sized,
        F: FnOnce(Option<&str>) -> Result<String, E>,
        E: From<StorageError>;

    /// Highest version assigned so far
    fn current_version(&self) -> u64;

    /// Reject every further call with [`StorageError::Closed`]
    fn close(&self);

    /// True once [`Storage::close`] has been called
    fn is_closed(&self) -> bool;

    /// Read the document text at `location`
    fn read(&self, location: &Location) -> Result<Option<Versioned<String>>, StorageError> {
        match location {
            Location::Key { key } => self.get(key),
            Location::HashField { key, field } => self.hget(key, field),
        }
    }

    /// Write document text to `location`
    fn write(&self, location: &Location, value: String) -> Result<u64, StorageError> {
        match location {
            Location::Key { key } => self.set(key, value),
            Location::HashField { key, field } => self.hset(key, field, value),
        }
    }
}
