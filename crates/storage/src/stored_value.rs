//! Storage-layer value wrapper
//!
//! The contract type `Versioned<String>` is what callers see. `StoredValue`
//! is what the store keeps; it is cheap to convert and is never handed out
//! by reference across the shard lock.

use fieldpatch_core::Versioned;

/// Document text plus the version that wrote it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredValue {
    text: String,
    version: u64,
}

impl StoredValue {
    /// Create a stored value
    pub fn new(text: String, version: u64) -> Self {
        StoredValue { text, version }
    }

    /// The stored text
    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Version that wrote this value
    #[inline]
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Replace text and version in place
    #[inline]
    pub fn replace(&mut self, text: String, version: u64) {
        self.text = text;
        self.version = version;
    }

    /// Clone into the contract type
    pub fn to_versioned(&self) -> Versioned<String> {
        Versioned::new(self.text.clone(), self.version)
    }
}
