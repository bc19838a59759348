//! Addressing and classification types
//!
//! - [`Location`]: where a document lives in the store
//! - [`ValueKind`]: what kind of value a scanned field holds
//! - [`Versioned`]: a stored value with the version that wrote it

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Location
// =============================================================================

/// Storage location of a document
///
/// A document is either the direct value of a plain key, or one field of a
/// hash stored under an outer key. Both variants are patched by the same
/// engine; only the read and write-back differ.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Location {
    /// Document is the value of a plain key
    Key {
        /// Store key
        key: String,
    },
    /// Document is one field of a hash
    HashField {
        /// Outer store key holding the hash
        key: String,
        /// Field within the hash holding the document
        field: String,
    },
}

impl Location {
    /// Location of a document stored under a plain key
    pub fn key(key: impl Into<String>) -> Self {
        Location::Key { key: key.into() }
    }

    /// Location of a document stored as a field of a hash
    pub fn hash_field(key: impl Into<String>, field: impl Into<String>) -> Self {
        Location::HashField {
            key: key.into(),
            field: field.into(),
        }
    }

    /// Outer store key
    pub fn store_key(&self) -> &str {
        match self {
            Location::Key { key } | Location::HashField { key, .. } => key,
        }
    }

    /// Inner hash field, if this is a hash location
    pub fn field(&self) -> Option<&str> {
        match self {
            Location::Key { .. } => None,
            Location::HashField { field, .. } => Some(field),
        }
    }

    /// True if the document lives inside a hash
    pub fn is_hash(&self) -> bool {
        matches!(self, Location::HashField { .. })
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Location::Key { key } => write!(f, "{}", key),
            Location::HashField { key, field } => write!(f, "{}[{}]", key, field),
        }
    }
}

// =============================================================================
// ValueKind
// =============================================================================

/// Classification of a top-level field value, derived while scanning
///
/// Only `Number` and `NumericString` can be incremented. Every kind can be
/// replaced by a set operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// JSON string literal whose content is not a number
    String,
    /// Bare JSON number literal
    Number,
    /// JSON string literal whose content is a valid JSON number, e.g. `"42"`
    NumericString,
    /// Object, array, boolean or null
    Other,
}

impl ValueKind {
    /// True for kinds an increment can be applied to
    #[inline]
    pub fn is_numeric(&self) -> bool {
        matches!(self, ValueKind::Number | ValueKind::NumericString)
    }

    /// Short name used in error messages
    pub fn name(&self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::Number => "number",
            ValueKind::NumericString => "numeric string",
            ValueKind::Other => "non-scalar",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Versioned
// =============================================================================

/// A value together with the store version that wrote it
///
/// Versions are assigned by the store from a single monotonically
/// increasing counter, so a larger version always means a later write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Versioned<T> {
    /// The stored value
    pub value: T,
    /// Version assigned by the store on write
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Wrap a value with its version
    pub fn new(value: T, version: u64) -> Self {
        Versioned { value, version }
    }

    /// Map the inner value, keeping the version
    pub fn map<U, F>(self, f: F) -> Versioned<U>
    where
        F: FnOnce(T) -> U,
    {
        Versioned {
            value: f(self.value),
            version: self.version,
        }
    }

    /// Discard the version
    pub fn into_value(self) -> T {
        self.value
    }
}
