//! Error types for fieldpatch
//!
//! One enum per layer, all built with `thiserror`:
//! - [`PatchError`]: the pure patch engine
//! - [`StorageError`]: the key-value store
//! - [`RegistrationError`]: loading patch programs into the store
//! - [`Error`]: everything an atomic call can return
//!
//! [`Error::kind`] collapses every variant onto [`ErrorKind`] so callers can
//! tell expected outcomes (a missing field) from exceptional ones (a closed
//! store) without matching on every variant.

use crate::limits::LimitError;
use crate::types::{Location, ValueKind};
use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for fieldpatch operations
pub type Result<T> = std::result::Result<T, Error>;

// =============================================================================
// PatchError
// =============================================================================

/// Failure of the patch engine
///
/// `index` is the position of the failing operation in its batch.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PatchError {
    /// Field is not a top-level key of the document
    #[error("field '{field}' not found at top level (operation {index})")]
    NotFound {
        /// Requested field name
        field: String,
        /// Operation index in the batch
        index: usize,
    },

    /// Increment requested on a value that is not numeric
    #[error("cannot increment field '{field}': value is a {found} (operation {index})")]
    TypeMismatch {
        /// Requested field name
        field: String,
        /// Kind found in the document
        found: ValueKind,
        /// Operation index in the batch
        index: usize,
    },

    /// Increment produced an infinite or NaN result
    #[error("increment of field '{field}' produced a non-finite number (operation {index})")]
    NonFiniteResult {
        /// Requested field name
        field: String,
        /// Operation index in the batch
        index: usize,
    },

    /// Set requested with empty replacement text
    #[error("empty replacement value for field '{field}' (operation {index})")]
    EmptyValue {
        /// Requested field name
        field: String,
        /// Operation index in the batch
        index: usize,
    },

    /// Set requested with text that is not exactly one JSON value
    #[error("replacement for field '{field}' is not a single JSON value: {reason} (operation {index})")]
    InvalidValue {
        /// Requested field name
        field: String,
        /// What the scanner expected
        reason: &'static str,
        /// Operation index in the batch
        index: usize,
    },

    /// No consistent value span could be established
    #[error("malformed document at byte {offset}: {reason}")]
    MalformedDocument {
        /// Byte offset where scanning failed
        offset: usize,
        /// What the scanner expected
        reason: &'static str,
    },

    /// Document or batch exceeds configured limits
    #[error(transparent)]
    Limit(#[from] LimitError),
}

impl PatchError {
    /// Shorthand for a malformed-document error
    pub fn malformed(offset: usize, reason: &'static str) -> Self {
        PatchError::MalformedDocument { offset, reason }
    }
}

// =============================================================================
// StorageError
// =============================================================================

/// Failure of the key-value store
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StorageError {
    /// Key holds a different structure than the operation needs
    #[error("key '{key}' does not hold a {expected} value")]
    WrongType {
        /// Offending key
        key: String,
        /// Structure the operation expected ("plain" or "hash")
        expected: &'static str,
    },

    /// Store has been closed
    #[error("store is closed")]
    Closed,
}

// =============================================================================
// RegistrationError
// =============================================================================

/// Failure to load or resolve a patch program
#[derive(Debug, Error)]
pub enum RegistrationError {
    /// Program source could not be read
    #[error("cannot read program '{name}' from {}: {source}", .path.display())]
    MissingSource {
        /// Program name
        name: String,
        /// Path that was read
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Program source was read but rejected
    #[error("program '{name}' rejected: {reason}")]
    Rejected {
        /// Program name
        name: String,
        /// Why it was rejected
        reason: String,
    },

    /// No program registered under this name or handle
    #[error("unknown program '{0}'")]
    UnknownProgram(String),
}

// =============================================================================
// Error
// =============================================================================

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Field or document does not exist
    NotFound,
    /// Increment on a non-numeric value
    TypeMismatch,
    /// Stored text is not a well-formed JSON object
    MalformedDocument,
    /// The store call could not be issued or completed
    TransportFailure,
    /// A program could not be loaded or resolved
    ProgramRegistrationFailure,
    /// Caller supplied invalid arguments or configuration
    InvalidInput,
    /// Optimistic update lost every retry to concurrent writers
    Conflict,
}

/// Error returned by an atomic patch call
#[derive(Debug, Error)]
pub enum Error {
    /// Patch engine failure; the stored document is unchanged
    #[error(transparent)]
    Patch(#[from] PatchError),

    /// Store failure
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Program registration failure
    #[error(transparent)]
    Registration(#[from] RegistrationError),

    /// Nothing stored at the location
    #[error("no document stored at {0}")]
    DocumentMissing(Location),

    /// Arguments do not fit the invoked program
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),

    /// Optimistic update kept conflicting with concurrent writers
    #[error("update of {location} conflicted {attempts} times")]
    Conflict {
        /// Contended location
        location: Location,
        /// Attempts made
        attempts: u32,
    },

    /// Configuration could not be read or is invalid
    #[error("configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Patch(e) => match e {
                PatchError::NotFound { .. } => ErrorKind::NotFound,
                PatchError::TypeMismatch { .. } => ErrorKind::TypeMismatch,
                PatchError::MalformedDocument { .. } => ErrorKind::MalformedDocument,
                PatchError::NonFiniteResult { .. }
                | PatchError::EmptyValue { .. }
                | PatchError::InvalidValue { .. }
                | PatchError::Limit(_) => ErrorKind::InvalidInput,
            },
            Error::Storage(_) => ErrorKind::TransportFailure,
            Error::Registration(_) => ErrorKind::ProgramRegistrationFailure,
            Error::DocumentMissing(_) => ErrorKind::NotFound,
            Error::InvalidArguments(_) | Error::Config(_) => ErrorKind::InvalidInput,
            Error::Conflict { .. } => ErrorKind::Conflict,
        }
    }

    /// True if the error means a field or document is absent
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Shorthand for an invalid-arguments error
    pub fn invalid_arguments(msg: impl Into<String>) -> Self {
        Error::InvalidArguments(msg.into())
    }

    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Error::Config(msg.into())
    }
}
