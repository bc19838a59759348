//! Core types for fieldpatch
//!
//! This crate defines the foundational types shared by every layer:
//! - Location: where a document lives in the store (plain key or hash field)
//! - FieldOp / Operand / Delta: one typed mutation of a top-level field
//! - SetValue: caller-side formatting of replacement values
//! - ValueKind: classification of a scanned field value
//! - Versioned: a stored value together with its version
//! - Limits: document, nesting and batch size limits
//! - Storage: the key-value store contract used by the invocation layer
//! - Error: error type hierarchy for patching, storage and registration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod limits;
pub mod op;
pub mod traits;
pub mod types;
pub mod value;

pub use error::{Error, ErrorKind, PatchError, RegistrationError, Result, StorageError};
pub use limits::{LimitError, Limits};
pub use op::{Delta, FieldOp, OpKind, Operand};
pub use traits::{CasOutcome, Storage};
pub use types::{Location, ValueKind, Versioned};
pub use value::SetValue;
