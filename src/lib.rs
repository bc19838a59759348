//! fieldpatch - atomic in-place patching of JSON documents in a key-value store
//!
//! Documents live in the store as serialized JSON objects, either under a
//! plain key or in one field of a hash. fieldpatch sets or increments
//! top-level fields of such a document without deserializing it: the
//! replacement value is spliced into the text, and every other byte stays
//! as it was. Each call is atomic against concurrent writers to the same
//! location.
//!
//! # Quick Start
//!
//! ```
//! use fieldpatch::{JsonPatcher, PatcherConfig, Storage};
//!
//! let patcher = JsonPatcher::new(PatcherConfig::default())?;
//! patcher.init()?;
//!
//! patcher.store().set("user:1", r#"{"name":"ada","visits":"2"}"#.to_string())?;
//! patcher.set_key("user:1", "name", "grace")?;
//! let doc = patcher.incr_key("user:1", "visits")?;
//! assert_eq!(doc, r#"{"name":"grace","visits":"3"}"#);
//!
//! patcher.store().hset("sessions", "s1", r#"{"hits":0}"#.to_string())?;
//! let doc = patcher.incr_hash_keys("sessions", "s1", [("hits", 5)])?;
//! assert_eq!(doc, r#"{"hits":5}"#);
//! # Ok::<(), fieldpatch::Error>(())
//! ```
//!
//! # Architecture
//!
//! - `fieldpatch-core`: locations, field operations, errors, the store trait
//! - `fieldpatch-patch`: the pure text patch engine
//! - `fieldpatch-storage`: the in-memory sharded store
//! - `fieldpatch-engine`: program registry, atomic invocation, `JsonPatcher`

pub use fieldpatch_core::{
    CasOutcome, Delta, Error, ErrorKind, FieldOp, LimitError, Limits, Location, OpKind, Operand,
    PatchError, RegistrationError, Result, SetValue, Storage, StorageError, ValueKind, Versioned,
};
pub use fieldpatch_engine::*;
pub use fieldpatch_patch::{apply_batch, incr_field, set_field, PatchEngine};
pub use fieldpatch_storage::ShardedStore;
