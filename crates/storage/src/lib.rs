//! Storage layer for fieldpatch
//!
//! In-memory key-value store holding documents as text:
//! - ShardedStore: DashMap of keys, each a plain value or a hash
//! - StoredValue: text plus the version that wrote it
//!
//! # Atomicity
//!
//! `Storage::update` runs the caller's transform while holding the write
//! lock of the DashMap shard that owns the key. Writers to the same key are
//! serialized; keys in other shards proceed in parallel.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod sharded;
pub mod stored_value;

pub use sharded::ShardedStore;
pub use stored_value::StoredValue;
