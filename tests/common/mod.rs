//! Shared test utilities for the integration suites.
//!
//! Import via `#[path = "../common/mod.rs"] mod common;` from a suite's main.rs.

#![allow(dead_code)]

use fieldpatch::{JsonPatcher, PatcherConfig, Result, SetValue, Storage};
use serde_json::Value;
use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Route tracing output through the test harness's captured writer
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    });
}

/// Patcher over its own store with programs registered
pub fn ready_patcher(config: PatcherConfig) -> JsonPatcher {
    init_tracing();
    let p = JsonPatcher::new(config).unwrap();
    p.init().unwrap();
    p
}

/// Storage variant a document lives in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Plain key `doc`
    Plain,
    /// Field `body` of hash `doc`
    Hash,
}

/// Both variants, for parity loops
pub const VARIANTS: [Variant; 2] = [Variant::Plain, Variant::Hash];

const KEY: &str = "doc";
const HASH_FIELD: &str = "body";

impl Variant {
    /// Store `doc` at this variant's location
    pub fn seed(self, p: &JsonPatcher, doc: &str) {
        match self {
            Variant::Plain => p.store().set(KEY, doc.to_string()),
            Variant::Hash => p.store().hset(KEY, HASH_FIELD, doc.to_string()),
        }
        .unwrap();
    }

    /// Text currently stored at this variant's location
    pub fn stored(self, p: &JsonPatcher) -> String {
        match self {
            Variant::Plain => p.store().get(KEY),
            Variant::Hash => p.store().hget(KEY, HASH_FIELD),
        }
        .unwrap()
        .unwrap()
        .value
    }

    /// Stored document parsed with serde_json
    pub fn parsed(self, p: &JsonPatcher) -> Value {
        serde_json::from_str(&self.stored(p)).unwrap()
    }

    /// Set one field
    pub fn set(self, p: &JsonPatcher, field: &str, value: impl Into<SetValue>) -> Result<String> {
        match self {
            Variant::Plain => p.set_key(KEY, field, value),
            Variant::Hash => p.set_hash_key(KEY, HASH_FIELD, field, value),
        }
    }

    /// Set several fields
    pub fn set_many(self, p: &JsonPatcher, pairs: Vec<(&str, SetValue)>) -> Result<String> {
        match self {
            Variant::Plain => p.set_keys(KEY, pairs),
            Variant::Hash => p.set_hash_keys(KEY, HASH_FIELD, pairs),
        }
    }

    /// Increment one field by 1
    pub fn incr(self, p: &JsonPatcher, field: &str) -> Result<String> {
        match self {
            Variant::Plain => p.incr_key(KEY, field),
            Variant::Hash => p.incr_hash_key(KEY, HASH_FIELD, field),
        }
    }

    /// Increment one field by `delta`
    pub fn incr_by(self, p: &JsonPatcher, field: &str, delta: i64) -> Result<String> {
        match self {
            Variant::Plain => p.incr_key_by(KEY, field, delta),
            Variant::Hash => p.incr_hash_key_by(KEY, HASH_FIELD, field, delta),
        }
    }

    /// Increment several fields
    pub fn incr_many(self, p: &JsonPatcher, pairs: Vec<(&str, i64)>) -> Result<String> {
        match self {
            Variant::Plain => p.incr_keys(KEY, pairs),
            Variant::Hash => p.incr_hash_keys(KEY, HASH_FIELD, pairs),
        }
    }
}
