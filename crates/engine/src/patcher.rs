//! JsonPatcher: client facade
//!
//! Ties a store, a program registry and an invoker together behind one
//! method per operation:
//!
//! | Plain key | Hash field |
//! |---|---|
//! | `set_key` / `set_keys` | `set_hash_key` / `set_hash_keys` |
//! | `incr_key` / `incr_key_by` / `incr_keys` | `incr_hash_key` / `incr_hash_key_by` / `incr_hash_keys` |
//!
//! Every method returns the full new document text. `eval` runs any
//! registered program by handle.
//!
//! # Lifecycle
//!
//! `new` / `with_store` → `init` (registers programs) → calls → `quit`.
//! Calls made before `init` fail with `UnknownProgram`. `quit` closes the
//! store only if this patcher created it.

use crate::config::PatcherConfig;
use crate::invoke::Invoker;
use crate::program::{builtin_name, Target};
use crate::registry::{ProgramHandle, ProgramRegistry};
use fieldpatch_core::{Delta, FieldOp, Location, OpKind, Result, SetValue, Storage};
use fieldpatch_patch::PatchEngine;
use fieldpatch_storage::ShardedStore;
use std::sync::Arc;
use tracing::info;

/// Atomic JSON field patcher over a key-value store
///
/// # Example
///
/// ```
/// use fieldpatch_engine::{JsonPatcher, PatcherConfig};
/// use fieldpatch_core::Storage;
///
/// let patcher = JsonPatcher::new(PatcherConfig::default()).unwrap();
/// patcher.init().unwrap();
/// patcher.store().set("user:1", r#"{"name":"ada","visits":2}"#.to_string()).unwrap();
///
/// let doc = patcher.incr_key("user:1", "visits").unwrap();
/// assert_eq!(doc, r#"{"name":"ada","visits":3}"#);
/// patcher.quit();
/// ```
#[derive(Debug)]
pub struct JsonPatcher<S: Storage = ShardedStore> {
    store: Arc<S>,
    owns_store: bool,
    config: PatcherConfig,
    registry: ProgramRegistry,
    invoker: Invoker<S>,
}

impl JsonPatcher<ShardedStore> {
    /// Create a patcher with its own in-memory store
    pub fn new(config: PatcherConfig) -> Result<Self> {
        Self::build(Arc::new(ShardedStore::new()), true, config)
    }
}

impl<S: Storage> JsonPatcher<S> {
    /// Create a patcher over a store shared with the caller
    ///
    /// `quit` leaves a shared store open.
    pub fn with_store(store: Arc<S>, config: PatcherConfig) -> Result<Self> {
        Self::build(store, false, config)
    }

    fn build(store: Arc<S>, owns_store: bool, config: PatcherConfig) -> Result<Self> {
        config.validate()?;
        let mode = config.atomicity_mode()?;
        let engine = PatchEngine::new(config.limits());
        let invoker = Invoker::new(Arc::clone(&store), engine, mode);
        Ok(Self {
            store,
            owns_store,
            config,
            registry: ProgramRegistry::new(),
            invoker,
        })
    }

    /// Register the patch programs
    ///
    /// Loads them from `programs_dir` when configured, else registers the
    /// built-in sources.
    pub fn init(&self) -> Result<()> {
        match &self.config.programs_dir {
            Some(dir) => self.registry.load_builtins_from(dir)?,
            None => self.registry.register_builtins()?,
        }
        info!(
            target: "fieldpatch::patcher",
            programs = self.registry.len(),
            mode = ?self.invoker.mode(),
            "Patcher initialized"
        );
        Ok(())
    }

    /// Shut down; closes the store if this patcher owns it
    pub fn quit(&self) {
        if self.owns_store {
            self.store.close();
        }
        info!(target: "fieldpatch::patcher", closed_store = self.owns_store, "Patcher quit");
    }

    /// Underlying store
    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Configuration in use
    pub fn config(&self) -> &PatcherConfig {
        &self.config
    }

    /// Program registry
    pub fn registry(&self) -> &ProgramRegistry {
        &self.registry
    }

    /// Handle of the program registered as `name`
    pub fn handle(&self, name: &str) -> Result<ProgramHandle> {
        Ok(self.registry.handle_for(name)?)
    }

    /// Run the program behind `handle` on the document at `location`
    pub fn eval(&self, handle: &ProgramHandle, location: &Location, ops: &[FieldOp]) -> Result<String> {
        let program = self.registry.get(handle)?;
        self.invoker.invoke(&program, location, ops)
    }

    fn run_builtin(&self, location: &Location, operation: OpKind, batch: bool, ops: &[FieldOp]) -> Result<String> {
        let target = if location.is_hash() { Target::Hash } else { Target::Key };
        let handle = self.handle(builtin_name(target, operation, batch))?;
        self.eval(&handle, location, ops)
    }

    // ========================================================================
    // Plain key
    // ========================================================================

    /// Set `field` of the document at `key`
    pub fn set_key(&self, key: &str, field: &str, value: impl Into<SetValue>) -> Result<String> {
        self.run_builtin(&Location::key(key), OpKind::Set, false, &[FieldOp::set(field, value)])
    }

    /// Set several fields of the document at `key`, in order
    pub fn set_keys<I, F, V>(&self, key: &str, pairs: I) -> Result<String>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<SetValue>,
    {
        self.run_builtin(&Location::key(key), OpKind::Set, true, &set_ops(pairs))
    }

    /// Increment `field` of the document at `key` by 1
    pub fn incr_key(&self, key: &str, field: &str) -> Result<String> {
        self.run_builtin(&Location::key(key), OpKind::Incr, false, &[FieldOp::incr(field)])
    }

    /// Increment `field` of the document at `key` by `delta`
    pub fn incr_key_by(&self, key: &str, field: &str, delta: impl Into<Delta>) -> Result<String> {
        self.run_builtin(
            &Location::key(key),
            OpKind::Incr,
            false,
            &[FieldOp::incr_by(field, delta)],
        )
    }

    /// Increment several fields of the document at `key`, in order
    pub fn incr_keys<I, F, D>(&self, key: &str, pairs: I) -> Result<String>
    where
        I: IntoIterator<Item = (F, D)>,
        F: Into<String>,
        D: Into<Delta>,
    {
        self.run_builtin(&Location::key(key), OpKind::Incr, true, &incr_ops(pairs))
    }

    // ========================================================================
    // Hash field
    // ========================================================================

    /// Set `field` of the document in `hash_field` of the hash at `key`
    pub fn set_hash_key(
        &self,
        key: &str,
        hash_field: &str,
        field: &str,
        value: impl Into<SetValue>,
    ) -> Result<String> {
        self.run_builtin(
            &Location::hash_field(key, hash_field),
            OpKind::Set,
            false,
            &[FieldOp::set(field, value)],
        )
    }

    /// Set several fields of the document in `hash_field`, in order
    pub fn set_hash_keys<I, F, V>(&self, key: &str, hash_field: &str, pairs: I) -> Result<String>
    where
        I: IntoIterator<Item = (F, V)>,
        F: Into<String>,
        V: Into<SetValue>,
    {
        self.run_builtin(
            &Location::hash_field(key, hash_field),
            OpKind::Set,
            true,
            &set_ops(pairs),
        )
    }

    /// Increment `field` of the document in `hash_field` by 1
    pub fn incr_hash_key(&self, key: &str, hash_field: &str, field: &str) -> Result<String> {
        self.run_builtin(
            &Location::hash_field(key, hash_field),
            OpKind::Incr,
            false,
            &[FieldOp::incr(field)],
        )
    }

    /// Increment `field` of the document in `hash_field` by `delta`
    pub fn incr_hash_key_by(
        &self,
        key: &str,
        hash_field: &str,
        field: &str,
        delta: impl Into<Delta>,
    ) -> Result<String> {
        self.run_builtin(
            &Location::hash_field(key, hash_field),
            OpKind::Incr,
            false,
            &[FieldOp::incr_by(field, delta)],
        )
    }

    /// Increment several fields of the document in `hash_field`, in order
    pub fn incr_hash_keys<I, F, D>(&self, key: &str, hash_field: &str, pairs: I) -> Result<String>
    where
        I: IntoIterator<Item = (F, D)>,
        F: Into<String>,
        D: Into<Delta>,
    {
        self.run_builtin(
            &Location::hash_field(key, hash_field),
            OpKind::Incr,
            true,
            &incr_ops(pairs),
        )
    }
}

fn set_ops<I, F, V>(pairs: I) -> Vec<FieldOp>
where
    I: IntoIterator<Item = (F, V)>,
    F: Into<String>,
    V: Into<SetValue>,
{
    pairs.into_iter().map(|(f, v)| FieldOp::set(f, v)).collect()
}

fn incr_ops<I, F, D>(pairs: I) -> Vec<FieldOp>
where
    I: IntoIterator<Item = (F, D)>,
    F: Into<String>,
    D: Into<Delta>,
{
    pairs.into_iter().map(|(f, d)| FieldOp::incr_by(f, d)).collect()
}
