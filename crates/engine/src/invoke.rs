//! Atomic invocation of patch programs
//!
//! One call is: read the document at a location, run the patch engine over
//! it, write the result back, return the new text. No other write to that
//! location may land in between. Two ways to guarantee that:
//!
//! - [`AtomicityMode::Locked`]: the patch runs inside `Storage::update`,
//!   under the store's lock for the location
//! - [`AtomicityMode::Optimistic`]: read with its version, patch outside any
//!   lock, then compare-and-swap; a version mismatch means someone else
//!   wrote first, so start over with their document
//!
//! Either way a failed patch writes nothing.

use crate::config::AtomicityMode;
use crate::program::ProgramDef;
use fieldpatch_core::{CasOutcome, Error, FieldOp, Location, Result, Storage};
use fieldpatch_patch::PatchEngine;
use std::sync::Arc;
use tracing::{debug, warn};

/// Runs checked programs against a store
#[derive(Debug)]
pub struct Invoker<S: Storage> {
    store: Arc<S>,
    engine: PatchEngine,
    mode: AtomicityMode,
}

impl<S: Storage> Invoker<S> {
    /// Create an invoker over `store`
    pub fn new(store: Arc<S>, engine: PatchEngine, mode: AtomicityMode) -> Self {
        Self {
            store,
            engine,
            mode,
        }
    }

    /// Atomicity mode in use
    pub fn mode(&self) -> AtomicityMode {
        self.mode
    }

    /// Run `program` on the document at `location`
    ///
    /// Returns the new document text. The program's shape is checked before
    /// the store is touched.
    pub fn invoke(&self, program: &ProgramDef, location: &Location, ops: &[FieldOp]) -> Result<String> {
        program.check(location, ops)?;
        debug!(
            target: "fieldpatch::invoke",
            program = %program.name,
            location = %location,
            ops = ops.len(),
            "Invoking program"
        );
        match self.mode {
            AtomicityMode::Locked => self.invoke_locked(location, ops),
            AtomicityMode::Optimistic { max_retries } => {
                self.invoke_optimistic(location, ops, max_retries)
            }
        }
    }

    fn invoke_locked(&self, location: &Location, ops: &[FieldOp]) -> Result<String> {
        let written = self.store.update(location, |current| {
            let doc = current.ok_or_else(|| Error::DocumentMissing(location.clone()))?;
            Ok::<_, Error>(self.engine.apply(doc, ops)?)
        })?;
        Ok(written.into_value())
    }

    fn invoke_optimistic(
        &self,
        location: &Location,
        ops: &[FieldOp],
        max_retries: u32,
    ) -> Result<String> {
        for attempt in 1..=max_retries {
            let current = self
                .store
                .read(location)?
                .ok_or_else(|| Error::DocumentMissing(location.clone()))?;
            let patched = self.engine.apply(&current.value, ops)?;

            match self
                .store
                .compare_and_swap(location, current.version, patched.clone())?
            {
                CasOutcome::Swapped(_) => return Ok(patched),
                CasOutcome::Mismatch { current: found } => {
                    debug!(
                        target: "fieldpatch::invoke",
                        location = %location,
                        attempt,
                        expected = current.version,
                        found = ?found,
                        "Version moved, retrying"
                    );
                }
            }
        }

        warn!(
            target: "fieldpatch::invoke",
            location = %location,
            attempts = max_retries,
            "Giving up after repeated conflicts"
        );
        Err(Error::Conflict {
            location: location.clone(),
            attempts: max_retries,
        })
    }
}
