//! Program registry
//!
//! Programs are registered under a name and invoked by handle. The handle is
//! the hex SHA-256 of the program source, so the same source always yields
//! the same handle and re-registering it is a no-op.
//!
//! # Thread Safety
//!
//! One `parking_lot::RwLock` guards both maps so a name never points at a
//! handle that is not registered.

use crate::program::{ProgramDef, BUILTIN_PROGRAMS};
use fieldpatch_core::RegistrationError;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Opaque handle of a registered program
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProgramHandle(String);

impl ProgramHandle {
    /// Handle for `source`
    pub fn for_source(source: &str) -> Self {
        let digest = Sha256::digest(source.as_bytes());
        let mut hex = String::with_capacity(digest.len() * 2);
        for byte in digest.iter() {
            hex.push_str(&format!("{:02x}", byte));
        }
        ProgramHandle(hex)
    }

    /// Hex digest text
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProgramHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Default)]
struct Inner {
    programs: FxHashMap<ProgramHandle, Arc<ProgramDef>>,
    names: FxHashMap<String, ProgramHandle>,
}

/// Registered programs by handle and name
#[derive(Debug, Default)]
pub struct ProgramRegistry {
    inner: RwLock<Inner>,
}

impl ProgramRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the program `name` from the file at `path`
    ///
    /// # Errors
    ///
    /// - [`RegistrationError::MissingSource`] if the file cannot be read
    /// - [`RegistrationError::Rejected`] if the source does not compile
    pub fn load(&self, name: &str, path: &Path) -> Result<ProgramHandle, RegistrationError> {
        let source =
            std::fs::read_to_string(path).map_err(|source| RegistrationError::MissingSource {
                name: name.to_string(),
                path: path.to_path_buf(),
                source,
            })?;
        self.register_source(name, &source)
    }

    /// Register the program `name` from an in-memory source
    pub fn register_source(
        &self,
        name: &str,
        source: &str,
    ) -> Result<ProgramHandle, RegistrationError> {
        let def = ProgramDef::compile(name, source).map_err(|e| {
            warn!(target: "fieldpatch::registry", name, error = %e, "Program rejected");
            e
        })?;
        let handle = ProgramHandle::for_source(source);

        let mut inner = self.inner.write();
        inner.programs.insert(handle.clone(), Arc::new(def));
        inner.names.insert(name.to_string(), handle.clone());
        drop(inner);

        info!(target: "fieldpatch::registry", name, handle = %handle, "Program registered");
        Ok(handle)
    }

    /// Register every built-in program
    pub fn register_builtins(&self) -> Result<(), RegistrationError> {
        for (name, source) in BUILTIN_PROGRAMS {
            self.register_source(name, source)?;
        }
        Ok(())
    }

    /// Load every built-in program name from `<dir>/<name>.toml`
    pub fn load_builtins_from(&self, dir: &Path) -> Result<(), RegistrationError> {
        for (name, _) in BUILTIN_PROGRAMS {
            self.load(name, &dir.join(format!("{}.toml", name)))?;
        }
        Ok(())
    }

    /// Program registered under `handle`
    pub fn get(&self, handle: &ProgramHandle) -> Result<Arc<ProgramDef>, RegistrationError> {
        self.inner
            .read()
            .programs
            .get(handle)
            .cloned()
            .ok_or_else(|| RegistrationError::UnknownProgram(handle.to_string()))
    }

    /// Handle of the program registered as `name`
    pub fn handle_for(&self, name: &str) -> Result<ProgramHandle, RegistrationError> {
        self.inner
            .read()
            .names
            .get(name)
            .cloned()
            .ok_or_else(|| RegistrationError::UnknownProgram(name.to_string()))
    }

    /// Number of distinct programs
    pub fn len(&self) -> usize {
        self.inner.read().programs.len()
    }

    /// True if nothing is registered
    pub fn is_empty(&self) -> bool {
        self.inner.read().programs.is_empty()
    }
}
