//! Patch program definitions
//!
//! A program is a tiny TOML source naming what one atomic call does:
//!
//! ```toml
//! name = "incr_hash_json_keys"
//! target = "hash"       # "key" or "hash"
//! operation = "incr"    # "set" or "incr"
//! batch = true          # false: exactly one field per call
//! ```
//!
//! Compiling a source checks it is well-formed; checking an invocation makes
//! sure the location and operations fit the program before the store is
//! touched.

use fieldpatch_core::{Error, FieldOp, Location, OpKind, RegistrationError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of location a program patches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    /// Document stored as a plain value
    Key,
    /// Document stored in one field of a hash
    Hash,
}

impl Target {
    /// True if `location` is of this kind
    pub fn matches(&self, location: &Location) -> bool {
        match self {
            Target::Key => !location.is_hash(),
            Target::Hash => location.is_hash(),
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Key => write!(f, "key"),
            Target::Hash => write!(f, "hash"),
        }
    }
}

/// A compiled patch program
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProgramDef {
    /// Name the program is registered under
    pub name: String,
    /// Location kind it patches
    pub target: Target,
    /// Operation every field op must carry
    pub operation: OpKind,
    /// Whether more than one field op is accepted
    #[serde(default)]
    pub batch: bool,
}

impl ProgramDef {
    /// Compile `source` as the program called `name`
    ///
    /// # Errors
    ///
    /// [`RegistrationError::Rejected`] if the source does not parse, or if it
    /// declares a different name.
    pub fn compile(name: &str, source: &str) -> std::result::Result<Self, RegistrationError> {
        let def: ProgramDef = toml::from_str(source).map_err(|e| RegistrationError::Rejected {
            name: name.to_string(),
            reason: e.to_string(),
        })?;
        if def.name != name {
            return Err(RegistrationError::Rejected {
                name: name.to_string(),
                reason: format!("source declares name '{}'", def.name),
            });
        }
        Ok(def)
    }

    /// Check that `location` and `ops` fit this program
    pub fn check(&self, location: &Location, ops: &[FieldOp]) -> Result<()> {
        if !self.target.matches(location) {
            return Err(Error::invalid_arguments(format!(
                "program '{}' patches {} locations, got {}",
                self.name, self.target, location
            )));
        }
        if ops.is_empty() {
            return Err(Error::invalid_arguments(format!(
                "program '{}' needs at least one field",
                self.name
            )));
        }
        if !self.batch && ops.len() != 1 {
            return Err(Error::invalid_arguments(format!(
                "program '{}' takes exactly one field, got {}",
                self.name,
                ops.len()
            )));
        }
        if let Some((index, op)) = ops
            .iter()
            .enumerate()
            .find(|(_, op)| op.kind() != self.operation)
        {
            return Err(Error::invalid_arguments(format!(
                "program '{}' only runs {} operations, operation {} on '{}' is {}",
                self.name,
                self.operation,
                index,
                op.field,
                op.kind()
            )));
        }
        Ok(())
    }
}

/// Built-in program sources, keyed by name
pub const BUILTIN_PROGRAMS: &[(&str, &str)] = &[
    ("set_json_key", include_str!("../programs/set_json_key.toml")),
    ("set_json_keys", include_str!("../programs/set_json_keys.toml")),
    ("incr_json_key", include_str!("../programs/incr_json_key.toml")),
    ("incr_json_keys", include_str!("../programs/incr_json_keys.toml")),
    ("set_hash_json_key", include_str!("../programs/set_hash_json_key.toml")),
    ("set_hash_json_keys", include_str!("../programs/set_hash_json_keys.toml")),
    ("incr_hash_json_key", include_str!("../programs/incr_hash_json_key.toml")),
    ("incr_hash_json_keys", include_str!("../programs/incr_hash_json_keys.toml")),
];

/// Name of the built-in program for this combination
pub fn builtin_name(target: Target, operation: OpKind, batch: bool) -> &'static str {
    match (target, operation, batch) {
        (Target::Key, OpKind::Set, false) => "set_json_key",
        (Target::Key, OpKind::Set, true) => "set_json_keys",
        (Target::Key, OpKind::Incr, false) => "incr_json_key",
        (Target::Key, OpKind::Incr, true) => "incr_json_keys",
        (Target::Hash, OpKind::Set, false) => "set_hash_json_key",
        (Target::Hash, OpKind::Set, true) => "set_hash_json_keys",
        (Target::Hash, OpKind::Incr, false) => "incr_hash_json_key",
        (Target::Hash, OpKind::Incr, true) => "incr_hash_json_keys",
    }
}
