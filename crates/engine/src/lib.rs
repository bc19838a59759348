//! Invocation layer for fieldpatch
//!
//! This crate turns the pure patch engine into atomic calls against a store:
//! - Program registry: named patch programs invoked by content hash
//! - Invoker: read-patch-write under the store's lock, or optimistically
//!   with compare-and-swap
//! - JsonPatcher: one method per operation and storage variant
//! - Configuration: `fieldpatch.toml`
//!
//! The engine is the only component that knows about:
//! - Which program a call runs
//! - How a call is kept atomic against concurrent writers

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod invoke;
pub mod patcher;
pub mod program;
pub mod registry;

pub use config::{AtomicityMode, PatcherConfig, CONFIG_FILE_NAME};
pub use invoke::Invoker;
pub use patcher::JsonPatcher;
pub use program::{ProgramDef, Target, BUILTIN_PROGRAMS};
pub use registry::{ProgramHandle, ProgramRegistry};
