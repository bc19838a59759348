//! Patch engine for fieldpatch
//!
//! Pure text transformation of serialized JSON objects. Given the raw text
//! of an object and an ordered batch of field operations, produces the new
//! text with exactly those top-level values changed. Key order, whitespace,
//! nesting and untouched fields stay byte-identical.
//!
//! - [`scan`]: locate a top-level field and classify its value
//! - [`number`]: JSON number grammar and increment arithmetic
//! - [`apply`]: set, increment and all-or-nothing batches
//!
//! Nothing here performs I/O or keeps state between calls. Atomicity against
//! concurrent writers is the job of whoever reads and writes the text.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod apply;
pub mod number;
pub mod scan;

pub use apply::{apply_batch, incr_field, set_field, PatchEngine};
pub use scan::{locate, locate_with, Entry, FieldLocation};
