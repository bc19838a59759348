//! End-to-End Patch Properties
//!
//! Every property runs through JsonPatcher against a document at a plain
//! key and the same document in a hash field, in both atomicity modes
//! where it matters.

#[path = "../common/mod.rs"]
mod common;

mod failures;
mod generated;
mod increment;
mod isolation;
