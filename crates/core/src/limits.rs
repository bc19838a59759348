//! Size limits for documents and batches
//!
//! The scanner is bounded by document length; these limits additionally cap
//! how much work a single atomic call may do. Violations are reported as
//! [`LimitError`] before any byte of the document is touched.

use thiserror::Error;

/// Default maximum document size in bytes (16 MB)
pub const DEFAULT_MAX_DOCUMENT_BYTES: usize = 16 * 1024 * 1024;

/// Default maximum bracket nesting inside a single field value
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 128;

/// Default maximum operations in one batch
pub const DEFAULT_MAX_BATCH_OPS: usize = 1024;

/// Limits enforced by the patch engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum document size in bytes (default: 16MB)
    pub max_document_bytes: usize,

    /// Maximum nesting depth of `{`/`[` while skipping a value (default: 128)
    pub max_nesting_depth: usize,

    /// Maximum number of operations in one batch (default: 1024)
    pub max_batch_ops: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_document_bytes: DEFAULT_MAX_DOCUMENT_BYTES,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
            max_batch_ops: DEFAULT_MAX_BATCH_OPS,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    pub fn with_small_limits() -> Self {
        Limits {
            max_document_bytes: 256,
            max_nesting_depth: 4,
            max_batch_ops: 4,
        }
    }

    /// Validate a document length
    pub fn validate_document(&self, doc: &str) -> Result<(), LimitError> {
        if doc.len() > self.max_document_bytes {
            return Err(LimitError::DocumentTooLarge {
                actual: doc.len(),
                max: self.max_document_bytes,
            });
        }
        Ok(())
    }

    /// Validate a batch length
    pub fn validate_batch(&self, len: usize) -> Result<(), LimitError> {
        if len > self.max_batch_ops {
            return Err(LimitError::BatchTooLarge {
                actual: len,
                max: self.max_batch_ops,
            });
        }
        Ok(())
    }
}

/// Limit violation
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Document exceeds the maximum size
    #[error("document size {actual} exceeds maximum of {max} bytes")]
    DocumentTooLarge {
        /// Actual size
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Value nesting exceeds the maximum depth
    #[error("nesting depth {actual} exceeds maximum of {max}")]
    NestingTooDeep {
        /// Depth reached
        actual: usize,
        /// Maximum allowed
        max: usize,
    },

    /// Batch has too many operations
    #[error("batch of {actual} operations exceeds maximum of {max}")]
    BatchTooLarge {
        /// Actual operation count
        actual: usize,
        /// Maximum allowed
        max: usize,
    },
}
