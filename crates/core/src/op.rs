//! Field operations
//!
//! A batch is an ordered `Vec<FieldOp>`. Each operation targets one
//! top-level field by name and either replaces its value or adds a delta.

use crate::value::SetValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Signed amount added by an increment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Delta {
    /// Integer amount
    Int(i64),
    /// Floating-point amount
    Float(f64),
}

impl Delta {
    /// Convert to f64
    #[inline]
    pub fn as_f64(&self) -> f64 {
        match self {
            Delta::Int(i) => *i as f64,
            Delta::Float(f) => *f,
        }
    }

    /// True if this is an integer amount
    #[inline]
    pub fn is_int(&self) -> bool {
        matches!(self, Delta::Int(_))
    }
}

impl Default for Delta {
    /// An increment without an explicit amount adds one
    fn default() -> Self {
        Delta::Int(1)
    }
}

impl fmt::Display for Delta {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Delta::Int(i) => write!(f, "{}", i),
            Delta::Float(v) => write!(f, "{}", v),
        }
    }
}

impl From<i64> for Delta {
    fn from(v: i64) -> Self {
        Delta::Int(v)
    }
}

impl From<i32> for Delta {
    fn from(v: i32) -> Self {
        Delta::Int(v as i64)
    }
}

impl From<u32> for Delta {
    fn from(v: u32) -> Self {
        Delta::Int(v as i64)
    }
}

impl From<f64> for Delta {
    fn from(v: f64) -> Self {
        Delta::Float(v)
    }
}

/// What an operation does to its field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Operand {
    /// Replace the value with pre-formatted JSON text
    Set {
        /// Replacement text, spliced verbatim
        value: SetValue,
    },
    /// Add a delta to a numeric or numeric-string value
    Incr {
        /// Amount to add
        #[serde(default)]
        delta: Delta,
    },
}

/// Operation kind without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OpKind {
    /// Field replacement
    Set,
    /// Field increment
    Incr,
}

impl fmt::Display for OpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OpKind::Set => f.write_str("set"),
            OpKind::Incr => f.write_str("incr"),
        }
    }
}

/// One mutation of one top-level field
///
/// # Example
///
/// ```
/// use fieldpatch_core::{FieldOp, SetValue};
///
/// let batch = vec![
///     FieldOp::set("name", SetValue::string("bye")),
///     FieldOp::incr("visits"),
///     FieldOp::incr_by("score", 3),
/// ];
/// assert_eq!(batch.len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldOp {
    /// Top-level field name, unescaped
    pub field: String,
    /// Mutation to apply
    #[serde(flatten)]
    pub operand: Operand,
}

impl FieldOp {
    /// Replace `field` with `value`
    pub fn set(field: impl Into<String>, value: impl Into<SetValue>) -> Self {
        FieldOp {
            field: field.into(),
            operand: Operand::Set {
                value: value.into(),
            },
        }
    }

    /// Increment `field` by one
    pub fn incr(field: impl Into<String>) -> Self {
        Self::incr_by(field, Delta::default())
    }

    /// Increment `field` by `delta`
    pub fn incr_by(field: impl Into<String>, delta: impl Into<Delta>) -> Self {
        FieldOp {
            field: field.into(),
            operand: Operand::Incr {
                delta: delta.into(),
            },
        }
    }

    /// Kind of this operation
    pub fn kind(&self) -> OpKind {
        match self.operand {
            Operand::Set { .. } => OpKind::Set,
            Operand::Incr { .. } => OpKind::Incr,
        }
    }
}
