//! Set, increment and batch application
//!
//! Every operation re-locates its field by name against the current text,
//! because a splice shifts all downstream offsets. A batch is checked for
//! well-formedness once, then applied in order to a working copy; on the
//! first failure the copy is dropped, so callers only ever see the original
//! text or the fully patched one.

use crate::number;
use crate::scan::{self, FieldLocation};
use fieldpatch_core::{Delta, FieldOp, Limits, Operand, PatchError, SetValue, ValueKind};

/// Patch engine configured with [`Limits`]
///
/// Stateless apart from its limits; one instance can serve any number of
/// documents concurrently.
#[derive(Debug, Clone, Default)]
pub struct PatchEngine {
    limits: Limits,
}

impl PatchEngine {
    /// Create an engine with the given limits
    pub fn new(limits: Limits) -> Self {
        Self { limits }
    }

    /// Limits in force
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Apply `ops` to `doc` in order
    ///
    /// Returns the patched document, or the first failure. On failure no
    /// partial result exists.
    ///
    /// # Example
    ///
    /// ```
    /// use fieldpatch_core::FieldOp;
    /// use fieldpatch_patch::PatchEngine;
    ///
    /// let engine = PatchEngine::default();
    /// let doc = r#"{"a":2,"b":4,"c":6}"#;
    /// let ops = [FieldOp::incr_by("a", 1), FieldOp::incr_by("b", 2), FieldOp::incr_by("c", 7)];
    /// assert_eq!(engine.apply(doc, &ops).unwrap(), r#"{"a":3,"b":6,"c":13}"#);
    /// ```
    pub fn apply(&self, doc: &str, ops: &[FieldOp]) -> Result<String, PatchError> {
        self.limits.validate_document(doc)?;
        self.limits.validate_batch(ops.len())?;
        self.validate(doc)?;

        let mut working = doc.to_string();
        for (index, op) in ops.iter().enumerate() {
            working = self.apply_one(&working, op, index)?;
        }

        self.limits.validate_document(&working)?;
        Ok(working)
    }

    /// Check that the whole document is one well-formed object
    ///
    /// Per-operation checks run in order as each operation is applied, so
    /// the error returned is always that of the first failing operation.
    fn validate(&self, doc: &str) -> Result<(), PatchError> {
        scan::entries(doc, &self.limits)?;
        Ok(())
    }

    fn apply_one(&self, doc: &str, op: &FieldOp, index: usize) -> Result<String, PatchError> {
        let location = scan::locate_with(doc, &op.field, &self.limits)?.ok_or_else(|| {
            PatchError::NotFound {
                field: op.field.clone(),
                index,
            }
        })?;

        match &op.operand {
            Operand::Set { value } => {
                self.check_set_value(&op.field, value, index)?;
                Ok(splice(doc, &location, value.as_str()))
            }
            Operand::Incr { delta } => {
                let replacement = incremented(doc, &location, &op.field, *delta, index)?;
                Ok(splice(doc, &location, &replacement))
            }
        }
    }

    /// Replacement text must be exactly one JSON value
    fn check_set_value(&self, field: &str, value: &SetValue, index: usize) -> Result<(), PatchError> {
        if value.is_blank() {
            return Err(PatchError::EmptyValue {
                field: field.to_string(),
                index,
            });
        }
        match scan::value_kind(value.as_str(), &self.limits) {
            Ok(_) => Ok(()),
            Err(PatchError::MalformedDocument { reason, .. }) => Err(PatchError::InvalidValue {
                field: field.to_string(),
                reason,
                index,
            }),
            Err(e) => Err(e),
        }
    }
}

/// Apply a batch with default limits
pub fn apply_batch(doc: &str, ops: &[FieldOp]) -> Result<String, PatchError> {
    PatchEngine::default().apply(doc, ops)
}

/// Replace one top-level field with default limits
///
/// # Example
///
/// ```
/// use fieldpatch_core::SetValue;
/// use fieldpatch_patch::set_field;
///
/// let doc = r#"{"a":2,"b":"hello","c":"test"}"#;
/// let out = set_field(doc, "b", &SetValue::string("bye")).unwrap();
/// assert_eq!(out, r#"{"a":2,"b":"bye","c":"test"}"#);
/// ```
pub fn set_field(doc: &str, field: &str, value: &SetValue) -> Result<String, PatchError> {
    apply_batch(doc, &[FieldOp::set(field, value.clone())])
}

/// Increment one top-level field with default limits
///
/// # Example
///
/// ```
/// use fieldpatch_core::Delta;
/// use fieldpatch_patch::incr_field;
///
/// assert_eq!(incr_field(r#"{"a":"2"}"#, "a", Delta::default()).unwrap(), r#"{"a":"3"}"#);
/// ```
pub fn incr_field(doc: &str, field: &str, delta: Delta) -> Result<String, PatchError> {
    apply_batch(doc, &[FieldOp::incr_by(field, delta)])
}

fn check_incrementable(field: &str, kind: ValueKind, index: usize) -> Result<(), PatchError> {
    if !kind.is_numeric() {
        return Err(PatchError::TypeMismatch {
            field: field.to_string(),
            found: kind,
            index,
        });
    }
    Ok(())
}

/// New value text for an increment, keeping the value's representation
fn incremented(
    doc: &str,
    location: &FieldLocation,
    field: &str,
    delta: Delta,
    index: usize,
) -> Result<String, PatchError> {
    check_incrementable(field, location.kind, index)?;
    let text = location.value(doc);
    let numeric = match location.kind {
        ValueKind::NumericString => &text[1..text.len() - 1],
        _ => text,
    };
    let sum = number::add(numeric, delta).ok_or_else(|| PatchError::NonFiniteResult {
        field: field.to_string(),
        index,
    })?;
    Ok(match location.kind {
        ValueKind::NumericString => format!("\"{}\"", sum),
        _ => sum,
    })
}

fn splice(doc: &str, location: &FieldLocation, replacement: &str) -> String {
    let mut out = String::with_capacity(doc.len() - location.range().len() + replacement.len());
    out.push_str(&doc[..location.value_start]);
    out.push_str(replacement);
    out.push_str(&doc[location.value_end..]);
    out
}
