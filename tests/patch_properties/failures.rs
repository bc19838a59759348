//! Failed calls report a typed error and leave the document unchanged

use crate::common::*;
use fieldpatch::{Error, ErrorKind, PatchError, PatcherConfig, SetValue};

const DOC: &str = r#"{"a":2,"b":"hello","nested":{"deep":1}}"#;

fn check_unchanged<F>(expected: ErrorKind, call: F)
where
    F: Fn(Variant, &fieldpatch::JsonPatcher) -> fieldpatch::Result<String>,
{
    for config in [PatcherConfig::default(), PatcherConfig::optimistic(4)] {
        for v in VARIANTS {
            let p = ready_patcher(config.clone());
            v.seed(&p, DOC);
            let err = call(v, &p).unwrap_err();
            assert_eq!(err.kind(), expected, "{:?}: {}", v, err);
            assert_eq!(v.stored(&p), DOC);
        }
    }
}

#[test]
fn nonexistent_field_is_not_found() {
    check_unchanged(ErrorKind::NotFound, |v, p| v.set(p, "missing", 1));
    check_unchanged(ErrorKind::NotFound, |v, p| v.incr(p, "missing"));
}

#[test]
fn nested_only_field_is_not_found() {
    check_unchanged(ErrorKind::NotFound, |v, p| v.incr(p, "deep"));
}

#[test]
fn increment_of_non_number_is_type_mismatch() {
    check_unchanged(ErrorKind::TypeMismatch, |v, p| v.incr(p, "b"));
    check_unchanged(ErrorKind::TypeMismatch, |v, p| v.incr(p, "nested"));
}

#[test]
fn failing_op_late_in_batch_rolls_back() {
    check_unchanged(ErrorKind::NotFound, |v, p| {
        v.incr_many(p, vec![("a", 1), ("missing", 1)])
    });
    check_unchanged(ErrorKind::TypeMismatch, |v, p| {
        v.incr_many(p, vec![("a", 1), ("b", 1)])
    });
    check_unchanged(ErrorKind::InvalidInput, |v, p| {
        v.set_many(p, vec![("a", SetValue::from(1)), ("b", SetValue::raw(""))])
    });
}

#[test]
fn blank_set_value_is_rejected() {
    check_unchanged(ErrorKind::InvalidInput, |v, p| v.set(p, "a", SetValue::raw("  ")));
}

#[test]
fn not_found_names_the_field_and_index() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, DOC);
        let err = v.incr_many(&p, vec![("a", 1), ("zz", 1)]).unwrap_err();
        assert!(
            matches!(err, Error::Patch(PatchError::NotFound { ref field, index: 1 }) if field == "zz"),
            "{err}"
        );
    }
}
