//! Property tests for the patch engine
//!
//! - Untouched fields stay byte-identical under set and increment
//! - Integer increments are exact
//! - Scanning arbitrary text never panics

use fieldpatch_core::{Delta, FieldOp, SetValue, ValueKind};
use fieldpatch_patch::{apply_batch, incr_field, locate, set_field};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn object_strategy() -> impl Strategy<Value = Map<String, Value>> {
    let value = prop_oneof![
        any::<i32>().prop_map(Value::from),
        "[a-z ]{0,8}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        prop::collection::vec(any::<i16>(), 0..4).prop_map(Value::from),
    ];
    prop::collection::btree_map("[a-z]{1,6}", value, 1..8)
        .prop_map(|m| m.into_iter().collect::<Map<String, Value>>())
}

/// Text of every top-level value except `skip`, in document order
fn other_values(doc: &str, obj: &Map<String, Value>, skip: &str) -> Vec<String> {
    obj.keys()
        .filter(|k| k.as_str() != skip)
        .map(|k| locate(doc, k).unwrap().unwrap().value(doc).to_string())
        .collect()
}

proptest! {
    #[test]
    fn set_leaves_other_fields_untouched(obj in object_strategy(), pick in any::<prop::sample::Index>(), new in "[a-z]{0,10}") {
        let doc = serde_json::to_string(&obj).unwrap();
        let keys: Vec<&String> = obj.keys().collect();
        let target = keys[pick.index(keys.len())].clone();

        let out = set_field(&doc, &target, &SetValue::string(&new)).unwrap();

        prop_assert_eq!(other_values(&doc, &obj, &target), other_values(&out, &obj, &target));
        let parsed: Map<String, Value> = serde_json::from_str(&out).unwrap();
        let mut expected = obj.clone();
        expected.insert(target, Value::from(new));
        prop_assert_eq!(parsed, expected);
    }

    #[test]
    fn integer_increment_is_exact(start in any::<i64>(), delta in any::<i64>()) {
        let doc = format!(r#"{{"n":{},"s":"{}"}}"#, start, start);
        let expected = (start as i128 + delta as i128).to_string();

        let out = incr_field(&doc, "n", Delta::Int(delta)).unwrap();
        prop_assert_eq!(locate(&out, "n").unwrap().unwrap().value(&out), expected.as_str());

        let out = incr_field(&doc, "s", Delta::Int(delta)).unwrap();
        let loc = locate(&out, "s").unwrap().unwrap();
        prop_assert_eq!(loc.kind, ValueKind::NumericString);
        prop_assert_eq!(loc.value(&out), format!("\"{}\"", expected));
    }

    #[test]
    fn batch_of_increments_matches_sum(start in -1000i64..1000, deltas in prop::collection::vec(-50i64..50, 1..10)) {
        let doc = format!(r#"{{"c":{}}}"#, start);
        let ops: Vec<FieldOp> = deltas.iter().map(|d| FieldOp::incr_by("c", *d)).collect();
        let out = apply_batch(&doc, &ops).unwrap();
        prop_assert_eq!(out, format!(r#"{{"c":{}}}"#, start + deltas.iter().sum::<i64>()));
    }

    #[test]
    fn scanning_arbitrary_text_never_panics(text in ".{0,64}", field in "[a-z]{1,3}") {
        let _ = locate(&text, &field);
        let _ = apply_batch(&text, &[FieldOp::incr(field)]);
    }

    #[test]
    fn scanning_json_like_text_never_panics(text in r#"[{}\[\]":,a-c0-9\\ .e-]{0,40}"#) {
        let _ = locate(&text, "a");
        let _ = set_field(&text, "a", &SetValue::raw("1"));
    }
}
