//! Set touches only its field
//!
//! Neighbouring values, key order and whitespace survive byte-for-byte.

use crate::common::*;
use fieldpatch::{PatcherConfig, SetValue};
use serde_json::json;

#[test]
fn set_leaves_neighbours_byte_identical() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"a":1.50,"b":"old","c":[ 1 ,2 ]}"#);

        let out = v.set(&p, "b", "new").unwrap();
        assert_eq!(out, r#"{"a":1.50,"b":"new","c":[ 1 ,2 ]}"#, "{:?}", v);
        assert_eq!(v.stored(&p), out);
    }
}

#[test]
fn set_keeps_key_order() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"z":1,"m":2,"a":3}"#);
        let out = v.set(&p, "m", 20).unwrap();
        assert_eq!(out, r#"{"z":1,"m":20,"a":3}"#);
    }
}

#[test]
fn set_object_value_reparses_to_same_structure() {
    let value = json!({"list": [1, "two", {"three": 3}], "flag": false, "none": null});
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"a":0,"b":null}"#);
        v.set(&p, "b", &value).unwrap();
        assert_eq!(v.parsed(&p)["b"], value);
        assert_eq!(v.parsed(&p)["a"], json!(0));
    }
}

#[test]
fn set_string_is_escaped() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"s":""}"#);
        v.set(&p, "s", "line\n\"quoted\"\\").unwrap();
        assert_eq!(v.parsed(&p)["s"], json!("line\n\"quoted\"\\"));
    }
}

#[test]
fn set_many_applies_in_order() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"a":2,"b":"hello","c":"test"}"#);
        let out = v
            .set_many(
                &p,
                vec![
                    ("b", SetValue::from("bye")),
                    ("a", SetValue::from(3)),
                    ("c", SetValue::from("test2")),
                    ("b", SetValue::from("final")),
                ],
            )
            .unwrap();
        assert_eq!(out, r#"{"a":3,"b":"final","c":"test2"}"#);
    }
}

#[test]
fn nested_field_with_same_name_is_not_touched() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"inner":{"target":1},"target":2}"#);
        let out = v.set(&p, "target", 9).unwrap();
        assert_eq!(out, r#"{"inner":{"target":1},"target":9}"#);
    }
}
