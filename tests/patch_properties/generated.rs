//! Generated documents through the full stack

use crate::common::*;
use fieldpatch::PatcherConfig;
use proptest::prelude::*;
use serde_json::{Map, Value};

fn document() -> impl Strategy<Value = Map<String, Value>> {
    let value = prop_oneof![
        any::<i32>().prop_map(Value::from),
        "[a-z ]{0,6}".prop_map(Value::from),
        any::<bool>().prop_map(Value::from),
        Just(Value::Null),
        prop::collection::vec(any::<u8>(), 0..3).prop_map(Value::from),
    ];
    prop::collection::btree_map("[a-z]{1,5}", value, 1..6)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn set_matches_serde_json(obj in document(), pick in any::<prop::sample::Index>(), new in any::<i64>()) {
        let doc = serde_json::to_string(&obj).unwrap();
        let field = obj.keys().nth(pick.index(obj.len())).unwrap().clone();

        for v in VARIANTS {
            let p = ready_patcher(PatcherConfig::default());
            v.seed(&p, &doc);
            v.set(&p, &field, new).unwrap();

            let mut expected = obj.clone();
            expected.insert(field.clone(), Value::from(new));
            prop_assert_eq!(v.parsed(&p), Value::Object(expected));
        }
    }

    #[test]
    fn increment_matches_integer_sum(start in any::<i32>(), deltas in prop::collection::vec(any::<i32>(), 1..5)) {
        let doc = format!(r#"{{"n":{},"other":"x"}}"#, start);
        let expected = start as i64 + deltas.iter().map(|d| *d as i64).sum::<i64>();

        for v in VARIANTS {
            let p = ready_patcher(PatcherConfig::default());
            v.seed(&p, &doc);
            let pairs = deltas.iter().map(|d| ("n", *d as i64)).collect();
            let out = v.incr_many(&p, pairs).unwrap();
            prop_assert_eq!(out, format!(r#"{{"n":{},"other":"x"}}"#, expected));
        }
    }
}
