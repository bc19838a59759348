//! Increment preserves representation and adds exactly

use crate::common::*;
use fieldpatch::PatcherConfig;

fn configs() -> [PatcherConfig; 2] {
    [PatcherConfig::default(), PatcherConfig::optimistic(4)]
}

#[test]
fn number_stays_number_and_string_stays_string() {
    for config in configs() {
        for v in VARIANTS {
            let p = ready_patcher(config.clone());
            v.seed(&p, r#"{"n":2,"s":"2"}"#);
            v.incr(&p, "n").unwrap();
            let out = v.incr(&p, "s").unwrap();
            assert_eq!(out, r#"{"n":3,"s":"3"}"#);
        }
    }
}

#[test]
fn default_delta_is_one_and_explicit_delta_adds() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"a":2}"#);
        assert_eq!(v.incr(&p, "a").unwrap(), r#"{"a":3}"#);
        v.seed(&p, r#"{"a":2}"#);
        assert_eq!(v.incr_by(&p, "a", 3).unwrap(), r#"{"a":5}"#);
    }
}

#[test]
fn negative_delta_crosses_zero() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"a":2,"s":"1"}"#);
        v.incr_by(&p, "a", -5).unwrap();
        let out = v.incr_by(&p, "s", -3).unwrap();
        assert_eq!(out, r#"{"a":-3,"s":"-2"}"#);
    }
}

#[test]
fn batch_sequencing() {
    for config in configs() {
        for v in VARIANTS {
            let p = ready_patcher(config.clone());
            v.seed(&p, r#"{"a":2,"b":4,"c":6}"#);
            let out = v.incr_many(&p, vec![("a", 1), ("b", 2), ("c", 7)]).unwrap();
            assert_eq!(out, r#"{"a":3,"b":6,"c":13}"#);
        }
    }
}

#[test]
fn same_field_twice_in_one_batch_accumulates() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"a":0}"#);
        let out = v.incr_many(&p, vec![("a", 10), ("a", 5)]).unwrap();
        assert_eq!(out, r#"{"a":15}"#);
    }
}

#[test]
fn large_integers_stay_exact() {
    for v in VARIANTS {
        let p = ready_patcher(PatcherConfig::default());
        v.seed(&p, r#"{"n":"99999999999999999999999999"}"#);
        let out = v.incr(&p, "n").unwrap();
        assert_eq!(out, r#"{"n":"100000000000000000000000000"}"#);
    }
}
