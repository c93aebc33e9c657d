//! Algebraic laws of the fragment merge, checked over generated fragments.
//!
//! Keys are drawn from a tiny alphabet so that operands collide often and
//! the nested-map, sequence and scalar paths are all exercised.

use profile_merge::{merge, merge_all, try_merge, Fragment};
use proptest::prelude::*;
use serde_json::{Map, Value};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(3, 24, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::btree_map("[a-d]", inner, 0..4)
                .prop_map(|m| Value::Object(m.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

fn fragment() -> impl Strategy<Value = Fragment> {
    prop::collection::btree_map("[a-d]", value(), 0..5)
        .prop_map(|m| m.into_iter().collect::<Fragment>())
}

proptest! {
    #[test]
    fn empty_is_right_identity(f in fragment()) {
        prop_assert_eq!(merge(&f, &Fragment::new()), f);
    }

    #[test]
    fn empty_is_left_identity(f in fragment()) {
        prop_assert_eq!(merge(&Fragment::new(), &f), f);
    }

    #[test]
    fn merge_is_idempotent(f in fragment()) {
        prop_assert_eq!(merge(&f, &f), f);
    }

    #[test]
    fn overlay_wins_unless_both_are_maps(base in fragment(), overlay in fragment()) {
        let merged = merge(&base, &overlay);
        for (key, overlay_value) in overlay.iter() {
            let both_maps = overlay_value.is_object()
                && base.as_map().get(key).map_or(false, Value::is_object);
            if !both_maps {
                prop_assert_eq!(merged.as_map().get(key), Some(overlay_value));
            }
        }
    }

    #[test]
    fn base_only_keys_survive(base in fragment(), overlay in fragment()) {
        let merged = merge(&base, &overlay);
        for (key, base_value) in base.iter() {
            if !overlay.contains_key(key) {
                prop_assert_eq!(merged.as_map().get(key), Some(base_value));
            }
        }
    }

    #[test]
    fn merge_all_is_a_left_fold(a in fragment(), b in fragment(), c in fragment()) {
        let folded = merge_all(a.clone(), [&b, &c]);
        prop_assert_eq!(folded, merge(&merge(&a, &b), &c));
    }

    #[test]
    fn strict_merge_agrees_when_it_succeeds(base in fragment(), overlay in fragment()) {
        if let Ok(strict) = try_merge(&base, &overlay) {
            prop_assert_eq!(strict, merge(&base, &overlay));
        }
    }
}
