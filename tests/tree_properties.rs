//! Property-based tests for the tree operations.
//!
//! Generated trees are NaN-free, so strict number equality is reflexive.

use proptest::prelude::*;
use treekit::{
    deep_clone, deep_equal, deep_equal_with, deep_merge, shallow_clone, shallow_equal,
    EqualOptions, Function, Membership, Object, Value, ValueMap, ValueSet,
};

const STRUCTURAL: EqualOptions = EqualOptions {
    set_membership: Membership::Structural,
};

fn primitive() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        Just(Value::Undefined),
        any::<bool>().prop_map(Value::from),
        (-1.0e6f64..1.0e6).prop_map(Value::from),
        "[a-z]{0,6}".prop_map(Value::from),
    ]
}

fn leaf() -> impl Strategy<Value = Value> {
    prop_oneof![
        4 => primitive(),
        1 => (-1_000_000_000_000i64..4_000_000_000_000)
            .prop_filter_map("date in range", Value::date_millis),
        1 => "[a-z]{1,4}".prop_map(|name| Value::from(Function::new(name, |_| Value::Undefined))),
    ]
}

fn tree() -> impl Strategy<Value = Value> {
    leaf().prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..5).prop_map(Value::from),
            prop::collection::btree_map("[a-e]{1,2}", inner.clone(), 0..5)
                .prop_map(|entries| Value::Object(entries.into_iter().collect::<Object>())),
            prop::collection::vec(inner.clone(), 0..4)
                .prop_map(|items| Value::Set(items.into_iter().collect::<ValueSet>())),
            prop::collection::vec((primitive(), inner), 0..4)
                .prop_map(|entries| Value::Map(entries.into_iter().collect::<ValueMap>())),
        ]
    })
}

fn object_tree() -> impl Strategy<Value = Value> {
    prop::collection::btree_map("[a-e]{1,2}", tree(), 0..5)
        .prop_map(|entries| Value::Object(entries.into_iter().collect::<Object>()))
}

proptest! {
    #[test]
    fn prop_deep_clone_is_equal_and_distinct(value in tree()) {
        let copy = deep_clone(&value);
        prop_assert!(deep_equal(&value, &copy));
        if value.kind().is_container() {
            prop_assert!(!copy.same_ref(&value));
        }
    }

    #[test]
    fn prop_deep_equal_is_reflexive(value in tree()) {
        prop_assert!(deep_equal(&value, &value));
        prop_assert!(shallow_equal(&value, &value));
    }

    #[test]
    fn prop_deep_equal_is_symmetric(a in tree(), b in tree()) {
        prop_assert_eq!(deep_equal(&a, &b), deep_equal(&b, &a));
        prop_assert_eq!(shallow_equal(&a, &b), shallow_equal(&b, &a));
    }

    #[test]
    fn prop_structural_equality_is_symmetric(a in tree(), b in tree()) {
        prop_assert_eq!(
            deep_equal_with(&a, &b, &STRUCTURAL),
            deep_equal_with(&b, &a, &STRUCTURAL)
        );
    }

    #[test]
    fn prop_structural_sets_of_copies(items in prop::collection::vec(tree(), 0..4), extra in tree()) {
        let left = Value::Set(items.iter().map(deep_clone).collect::<ValueSet>());
        let right = Value::Set(items.iter().rev().map(deep_clone).collect::<ValueSet>());
        prop_assert!(deep_equal_with(&left, &right, &STRUCTURAL));

        let mut more = items.iter().map(deep_clone).collect::<Vec<_>>();
        more.push(extra);
        let grown = Value::Set(more.into_iter().collect::<ValueSet>());
        prop_assert_eq!(
            deep_equal_with(&left, &grown, &STRUCTURAL),
            deep_equal_with(&grown, &left, &STRUCTURAL)
        );
    }

    #[test]
    fn prop_shallow_equal_implies_deep_equal(value in tree()) {
        let copy = shallow_clone(&value);
        prop_assert!(shallow_equal(&value, &copy));
        prop_assert!(deep_equal(&value, &copy));
    }

    #[test]
    fn prop_merge_chaining(a in object_tree(), b in object_tree()) {
        let once = deep_merge(&Value::object(), &[a.clone(), b.clone()]);
        let chained = deep_merge(&deep_merge(&Value::object(), &[a]), &[b]);
        prop_assert!(deep_equal(&once, &chained));
    }

    #[test]
    fn prop_merge_into_empty_equals_source(a in object_tree()) {
        let merged = deep_merge(&Value::object(), &[a.clone()]);
        prop_assert!(deep_equal(&merged, &a));
    }

    #[test]
    fn prop_merge_leaves_sources_untouched(a in object_tree(), b in object_tree()) {
        let (a_before, b_before) = (deep_clone(&a), deep_clone(&b));
        let target = deep_clone(&a);
        deep_merge(&target, &[b.clone()]);
        prop_assert!(deep_equal(&a, &a_before));
        prop_assert!(deep_equal(&b, &b_before));
    }
}
