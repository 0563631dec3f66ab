//! Value tree scenarios
//!
//! End-to-end checks of merge, clone and equality through the public API.

use serde_json::json;
use std::sync::Arc;
use std::thread;
use treekit::{
    deep_clone, deep_equal, deep_merge, shallow_clone, shallow_equal, shallow_merge, Object,
    Value, ValueMap,
};

fn v(json: serde_json::Value) -> Value {
    Value::from(json)
}

// =============================================================================
// Merge
// =============================================================================

#[test]
fn test_deep_merge_nested_objects() {
    let target = v(json!({"a": {"b": 1}}));
    let result = deep_merge(&target, &[v(json!({"a": {"b": 1, "c": 2}}))]);

    assert!(deep_equal(&result, &v(json!({"a": {"b": 1, "c": 2}}))));
}

#[test]
fn test_shallow_merge_last_source_wins() {
    let target = v(json!({"a": 1, "b": 2}));
    let result = shallow_merge(&target, &[v(json!({"b": 3, "c": 4}))]);

    assert!(deep_equal(&result, &v(json!({"a": 1, "b": 3, "c": 4}))));
}

#[test]
fn test_deep_merge_chaining_matches_single_call() {
    let a = v(json!({"x": {"y": [1, 2], "z": "a"}, "k": 1}));
    let b = v(json!({"x": {"y": [3], "w": null}, "k": {"nested": true}}));

    let once = deep_merge(&Value::object(), &[a.clone(), b.clone()]);
    let chained = deep_merge(&deep_merge(&Value::object(), &[a]), &[b]);

    assert!(deep_equal(&once, &chained));
    assert!(deep_equal(
        &once,
        &v(json!({"x": {"y": [3, 2], "z": "a", "w": null}, "k": {"nested": true}}))
    ));
}

#[test]
fn test_concurrent_merges_into_disjoint_targets() {
    let source = Arc::new(v(json!({"settings": {"depth": 3, "tags": ["a", "b"]}})));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let source = Arc::clone(&source);
            thread::spawn(move || {
                let target = v(json!({"id": i}));
                deep_merge(&target, &[(*source).clone()]);
                target
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let merged = handle.join().unwrap();
        assert!(deep_equal(
            &merged,
            &v(json!({"id": i, "settings": {"depth": 3, "tags": ["a", "b"]}}))
        ));
    }
}

// =============================================================================
// Clone
// =============================================================================

#[test]
fn test_deep_clone_nested_references_are_independent() {
    let original = v(json!({"a": {"b": 1, "c": [2, 3]}}));
    let copy = deep_clone(&original);

    assert!(deep_equal(&copy, &original));
    assert!(!copy.same_ref(&original));
    let (a, copy_a) = (original.get("a").unwrap(), copy.get("a").unwrap());
    assert!(!copy_a.same_ref(&a));
    assert!(!copy_a.get("c").unwrap().same_ref(&a.get("c").unwrap()));
}

#[test]
fn test_shallow_vs_deep_clone_divergence() {
    let original = v(json!({"a": {"b": 1}}));
    let original_a = original.get("a").unwrap();
    let shallow_a = shallow_clone(&original).get("a").unwrap();
    let deep_a = deep_clone(&original).get("a").unwrap();

    assert!(shallow_a.same_ref(&original_a));
    assert!(!deep_a.same_ref(&original_a));
    assert!(deep_equal(&shallow_a, &original_a));
    assert!(deep_equal(&deep_a, &original_a));
}

#[test]
fn test_shallow_clone_array_keeps_elements() {
    let original = v(json!([1, 2, 3]));
    let copy = shallow_clone(&original);

    assert!(!copy.same_ref(&original));
    assert!(deep_equal(&copy, &original));
    let (xs, ys) = (
        original.as_array().unwrap().to_vec(),
        copy.as_array().unwrap().to_vec(),
    );
    assert!(xs.iter().zip(&ys).all(|(x, y)| treekit::strict_equal(x, y)));
}

// =============================================================================
// Equality
// =============================================================================

#[test]
fn test_deep_equal_leaf_type_mismatch() {
    assert!(!deep_equal(&v(json!({"a": 1})), &v(json!({"a": "1"}))));
}

#[test]
fn test_sequence_never_equals_plain_object() {
    assert!(!deep_equal(&v(json!([1, 2])), &v(json!({"0": 1, "1": 2}))));
}

#[test]
fn test_deep_equal_distinct_maps_with_nested_values() {
    let build = || {
        let map = ValueMap::new();
        map.insert(Value::from("first"), v(json!({"list": [1, {"x": true}]})));
        map.insert(Value::from(2), v(json!({"empty": {}})));
        Value::Map(map)
    };
    let (a, b) = (build(), build());

    assert!(!a.same_ref(&b));
    assert!(deep_equal(&a, &b));
    assert!(deep_equal(&b, &a));
}

#[test]
fn test_shallow_equal_one_level() {
    assert!(!shallow_equal(&v(json!({"a": {"b": 1}})), &v(json!({"a": {"b": 1}}))));
    assert!(shallow_equal(&v(json!({"a": 1})), &v(json!({"a": 1}))));
}

#[test]
fn test_equality_never_mutates_inputs() {
    let obj = Object::new();
    obj.insert("a", v(json!([1, 2])));
    let a = Value::Object(obj);
    let b = deep_clone(&a);

    assert!(deep_equal(&a, &b));
    assert!(shallow_equal(&a, &a));
    assert_eq!(a.as_object().unwrap().keys(), vec!["a".to_string()]);
    assert!(deep_equal(&a, &v(json!({"a": [1, 2]}))));
}
