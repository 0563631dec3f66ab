//! Deep and shallow clone

use crate::ancestry::Ancestry;
use crate::value::{Array, Object, Value, ValueMap, ValueSet};

/// What [`shallow_clone_with`] does with containers nested one level down
/// inside a plain object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NestedCopy {
    /// Nested containers stay shared with the original.
    #[default]
    Alias,
    /// Nested objects and arrays get one shallow copy of their own; anything
    /// deeper stays shared.
    OneLevel,
}

/// Structurally independent copy of `value`.
///
/// Arrays and plain objects are copied recursively. Maps are copied with the
/// same key handles and deep-cloned values; sets are copied with the same
/// member handles, since both are looked up by identity. Primitives, dates
/// and functions are returned as-is.
///
/// A container reached again through one of its own descendants is linked
/// to its copy, so a cyclic input yields a clone with the same cycles.
pub fn deep_clone(value: &Value) -> Value {
    clone_tree(value, &mut Ancestry::new())
}

fn clone_tree(value: &Value, ancestry: &mut Ancestry<usize, Value>) -> Value {
    if let Some(copy) = value.addr().and_then(|addr| ancestry.find(&addr)) {
        return copy.clone();
    }

    match value {
        Value::Array(items) => {
            let copy = Array::new();
            ancestry.push(items.addr(), Value::Array(copy.clone()));
            for item in items.to_vec() {
                copy.push(clone_tree(&item, ancestry));
            }
            ancestry.pop();
            Value::Array(copy)
        }
        Value::Object(entries) => {
            let copy = Object::new();
            ancestry.push(entries.addr(), Value::Object(copy.clone()));
            for (key, item) in entries.entries() {
                let item = clone_tree(&item, ancestry);
                copy.insert(key, item);
            }
            ancestry.pop();
            Value::Object(copy)
        }
        Value::Map(entries) => {
            let copy = ValueMap::new();
            ancestry.push(entries.addr(), Value::Map(copy.clone()));
            for (key, item) in entries.entries() {
                let item = clone_tree(&item, ancestry);
                copy.insert(key, item);
            }
            ancestry.pop();
            Value::Map(copy)
        }
        Value::Set(members) => Value::Set(members.values().into_iter().collect::<ValueSet>()),
        other => other.clone(),
    }
}

/// One-level copy with nested containers aliased.
pub fn shallow_clone(value: &Value) -> Value {
    shallow_clone_with(value, NestedCopy::Alias)
}

/// One-level copy.
///
/// Arrays, sets and maps are copied with the same element handles. Plain
/// objects are copied with the same top-level values, or with nested
/// objects and arrays copied once more under [`NestedCopy::OneLevel`].
/// Anything else is returned unchanged.
pub fn shallow_clone_with(value: &Value, nested: NestedCopy) -> Value {
    match value {
        Value::Array(items) => Value::Array(Array::from_vec(items.to_vec())),
        Value::Object(entries) => Value::Object(
            entries
                .entries()
                .into_iter()
                .map(|(key, item)| match nested {
                    NestedCopy::Alias => (key, item),
                    NestedCopy::OneLevel => (key, copy_one_level(&item)),
                })
                .collect(),
        ),
        Value::Set(members) => Value::Set(members.values().into_iter().collect()),
        Value::Map(entries) => Value::Map(entries.entries().into_iter().collect()),
        other => other.clone(),
    }
}

fn copy_one_level(value: &Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(Array::from_vec(items.to_vec())),
        Value::Object(entries) => Value::Object(entries.entries().into_iter().collect()),
        other => other.clone(),
    }
}
