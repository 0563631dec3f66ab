//! Merge logic
//!
//! Deep merge semantics, applied per own key of each source, left to right:
//! - Objects and arrays: merged into a target container of the same kind
//!   (created fresh when the slot is missing or holds another kind)
//! - Everything else: overwrites the target slot (handles are shared)
//!
//! Both merges mutate `target` in place. They are not atomic across keys:
//! concurrent merges into one target interleave key by key.

use crate::ancestry::Ancestry;
use crate::predicates::{is_nullish, is_sequence, is_traversable};
use crate::value::{parse_index, Value};

enum Key {
    Name(String),
    Index(usize),
}

fn own_entries(source: &Value) -> Vec<(Key, Value)> {
    match source {
        Value::Object(o) => o
            .entries()
            .into_iter()
            .map(|(k, v)| (Key::Name(k), v))
            .collect(),
        Value::Array(a) => a
            .to_vec()
            .into_iter()
            .enumerate()
            .map(|(i, v)| (Key::Index(i), v))
            .collect(),
        _ => Vec::new(),
    }
}

fn get_key(target: &Value, key: &Key) -> Option<Value> {
    match (target, key) {
        (Value::Object(o), Key::Name(k)) => o.get(k),
        (Value::Object(o), Key::Index(i)) => o.get(&i.to_string()),
        (Value::Array(a), Key::Index(i)) => a.get(*i),
        (Value::Array(a), Key::Name(k)) => parse_index(k).and_then(|i| a.get(i)),
        _ => None,
    }
}

fn set_key(target: &Value, key: Key, value: Value) {
    match (target, key) {
        (Value::Object(o), Key::Name(k)) => {
            o.insert(k, value);
        }
        (Value::Object(o), Key::Index(i)) => {
            o.insert(i.to_string(), value);
        }
        (Value::Array(a), Key::Index(i)) => {
            a.set(i, value);
        }
        // Arrays only take index keys; other names are dropped.
        (Value::Array(a), Key::Name(k)) => {
            if let Some(i) = parse_index(&k) {
                a.set(i, value);
            }
        }
        _ => {}
    }
}

/// Deep merge `sources` into `target`, returning the target handle.
///
/// Null and undefined sources are skipped; so are sources without own keys
/// (anything but objects and arrays). A target that is not an object or
/// array is returned untouched.
pub fn deep_merge(target: &Value, sources: &[Value]) -> Value {
    let mut ancestry = Ancestry::new();
    for source in sources {
        if is_nullish(source) {
            continue;
        }
        merge_into(target, source, &mut ancestry);
    }
    target.clone()
}

/// Frames are keyed by source container and carry the target being filled
/// for it. A nested source that is one of those targets is still growing, so
/// it is linked by reference instead of walked.
fn merge_into(target: &Value, source: &Value, ancestry: &mut Ancestry<usize, Value>) {
    if !is_traversable(target) || !is_traversable(source) {
        return;
    }
    let (Some(target_addr), Some(source_addr)) = (target.addr(), source.addr()) else {
        return;
    };
    if ancestry.any(|src, tgt| *src == source_addr && tgt.addr() == Some(target_addr)) {
        return;
    }

    ancestry.push(source_addr, target.clone());
    for (key, value) in own_entries(source) {
        if !is_traversable(&value) {
            set_key(target, key, value);
            continue;
        }
        if ancestry.any(|_, filling| filling.same_ref(&value)) {
            set_key(target, key, value);
            continue;
        }

        match get_key(target, &key) {
            Some(existing) if existing.kind() == value.kind() => {
                merge_into(&existing, &value, ancestry);
            }
            _ => {
                // A source that is its own ancestor links back to the target
                // already being filled for it.
                let in_progress = value.addr().and_then(|addr| ancestry.find(&addr).cloned());
                match in_progress {
                    Some(linked) => set_key(target, key, linked),
                    None => {
                        let fresh = if is_sequence(&value) {
                            Value::array()
                        } else {
                            Value::object()
                        };
                        set_key(target, key, fresh.clone());
                        merge_into(&fresh, &value, ancestry);
                    }
                }
            }
        }
    }
    ancestry.pop();
}

/// Assign every own key of each source onto `target`, without recursion.
///
/// Nested containers end up shared between the source and the target.
pub fn shallow_merge(target: &Value, sources: &[Value]) -> Value {
    if is_traversable(target) {
        for source in sources {
            for (key, value) in own_entries(source) {
                set_key(target, key, value);
            }
        }
    }
    target.clone()
}

/// Merge layers in order (first is base, last has highest precedence) into
/// a fresh object.
pub fn merge_layers(layers: &[Value]) -> Value {
    deep_merge(&Value::object(), layers)
}
