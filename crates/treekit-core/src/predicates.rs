//! Type predicates
//!
//! `is_plain_object` and `is_sequence` are the only recurse-vs-leaf tests the
//! merge, clone and equality walks use. Encoders built on top of this crate
//! rely on the same split, so their meaning is part of the public contract:
//! a plain object is an `Object` (never a date, set, map, array, function or
//! null), a sequence is an `Array`.

use crate::value::{Kind, Value};

pub fn is_plain_object(value: &Value) -> bool {
    value.kind() == Kind::PlainObject
}

pub fn is_sequence(value: &Value) -> bool {
    value.kind() == Kind::Sequence
}

/// Plain object or sequence: the values deep operations descend into.
pub fn is_traversable(value: &Value) -> bool {
    is_plain_object(value) || is_sequence(value)
}

pub fn is_function(value: &Value) -> bool {
    value.kind() == Kind::Function
}

pub fn is_string(value: &Value) -> bool {
    value.kind() == Kind::String
}

pub fn is_number(value: &Value) -> bool {
    value.kind() == Kind::Number
}

pub fn is_boolean(value: &Value) -> bool {
    value.kind() == Kind::Boolean
}

pub fn is_date(value: &Value) -> bool {
    value.kind() == Kind::Date
}

pub fn is_set(value: &Value) -> bool {
    value.kind() == Kind::Set
}

pub fn is_map(value: &Value) -> bool {
    value.kind() == Kind::Map
}

/// Null or undefined.
pub fn is_nullish(value: &Value) -> bool {
    matches!(value, Value::Null | Value::Undefined)
}

/// Falsy-or-empty check used by option handling.
///
/// Numbers are never empty, zero included. Undefined, null, `false` and the
/// empty string are empty. Containers are never empty, whatever their size.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Undefined | Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
