//! Value tree utilities.
//!
//! A dynamic [`Value`] model (primitives, dates, functions, arrays, plain
//! objects, sets and maps) with the operations that treat it as a tree:
//! deep and shallow merge, deep and shallow clone, deep and shallow
//! equality.
//!
//! Containers are shared handles. Everything here is synchronous and free of
//! I/O and global state; only the `target` of a merge is ever mutated.

mod ancestry;
mod clone;
mod equal;
mod error;
mod json;
mod merge;
mod predicates;
mod value;

pub use clone::{deep_clone, shallow_clone, shallow_clone_with, NestedCopy};
pub use equal::{
    deep_equal, deep_equal_with, same_value_zero, shallow_equal, strict_equal, EqualOptions,
    Membership,
};
pub use error::ConvertError;
pub use json::to_json;
pub use merge::{deep_merge, merge_layers, shallow_merge};
pub use predicates::{
    is_boolean, is_date, is_empty, is_function, is_map, is_nullish, is_number, is_plain_object,
    is_sequence, is_set, is_string, is_traversable,
};
pub use value::{Array, Function, Kind, Object, Value, ValueMap, ValueSet};
