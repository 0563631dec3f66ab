//! Deep and shallow equality
//!
//! Deep equality rules, evaluated in order:
//! 1. different `typeof`: not equal
//! 2. either is null: equal iff both are null
//! 3. dates: same epoch millisecond
//! 4. arrays: same length, pairwise deep-equal; never equal to a non-array
//! 5. sets: same size, every member of `a` is a member of `b` (under
//!    structural membership, each member of `b` pairs with at most one of `a`)
//! 6. maps: same size, every key of `a` present in `b` with a deep-equal value
//! 7. plain objects: same key set, every value deep-equal
//! 8. anything else: strict equality
//!
//! Pairs of containers already being compared higher up are assumed equal,
//! which keeps cyclic inputs from recursing forever.

use crate::ancestry::Ancestry;
use crate::value::Value;

/// How set members are matched against the other set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Membership {
    /// Host `Set.has` semantics: primitives by value, handles by identity.
    #[default]
    Identity,
    /// A member matches any deep-equal member of the other set.
    Structural,
}

/// Knobs for [`deep_equal_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EqualOptions {
    pub set_membership: Membership,
}

/// Host `===`: primitives by value, dates by instant, handles by identity.
pub fn strict_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Undefined, Value::Undefined) | (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(x), Value::Number(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Date(x), Value::Date(y)) => x == y,
        _ => a.same_ref(b),
    }
}

/// Like [`strict_equal`] except NaN equals NaN. Used for set membership and
/// map key lookup.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x == y || (x.is_nan() && y.is_nan()),
        _ => strict_equal(a, b),
    }
}

/// Structural equality with default options.
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    deep_equal_with(a, b, &EqualOptions::default())
}

/// Structural equality.
pub fn deep_equal_with(a: &Value, b: &Value, options: &EqualOptions) -> bool {
    Comparer {
        options,
        ancestry: Ancestry::new(),
    }
    .equal(a, b)
}

struct Comparer<'a> {
    options: &'a EqualOptions,
    ancestry: Ancestry<(usize, usize), ()>,
}

impl Comparer<'_> {
    fn equal(&mut self, a: &Value, b: &Value) -> bool {
        if a.typeof_name() != b.typeof_name() {
            return false;
        }

        match (a, b) {
            (Value::Null, _) | (_, Value::Null) => matches!((a, b), (Value::Null, Value::Null)),

            (Value::Date(x), Value::Date(y)) => x.timestamp_millis() == y.timestamp_millis(),

            (Value::Array(x), Value::Array(y)) => self.nested(x.addr(), y.addr(), |this| {
                let (xs, ys) = (x.to_vec(), y.to_vec());
                xs.len() == ys.len() && xs.iter().zip(&ys).all(|(p, q)| this.equal(p, q))
            }),
            (Value::Array(_), _) | (_, Value::Array(_)) => false,

            (Value::Set(x), Value::Set(y)) => self.nested(x.addr(), y.addr(), |this| {
                let (xs, ys) = (x.values(), y.values());
                xs.len() == ys.len() && this.members(&xs, &ys)
            }),

            (Value::Map(x), Value::Map(y)) => self.nested(x.addr(), y.addr(), |this| {
                x.len() == y.len()
                    && x.entries().iter().all(|(key, value)| match y.get(key) {
                        Some(other) => this.equal(value, &other),
                        None => false,
                    })
            }),

            (Value::Object(x), Value::Object(y)) => self.nested(x.addr(), y.addr(), |this| {
                x.len() == y.len()
                    && x.entries().iter().all(|(key, value)| match y.get(key) {
                        Some(other) => this.equal(value, &other),
                        None => false,
                    })
            }),

            _ => strict_equal(a, b),
        }
    }

    fn nested(&mut self, a: usize, b: usize, compare: impl FnOnce(&mut Self) -> bool) -> bool {
        if self.ancestry.any(|pair, _| *pair == (a, b)) {
            return true;
        }
        self.ancestry.push((a, b), ());
        let equal = compare(self);
        self.ancestry.pop();
        equal
    }

    fn members(&mut self, xs: &[Value], ys: &[Value]) -> bool {
        let membership = self.options.set_membership;
        match membership {
            Membership::Identity => xs
                .iter()
                .all(|item| ys.iter().any(|candidate| same_value_zero(item, candidate))),
            Membership::Structural => {
                let mut unmatched: Vec<&Value> = ys.iter().collect();
                for item in xs {
                    match unmatched.iter().position(|candidate| self.equal(item, candidate)) {
                        Some(i) => {
                            unmatched.swap_remove(i);
                        }
                        None => return false,
                    }
                }
                true
            }
        }
    }
}

/// One-level equality.
///
/// Values of the same `typeof` that are the same handle (or strictly equal
/// primitives) are equal without further work. Containers of the same kind
/// are equal when they have the same own keys (indices, keys, members or map
/// keys) and each pair of values is strictly equal.
pub fn shallow_equal(a: &Value, b: &Value) -> bool {
    if a.typeof_name() != b.typeof_name() {
        return false;
    }
    if matches!(a, Value::Null) || matches!(b, Value::Null) {
        return matches!((a, b), (Value::Null, Value::Null));
    }
    if strict_equal(a, b) {
        return true;
    }

    match (a, b) {
        (Value::Array(x), Value::Array(y)) => {
            let (xs, ys) = (x.to_vec(), y.to_vec());
            xs.len() == ys.len() && xs.iter().zip(&ys).all(|(p, q)| strict_equal(p, q))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .entries()
                    .iter()
                    .all(|(key, value)| y.get(key).is_some_and(|other| strict_equal(value, &other)))
        }
        (Value::Set(x), Value::Set(y)) => {
            x.len() == y.len() && x.values().iter().all(|item| y.contains(item))
        }
        (Value::Map(x), Value::Map(y)) => {
            x.len() == y.len()
                && x
                    .entries()
                    .iter()
                    .all(|(key, value)| y.get(key).is_some_and(|other| strict_equal(value, &other)))
        }
        _ => false,
    }
}
