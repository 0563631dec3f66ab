//! Value tree model
//!
//! `Value` is a tagged union over primitives, dates, functions and four
//! container handles (`Array`, `Object`, `ValueSet`, `ValueMap`).
//!
//! Containers are shared handles: cloning a `Value` copies the handle, not the
//! contents, so two clones of the same `Array` observe each other's writes.
//! Use [`crate::deep_clone`] for an independent tree.

use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, TimeZone, Utc};
use indexmap::IndexMap;

use crate::equal::{deep_equal, same_value_zero};

/// Runtime category of a value.
///
/// Computed once per value by [`Value::kind`]; merge, clone and equality all
/// switch on it instead of probing the value ad hoc.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Date,
    Sequence,
    PlainObject,
    Set,
    Map,
    Function,
}

impl Kind {
    /// Name reported by the host `typeof` operator.
    pub fn typeof_name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Function => "function",
            Kind::Null
            | Kind::Date
            | Kind::Sequence
            | Kind::PlainObject
            | Kind::Set
            | Kind::Map => "object",
        }
    }

    /// Short human-readable name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            Kind::Undefined => "undefined",
            Kind::Null => "null",
            Kind::Boolean => "boolean",
            Kind::Number => "number",
            Kind::String => "string",
            Kind::Date => "date",
            Kind::Sequence => "array",
            Kind::PlainObject => "object",
            Kind::Set => "set",
            Kind::Map => "map",
            Kind::Function => "function",
        }
    }

    /// Whether values of this kind hold other values.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            Kind::Sequence | Kind::PlainObject | Kind::Set | Kind::Map
        )
    }
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

fn addr_of<T: ?Sized>(arc: &Arc<T>) -> usize {
    Arc::as_ptr(arc).cast::<()>() as usize
}

/// Shared, ordered, 0-indexed list of values.
#[derive(Clone, Default)]
pub struct Array(Arc<RwLock<Vec<Value>>>);

impl Array {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_vec(items: Vec<Value>) -> Self {
        Self(Arc::new(RwLock::new(items)))
    }

    pub fn len(&self) -> usize {
        read(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.0).is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Value> {
        read(&self.0).get(index).cloned()
    }

    /// Set the element at `index`, padding with `Undefined` when writing
    /// past the end.
    ///
    /// Returns `false`, leaving the array unchanged, when the padding cannot
    /// be allocated.
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut items = write(&self.0);
        if index >= items.len() {
            let Some(len) = index.checked_add(1) else {
                return false;
            };
            let extra = len - items.len();
            if items.try_reserve_exact(extra).is_err() {
                return false;
            }
            items.resize(len, Value::Undefined);
        }
        items[index] = value;
        true
    }

    pub fn push(&self, value: Value) {
        write(&self.0).push(value);
    }

    /// Snapshot of the element handles.
    pub fn to_vec(&self) -> Vec<Value> {
        read(&self.0).clone()
    }

    pub fn ptr_eq(&self, other: &Array) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        addr_of(&self.0)
    }
}

impl From<Vec<Value>> for Array {
    fn from(items: Vec<Value>) -> Self {
        Self::from_vec(items)
    }
}

impl FromIterator<Value> for Array {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self::from_vec(iter.into_iter().collect())
    }
}

/// Shared string-keyed mapping. Keys keep insertion order.
#[derive(Clone, Default)]
pub struct Object(Arc<RwLock<IndexMap<String, Value>>>);

impl Object {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        read(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.0).is_empty()
    }

    pub fn get(&self, key: &str) -> Option<Value> {
        read(&self.0).get(key).cloned()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        read(&self.0).contains_key(key)
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn insert(&self, key: impl Into<String>, value: Value) -> Option<Value> {
        write(&self.0).insert(key.into(), value)
    }

    pub fn remove(&self, key: &str) -> Option<Value> {
        write(&self.0).shift_remove(key)
    }

    pub fn keys(&self) -> Vec<String> {
        read(&self.0).keys().cloned().collect()
    }

    /// Snapshot of the own entries in insertion order.
    pub fn entries(&self) -> Vec<(String, Value)> {
        read(&self.0)
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    pub fn ptr_eq(&self, other: &Object) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        addr_of(&self.0)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Object {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let map: IndexMap<String, Value> = iter.into_iter().map(|(k, v)| (k.into(), v)).collect();
        Self(Arc::new(RwLock::new(map)))
    }
}

/// Shared collection of distinct values.
///
/// Membership follows the host `Set` semantics: primitives by value (NaN is
/// a member of a set holding NaN), handles by identity.
#[derive(Clone, Default)]
pub struct ValueSet(Arc<RwLock<Vec<Value>>>);

impl ValueSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        read(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.0).is_empty()
    }

    /// Add `value`; returns `false` when it was already a member.
    pub fn insert(&self, value: Value) -> bool {
        let mut items = write(&self.0);
        if items.iter().any(|item| same_value_zero(item, &value)) {
            return false;
        }
        items.push(value);
        true
    }

    pub fn contains(&self, value: &Value) -> bool {
        read(&self.0).iter().any(|item| same_value_zero(item, value))
    }

    /// Snapshot of the members in insertion order.
    pub fn values(&self) -> Vec<Value> {
        read(&self.0).clone()
    }

    pub fn ptr_eq(&self, other: &ValueSet) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        addr_of(&self.0)
    }
}

impl FromIterator<Value> for ValueSet {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        let set = Self::new();
        for value in iter {
            set.insert(value);
        }
        set
    }
}

/// Shared mapping from arbitrary keys to values.
///
/// Key lookup uses the same rules as [`ValueSet`] membership; it is never
/// structural.
#[derive(Clone, Default)]
pub struct ValueMap(Arc<RwLock<Vec<(Value, Value)>>>);

impl ValueMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        read(&self.0).len()
    }

    pub fn is_empty(&self) -> bool {
        read(&self.0).is_empty()
    }

    pub fn get(&self, key: &Value) -> Option<Value> {
        read(&self.0)
            .iter()
            .find(|(k, _)| same_value_zero(k, key))
            .map(|(_, v)| v.clone())
    }

    pub fn contains_key(&self, key: &Value) -> bool {
        read(&self.0).iter().any(|(k, _)| same_value_zero(k, key))
    }

    /// Insert or overwrite `key`, returning the previous value.
    pub fn insert(&self, key: Value, value: Value) -> Option<Value> {
        let mut entries = write(&self.0);
        if let Some(slot) = entries.iter_mut().find(|(k, _)| same_value_zero(k, &key)) {
            return Some(std::mem::replace(&mut slot.1, value));
        }
        entries.push((key, value));
        None
    }

    pub fn remove(&self, key: &Value) -> Option<Value> {
        let mut entries = write(&self.0);
        let index = entries.iter().position(|(k, _)| same_value_zero(k, key))?;
        Some(entries.remove(index).1)
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        read(&self.0).clone()
    }

    pub fn ptr_eq(&self, other: &ValueMap) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        addr_of(&self.0)
    }
}

impl FromIterator<(Value, Value)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let map = Self::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

type Callable = dyn Fn(&[Value]) -> Value + Send + Sync;

struct FunctionInner {
    name: String,
    body: Box<Callable>,
}

/// Opaque callable leaf. Never traversed; compared by identity.
#[derive(Clone)]
pub struct Function(Arc<FunctionInner>);

impl Function {
    pub fn new<F>(name: impl Into<String>, body: F) -> Self
    where
        F: Fn(&[Value]) -> Value + Send + Sync + 'static,
    {
        Self(Arc::new(FunctionInner {
            name: name.into(),
            body: Box::new(body),
        }))
    }

    pub fn name(&self) -> &str {
        &self.0.name
    }

    pub fn call(&self, args: &[Value]) -> Value {
        (self.0.body)(args)
    }

    pub fn ptr_eq(&self, other: &Function) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    pub(crate) fn addr(&self) -> usize {
        addr_of(&self.0)
    }
}

/// A node of a value tree.
#[derive(Clone, Default)]
pub enum Value {
    #[default]
    Undefined,
    Null,
    Bool(bool),
    Number(f64),
    String(String),
    Date(DateTime<Utc>),
    Array(Array),
    Object(Object),
    Set(ValueSet),
    Map(ValueMap),
    Function(Function),
}

impl Value {
    /// A fresh, empty plain object.
    pub fn object() -> Self {
        Value::Object(Object::new())
    }

    /// A fresh, empty array.
    pub fn array() -> Self {
        Value::Array(Array::new())
    }

    /// A date from epoch milliseconds, `None` when out of range.
    pub fn date_millis(millis: i64) -> Option<Self> {
        Utc.timestamp_millis_opt(millis).single().map(Value::Date)
    }

    pub fn kind(&self) -> Kind {
        match self {
            Value::Undefined => Kind::Undefined,
            Value::Null => Kind::Null,
            Value::Bool(_) => Kind::Boolean,
            Value::Number(_) => Kind::Number,
            Value::String(_) => Kind::String,
            Value::Date(_) => Kind::Date,
            Value::Array(_) => Kind::Sequence,
            Value::Object(_) => Kind::PlainObject,
            Value::Set(_) => Kind::Set,
            Value::Map(_) => Kind::Map,
            Value::Function(_) => Kind::Function,
        }
    }

    /// Name reported by the host `typeof` operator.
    pub fn typeof_name(&self) -> &'static str {
        self.kind().typeof_name()
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&Array> {
        match self {
            Value::Array(a) => Some(a),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Object> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_set(&self) -> Option<&ValueSet> {
        match self {
            Value::Set(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&ValueMap> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_function(&self) -> Option<&Function> {
        match self {
            Value::Function(f) => Some(f),
            _ => None,
        }
    }

    /// Look up an own key: object keys by name, array elements by canonical
    /// index (`"0"`, `"1"`, ...).
    pub fn get(&self, key: &str) -> Option<Value> {
        match self {
            Value::Object(o) => o.get(key),
            Value::Array(a) => parse_index(key).and_then(|i| a.get(i)),
            _ => None,
        }
    }

    /// Whether both values are the same container or function handle.
    ///
    /// Always `false` for primitives and dates, which have no identity.
    pub fn same_ref(&self, other: &Value) -> bool {
        match (self.addr(), other.addr()) {
            (Some(a), Some(b)) => a == b && self.kind() == other.kind(),
            _ => false,
        }
    }

    pub(crate) fn addr(&self) -> Option<usize> {
        match self {
            Value::Array(a) => Some(a.addr()),
            Value::Object(o) => Some(o.addr()),
            Value::Set(s) => Some(s.addr()),
            Value::Map(m) => Some(m.addr()),
            Value::Function(f) => Some(f.addr()),
            _ => None,
        }
    }
}

/// Largest index a host array accepts (length is capped at 2^32 - 1).
pub(crate) const MAX_ARRAY_INDEX: usize = 4_294_967_294;

/// Parse a canonical array index: digits only, no leading zeros, at most
/// [`MAX_ARRAY_INDEX`]. Anything else is a plain property name.
pub(crate) fn parse_index(key: &str) -> Option<usize> {
    let index: usize = key.parse().ok()?;
    (index <= MAX_ARRAY_INDEX && index.to_string() == key).then_some(index)
}

/// Structural equality, see [`crate::deep_equal`].
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        deep_equal(self, other)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Number(n)
    }
}

macro_rules! from_integer {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                #[allow(clippy::cast_precision_loss, clippy::cast_lossless)]
                fn from(n: $t) -> Self {
                    Value::Number(n as f64)
                }
            }
        )*
    };
}

from_integer!(i32, i64, u32, u64, usize);

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(d: DateTime<Utc>) -> Self {
        Value::Date(d)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(Array::from_vec(items))
    }
}

impl From<Array> for Value {
    fn from(a: Array) -> Self {
        Value::Array(a)
    }
}

impl From<Object> for Value {
    fn from(o: Object) -> Self {
        Value::Object(o)
    }
}

impl From<ValueSet> for Value {
    fn from(s: ValueSet) -> Self {
        Value::Set(s)
    }
}

impl From<ValueMap> for Value {
    fn from(m: ValueMap) -> Self {
        Value::Map(m)
    }
}

impl From<Function> for Value {
    fn from(f: Function) -> Self {
        Value::Function(f)
    }
}

impl FromIterator<Value> for Value {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Value::Array(iter.into_iter().collect())
    }
}

// Debug output is JS-like and prints back-references as `[Circular]`.

fn fmt_value(value: &Value, f: &mut fmt::Formatter<'_>, stack: &mut Vec<usize>) -> fmt::Result {
    if let Some(addr) = value.addr() {
        if value.kind().is_container() && stack.contains(&addr) {
            return f.write_str("[Circular]");
        }
    }
    match value {
        Value::Undefined => f.write_str("undefined"),
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{}", b),
        Value::Number(n) => write!(f, "{}", n),
        Value::String(s) => write!(f, "{:?}", s),
        Value::Date(d) => write!(f, "Date({})", d.to_rfc3339()),
        Value::Function(func) => write!(f, "[Function: {}]", func.name()),
        Value::Array(a) => {
            stack.push(a.addr());
            f.write_str("[")?;
            for (i, item) in a.to_vec().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_value(item, f, stack)?;
            }
            stack.pop();
            f.write_str("]")
        }
        Value::Object(o) => {
            stack.push(o.addr());
            f.write_str("{")?;
            for (i, (key, item)) in o.entries().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}: ", key)?;
                fmt_value(item, f, stack)?;
            }
            stack.pop();
            f.write_str("}")
        }
        Value::Set(s) => {
            stack.push(s.addr());
            f.write_str("Set {")?;
            for (i, item) in s.values().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_value(item, f, stack)?;
            }
            stack.pop();
            f.write_str("}")
        }
        Value::Map(m) => {
            stack.push(m.addr());
            f.write_str("Map {")?;
            for (i, (key, item)) in m.entries().iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                fmt_value(key, f, stack)?;
                f.write_str(" => ")?;
                fmt_value(item, f, stack)?;
            }
            stack.pop();
            f.write_str("}")
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_value(self, f, &mut Vec::new())
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Array(self.clone()), f)
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Object(self.clone()), f)
    }
}

impl fmt::Debug for ValueSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Set(self.clone()), f)
    }
}

impl fmt::Debug for ValueMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&Value::Map(self.clone()), f)
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[Function: {}]", self.name())
    }
}
