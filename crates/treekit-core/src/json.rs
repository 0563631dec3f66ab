//! JSON interop
//!
//! Rendering follows `JSON.stringify`:
//! - undefined and function members are dropped from objects and become
//!   `null` inside arrays
//! - NaN and infinities become `null`, integral numbers are written as
//!   integers
//! - dates become ISO-8601 strings with millisecond precision
//! - sets become arrays, maps become objects when every key is a string

use chrono::SecondsFormat;
use serde_json::{Map, Number};

use crate::error::ConvertError;
use crate::value::{Object, Value};

/// Largest integer an f64 holds exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => items.into_iter().map(Value::from).collect(),
            serde_json::Value::Object(map) => Value::Object(
                map.into_iter()
                    .map(|(k, v)| (k, Value::from(v)))
                    .collect::<Object>(),
            ),
        }
    }
}

impl TryFrom<&Value> for serde_json::Value {
    type Error = ConvertError;

    fn try_from(value: &Value) -> Result<Self, Self::Error> {
        to_json(value)
    }
}

/// Render a value tree as JSON.
///
/// Fails for a top-level undefined or function, for maps with non-string
/// keys, and for cyclic trees.
pub fn to_json(value: &Value) -> Result<serde_json::Value, ConvertError> {
    let mut encoder = Encoder { stack: Vec::new() };
    encoder
        .encode(value, "$")?
        .ok_or(ConvertError::Unrepresentable {
            kind: value.kind().name(),
        })
}

fn number_to_json(n: f64) -> serde_json::Value {
    if !n.is_finite() {
        return serde_json::Value::Null;
    }
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE_INTEGER {
        return serde_json::Value::Number(Number::from(n as i64));
    }
    Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

struct Encoder {
    stack: Vec<usize>,
}

impl Encoder {
    /// `None` means "omit": undefined and functions.
    fn encode(&mut self, value: &Value, path: &str) -> Result<Option<serde_json::Value>, ConvertError> {
        let json = match value {
            Value::Undefined | Value::Function(_) => return Ok(None),
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Number(n) => number_to_json(*n),
            Value::String(s) => serde_json::Value::String(s.clone()),
            Value::Date(d) => serde_json::Value::String(d.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Value::Array(items) => self.enter(items.addr(), path, |this| {
                this.encode_items(&items.to_vec(), path)
            })?,
            Value::Set(members) => self.enter(members.addr(), path, |this| {
                this.encode_items(&members.values(), path)
            })?,
            Value::Object(entries) => self.enter(entries.addr(), path, |this| {
                let mut map = Map::new();
                for (key, item) in entries.entries() {
                    if let Some(json) = this.encode(&item, &format!("{}.{}", path, key))? {
                        map.insert(key, json);
                    }
                }
                Ok(serde_json::Value::Object(map))
            })?,
            Value::Map(entries) => self.enter(entries.addr(), path, |this| {
                let mut map = Map::new();
                for (key, item) in entries.entries() {
                    let Value::String(key) = key else {
                        return Err(ConvertError::NonStringKey {
                            path: path.to_string(),
                        });
                    };
                    if let Some(json) = this.encode(&item, &format!("{}.{}", path, key))? {
                        map.insert(key, json);
                    }
                }
                Ok(serde_json::Value::Object(map))
            })?,
        };
        Ok(Some(json))
    }

    fn encode_items(&mut self, items: &[Value], path: &str) -> Result<serde_json::Value, ConvertError> {
        let mut out = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            let json = self.encode(item, &format!("{}[{}]", path, i))?;
            out.push(json.unwrap_or(serde_json::Value::Null));
        }
        Ok(serde_json::Value::Array(out))
    }

    fn enter(
        &mut self,
        addr: usize,
        path: &str,
        encode: impl FnOnce(&mut Self) -> Result<serde_json::Value, ConvertError>,
    ) -> Result<serde_json::Value, ConvertError> {
        if self.stack.contains(&addr) {
            return Err(ConvertError::Circular {
                path: path.to_string(),
            });
        }
        self.stack.push(addr);
        let result = encode(self);
        self.stack.pop();
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Function, ValueMap, ValueSet};
    use serde_json::json;

    #[test]
    fn test_json_round_trip_of_plain_tree() {
        let json = json!({"a": {"b": 1, "c": [2.5, "x", null, true]}});
        assert_eq!(to_json(&Value::from(json.clone())).unwrap(), json);
    }

    #[test]
    fn test_undefined_and_functions_follow_stringify() {
        let f = Value::from(Function::new("f", |_| Value::Undefined));
        let obj = Object::new();
        obj.insert("keep", Value::from(1));
        obj.insert("gone", Value::Undefined);
        obj.insert("call", f.clone());
        obj.insert("list", Value::from(vec![Value::Undefined, f]));

        let json = to_json(&Value::Object(obj)).unwrap();
        assert_eq!(json, json!({"keep": 1, "list": [null, null]}));
    }

    #[test]
    fn test_top_level_undefined_is_an_error() {
        assert_eq!(
            to_json(&Value::Undefined),
            Err(ConvertError::Unrepresentable { kind: "undefined" })
        );
    }

    #[test]
    fn test_numbers_and_dates() {
        let list = Value::from(vec![
            Value::from(3.0),
            Value::from(f64::NAN),
            Value::from(f64::INFINITY),
            Value::from(-0.0),
            Value::date_millis(1_700_000_000_123).unwrap(),
        ]);
        let json = to_json(&list).unwrap();

        assert_eq!(json, json!([3, null, null, 0, "2023-11-14T22:13:20.123Z"]));
    }

    #[test]
    fn test_sets_and_maps() {
        let set: ValueSet = vec![Value::from(1), Value::from(2)].into_iter().collect();
        let map: ValueMap = vec![(Value::from("k"), Value::Set(set))].into_iter().collect();
        assert_eq!(to_json(&Value::Map(map)).unwrap(), json!({"k": [1, 2]}));

        let bad: ValueMap = vec![(Value::from(1), Value::Null)].into_iter().collect();
        assert_eq!(
            to_json(&Value::Map(bad)),
            Err(ConvertError::NonStringKey { path: "$".into() })
        );
    }

    #[test]
    fn test_cycle_is_an_error() {
        let obj = Object::new();
        obj.insert("inner", Value::from(vec![Value::Object(obj.clone())]));

        assert_eq!(
            to_json(&Value::Object(obj)),
            Err(ConvertError::Circular {
                path: "$.inner[0]".into()
            })
        );
    }

    #[test]
    fn test_shared_subtree_is_not_a_cycle() {
        let shared = Value::from(json!({"x": 1}));
        let list = Value::from(vec![shared.clone(), shared]);
        assert_eq!(to_json(&list).unwrap(), json!([{"x": 1}, {"x": 1}]));
    }
}
