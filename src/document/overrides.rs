//! `path=value` overrides.

use treekit_core::{is_plain_object, Value};

use super::DocumentError;

/// Parse `a.b.c=value` into its key path and value.
///
/// The value is read as JSON when it parses (`3`, `true`, `{"k":1}`),
/// otherwise taken verbatim as a string.
pub fn parse_assignment(assignment: &str) -> Result<(Vec<String>, Value), DocumentError> {
    let (path, raw) = assignment.split_once('=').ok_or_else(|| {
        DocumentError::InvalidOverride(format!("expected PATH=VALUE, got {:?}", assignment))
    })?;

    let segments: Vec<String> = path.trim().split('.').map(str::to_string).collect();
    if segments.iter().any(String::is_empty) {
        return Err(DocumentError::InvalidOverride(format!(
            "empty key segment in {:?}",
            path
        )));
    }

    let value = serde_json::from_str::<serde_json::Value>(raw)
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()));

    Ok((segments, value))
}

/// Set `value` at `path` inside `target`, creating (or replacing non-object)
/// intermediate objects on the way.
pub fn set_path(target: &Value, path: &[String], value: Value) {
    let Some((last, parents)) = path.split_last() else {
        return;
    };
    let Some(mut current) = target.as_object().cloned() else {
        return;
    };

    for segment in parents {
        let next = match current.get(segment) {
            Some(existing) if is_plain_object(&existing) => existing,
            _ => {
                let fresh = Value::object();
                current.insert(segment.clone(), fresh.clone());
                fresh
            }
        };
        let Some(object) = next.as_object().cloned() else {
            return;
        };
        current = object;
    }
    current.insert(last.clone(), value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_assignment_json_and_string() {
        let (path, value) = parse_assignment("cache.mode=\"on\"").unwrap();
        assert_eq!(path, vec!["cache".to_string(), "mode".to_string()]);
        assert_eq!(value.as_str(), Some("on"));

        let (_, value) = parse_assignment("timeout=30").unwrap();
        assert_eq!(value.as_f64(), Some(30.0));

        let (_, value) = parse_assignment("name=plain text").unwrap();
        assert_eq!(value.as_str(), Some("plain text"));

        let (_, value) = parse_assignment("list=[1,2]").unwrap();
        assert_eq!(value, Value::from(json!([1, 2])));
    }

    #[test]
    fn test_parse_assignment_rejects_bad_input() {
        assert!(matches!(
            parse_assignment("no-equals-sign"),
            Err(DocumentError::InvalidOverride(_))
        ));
        assert!(matches!(
            parse_assignment("a..b=1"),
            Err(DocumentError::InvalidOverride(_))
        ));
        assert!(matches!(parse_assignment("=1"), Err(DocumentError::InvalidOverride(_))));
    }

    #[test]
    fn test_set_path_creates_intermediates() {
        let target = Value::from(json!({"a": {"keep": true}, "b": 1}));
        set_path(&target, &["a".into(), "x".into(), "y".into()], Value::from(2));
        set_path(&target, &["b".into(), "c".into()], Value::from(3));

        assert_eq!(
            target,
            Value::from(json!({"a": {"keep": true, "x": {"y": 2}}, "b": {"c": 3}}))
        );
    }
}
