//! Layer files: loading, digests and TOML conversion.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use treekit_core::{Object, Value};

use super::DocumentError;

/// Load a `.toml` or JSON file as a value tree.
pub fn load_value(path: &Path) -> Result<Value, DocumentError> {
    load_file(path).map(|(value, _)| value)
}

/// Load a layer file, returning the value and the SHA-256 digest of the raw
/// bytes.
///
/// Files ending in `.toml` are parsed as TOML, anything else as JSON.
pub(crate) fn load_file(path: &Path) -> Result<(Value, String), DocumentError> {
    let path_display = path.display().to_string();
    let bytes = fs::read(path).map_err(|e| DocumentError::Io {
        path: path_display.clone(),
        message: e.to_string(),
    })?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes).map_err(|e| DocumentError::Parse {
        path: path_display.clone(),
        message: format!("Invalid UTF-8: {}", e),
    })?;

    let is_toml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));

    let value = if is_toml {
        let toml_value: toml::Value = toml::from_str(&contents).map_err(|e| DocumentError::Parse {
            path: path_display.clone(),
            message: format!("TOML parse error: {}", e),
        })?;
        from_toml(toml_value)
    } else {
        let json_value: serde_json::Value =
            serde_json::from_str(&contents).map_err(|e| DocumentError::Parse {
                path: path_display.clone(),
                message: format!("JSON parse error: {}", e),
            })?;
        Value::from(json_value)
    };

    tracing::debug!(path = %path_display, %digest, "loaded layer file");
    Ok((value, digest))
}

/// Convert a TOML value to a value tree.
///
/// Offset datetimes become dates; local dates and times have no instant and
/// stay strings.
pub fn from_toml(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::from(i),
        toml::Value::Float(f) => Value::Number(f),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => {
            let text = dt.to_string();
            match DateTime::parse_from_rfc3339(&text) {
                Ok(instant) => Value::Date(instant.with_timezone(&Utc)),
                Err(_) => Value::String(text),
            }
        }
        toml::Value::Array(arr) => arr.into_iter().map(from_toml).collect(),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, from_toml(v)))
                .collect::<Object>(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_toml_tables_and_dates() {
        let toml_value: toml::Value = toml::from_str(
            r#"
            name = "svc"
            retries = 3
            ratio = 0.5
            released = 2024-01-02T03:04:05Z
            day = 2024-01-02

            [cache]
            modes = ["a", "b"]
            "#,
        )
        .unwrap();

        let value = from_toml(toml_value);
        assert_eq!(value.get("name").and_then(|v| v.as_str().map(String::from)), Some("svc".into()));
        assert_eq!(value.get("retries").and_then(|v| v.as_f64()), Some(3.0));
        assert_eq!(
            value.get("released").and_then(|v| v.as_date()).map(|d| d.timestamp()),
            Some(1_704_164_645)
        );
        assert_eq!(value.get("day").and_then(|v| v.as_str().map(String::from)), Some("2024-01-02".into()));
        assert_eq!(value.get("cache").unwrap(), Value::from(json!({"modes": ["a", "b"]})));
    }

    #[test]
    fn test_load_file_json_with_digest() {
        let mut file = NamedTempFile::with_suffix(".json").unwrap();
        file.write_all(br#"{"a": 1}"#).unwrap();

        let (value, digest) = load_file(file.path()).unwrap();
        assert_eq!(value, Value::from(json!({"a": 1})));
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn test_load_file_reports_parse_errors() {
        let mut file = NamedTempFile::with_suffix(".toml").unwrap();
        file.write_all(b"not = [valid").unwrap();

        let err = load_file(file.path()).unwrap_err();
        assert!(matches!(err, DocumentError::Parse { .. }));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_value(Path::new("/nonexistent/treekit/layer.json")).unwrap_err();
        assert!(matches!(err, DocumentError::Io { .. }));
    }
}
