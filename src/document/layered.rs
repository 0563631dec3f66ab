//! Layered document with provenance
//!
//! A `LayeredDocument` holds the merged value tree plus a record of every
//! layer that contributed to it.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use treekit_core::{deep_merge, shallow_merge, to_json, Value};

use super::overrides::{parse_assignment, set_path};
use super::source::load_file;
use super::DocumentError;

/// Schema version for rendered documents
pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "treekit/layered_document@1";

/// How layers are combined.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MergeMode {
    /// Nested objects and arrays are merged key by key.
    #[default]
    Deep,
    /// Top-level keys of later layers replace earlier ones wholesale.
    Shallow,
}

/// Where a layer came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LayerOrigin {
    Defaults,
    File,
    Override,
}

/// A contributing layer with provenance
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LayerSource {
    /// Origin of this layer
    pub origin: LayerOrigin,

    /// File path (None for defaults/overrides)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// SHA-256 digest of raw file bytes (None for defaults/overrides)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// Merged document with full provenance
#[derive(Debug, Clone)]
pub struct LayeredDocument {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    /// When this document was built
    pub created_at: DateTime<Utc>,

    /// How the layers were combined
    pub mode: MergeMode,

    /// The merged value tree
    pub value: Value,

    /// Contributing layers in precedence order
    pub sources: Vec<LayerSource>,
}

#[derive(Serialize)]
struct Rendered<'a> {
    schema_version: u32,
    schema_id: &'a str,
    created_at: DateTime<Utc>,
    mode: MergeMode,
    value: serde_json::Value,
    sources: &'a [LayerSource],
}

impl LayeredDocument {
    pub fn builder() -> LayeredDocumentBuilder {
        LayeredDocumentBuilder::default()
    }

    /// Get a value by dotted path (`"cache.mode"`, `"servers.0.host"`).
    pub fn get(&self, path: &str) -> Option<Value> {
        let mut current = self.value.clone();
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    /// Render the document, provenance included, as a JSON value.
    pub fn to_json_value(&self) -> Result<serde_json::Value, DocumentError> {
        let rendered = Rendered {
            schema_version: self.schema_version,
            schema_id: &self.schema_id,
            created_at: self.created_at,
            mode: self.mode,
            value: to_json(&self.value)?,
            sources: &self.sources,
        };
        serde_json::to_value(rendered).map_err(|e| DocumentError::Serialize(e.to_string()))
    }

    /// Render the document as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, DocumentError> {
        let json = self.to_json_value()?;
        serde_json::to_string_pretty(&json).map_err(|e| DocumentError::Serialize(e.to_string()))
    }
}

/// Collects layers for a [`LayeredDocument`].
#[derive(Debug, Default)]
pub struct LayeredDocumentBuilder {
    mode: MergeMode,
    layers: Vec<(Value, LayerSource)>,
    overrides: Option<Value>,
}

impl LayeredDocumentBuilder {
    pub fn mode(mut self, mode: MergeMode) -> Self {
        self.mode = mode;
        self
    }

    /// Add a defaults layer.
    pub fn defaults(mut self, value: Value) -> Self {
        self.layers.push((
            value,
            LayerSource {
                origin: LayerOrigin::Defaults,
                path: None,
                digest: None,
            },
        ));
        self
    }

    /// Add a JSON or TOML file layer.
    pub fn file(mut self, path: &Path) -> Result<Self, DocumentError> {
        let (value, digest) = load_file(path)?;
        self.layers.push((
            value,
            LayerSource {
                origin: LayerOrigin::File,
                path: Some(path.to_string_lossy().to_string()),
                digest: Some(digest),
            },
        ));
        Ok(self)
    }

    /// Add a file layer if the file exists.
    pub fn optional_file(self, path: &Path) -> Result<Self, DocumentError> {
        if path.exists() {
            self.file(path)
        } else {
            tracing::debug!(path = %path.display(), "optional layer file missing, skipped");
            Ok(self)
        }
    }

    /// Add a `path=value` override. All overrides form one layer, applied
    /// last.
    pub fn set(mut self, assignment: &str) -> Result<Self, DocumentError> {
        let (path, value) = parse_assignment(assignment)?;
        let overrides = self.overrides.get_or_insert_with(Value::object);
        set_path(overrides, &path, value);
        Ok(self)
    }

    /// Merge every layer, in order, into a fresh object.
    pub fn build(self) -> LayeredDocument {
        let mut layers = self.layers;
        if let Some(overrides) = self.overrides {
            layers.push((
                overrides,
                LayerSource {
                    origin: LayerOrigin::Override,
                    path: None,
                    digest: None,
                },
            ));
        }

        let (values, sources): (Vec<Value>, Vec<LayerSource>) = layers.into_iter().unzip();
        let target = Value::object();
        let value = match self.mode {
            MergeMode::Deep => deep_merge(&target, &values),
            MergeMode::Shallow => shallow_merge(&target, &values),
        };
        tracing::debug!(layers = values.len(), mode = ?self.mode, "merged document layers");

        LayeredDocument {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            mode: self.mode,
            value,
            sources,
        }
    }
}
