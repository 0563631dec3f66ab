//! Layered documents
//!
//! Builds one value tree out of several layers, merged in precedence order:
//! 1. Defaults supplied by the caller
//! 2. JSON/TOML files, in the order given
//! 3. `path=value` overrides
//!
//! Overrides and files may be sparse: only the keys they carry replace the
//! layers below them.

mod layered;
mod overrides;
mod source;

pub use layered::{
    LayerOrigin, LayerSource, LayeredDocument, LayeredDocumentBuilder, MergeMode, SCHEMA_ID,
    SCHEMA_VERSION,
};
pub use overrides::{parse_assignment, set_path};
pub use source::{from_toml, load_value};

use treekit_core::ConvertError;

#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("IO error reading {path}: {message}")]
    Io { path: String, message: String },

    #[error("Parse error in {path}: {message}")]
    Parse { path: String, message: String },

    #[error("Invalid override: {0}")]
    InvalidOverride(String),

    #[error(transparent)]
    Convert(#[from] ConvertError),

    #[error("Serialization error: {0}")]
    Serialize(String),
}
