//! treekit - value tree utilities
//!
//! Re-exports the value model and tree operations of `treekit-core`, and
//! adds layered documents (defaults + JSON/TOML files + overrides merged with
//! provenance), random identifiers and log setup for the `treekit` CLI.

pub mod document;
pub mod logging;
pub mod random;

pub use document::{
    from_toml, load_value, DocumentError, LayerOrigin, LayerSource, LayeredDocument,
    LayeredDocumentBuilder, MergeMode,
};
pub use random::{generate_random, generate_uuid};
pub use treekit_core::*;
