//! Error types for value conversion.

/// A value tree that cannot be rendered as JSON.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("circular reference at {path}")]
    Circular { path: String },

    #[error("{kind} cannot be represented as JSON")]
    Unrepresentable { kind: &'static str },

    #[error("map key at {path} is not a string")]
    NonStringKey { path: String },
}
