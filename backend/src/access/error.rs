//! Error types for path registry operations.

/// Result type for path registry operations
pub type AccessResult<T> = Result<T, AccessError>;

/// Errors raised by a [`PathRegistry`](super::PathRegistry) implementation.
///
/// These are collaborator failures. Caller mistakes (unknown names, partial
/// keyword sets) are caught by the path validator before the registry is
/// asked to resolve anything.
#[derive(Debug, thiserror::Error)]
pub enum AccessError {
    /// The registry has no template under this name.
    #[error("Unknown path name: {0}")]
    UnknownName(String),

    /// A template placeholder had no value in the supplied keywords.
    #[error("Missing keyword '{key}' for path name: {name}")]
    MissingKeyword { name: String, key: String },

    /// Filesystem access failed while checking existence.
    #[error("I/O error checking {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid registry configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl AccessError {
    pub fn missing_keyword(name: impl Into<String>, key: impl Into<String>) -> Self {
        Self::MissingKeyword {
            name: name.into(),
            key: key.into(),
        }
    }
}
