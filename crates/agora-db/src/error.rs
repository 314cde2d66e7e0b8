//! Error types for the data layer.
//!
//! All errors are propagated via [`DbError`], which wraps the underlying
//! I/O and `serde_json` errors with the key that was being accessed.

/// Errors that can occur in the data layer.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    /// A filesystem operation failed.
    #[error("I/O error on key `{key}`: {source}")]
    Io {
        /// Key being read or written.
        key: String,
        /// Underlying error.
        source: std::io::Error,
    },

    /// A serialization or deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The key contains characters that are not allowed.
    #[error("Invalid key: `{0}`")]
    InvalidKey(String),

    /// A configuration error (e.g. unusable data directory).
    #[error("Configuration error: {0}")]
    Config(String),
}
