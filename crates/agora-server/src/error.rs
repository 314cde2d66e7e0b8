//! Error types for the server binary.
//!
//! [`ServerError`] covers every startup failure that should stop the
//! process. Failures after startup (a snapshot that could not be saved,
//! a scripted move that was refused) are logged and the server keeps
//! running.

/// Top-level error for the server binary.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: agora_core::ConfigError,
    },

    /// The snapshot store could not be opened.
    #[error("store error: {source}")]
    Store {
        /// The underlying store error.
        #[from]
        source: agora_db::DbError,
    },

    /// Saved state exists but could not be restored.
    #[error("restore error: {source}")]
    Restore {
        /// The underlying restore error.
        #[from]
        source: agora_core::AgoraError,
    },

    /// The HTTP server failed to bind or serve.
    #[error("http error: {source}")]
    Http {
        /// The underlying server error.
        #[from]
        source: agora_observer::ServerError,
    },

    /// The logging subscriber could not be installed.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the failure.
        message: String,
    },
}
