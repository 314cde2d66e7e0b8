//! The error taxonomy of the core pipeline.
//!
//! Every operation validates and rate-limits before writing anything, so
//! any `Err` returned here means no state changed. `Persistence` is the
//! exception in kind but not in effect: a failed snapshot leaves the
//! in-memory state intact and readable.

use chrono::TimeDelta;

use agora_db::DbError;
use agora_events::EventLogError;

/// Typed failure of a core operation.
#[derive(Debug, thiserror::Error)]
pub enum AgoraError {
    /// An unknown society or agent was referenced.
    #[error("{kind} `{id}` not found")]
    NotFound {
        /// What was looked up (`society`, `agent`, ...).
        kind: &'static str,
        /// The identifier that did not resolve.
        id: String,
    },

    /// A required field was missing or a value was not acceptable.
    #[error("invalid {field}: {reason}")]
    Validation {
        /// The offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },

    /// The entity already exists.
    #[error("{kind} `{id}` already exists")]
    Conflict {
        /// What collided (`agent`, ...).
        kind: &'static str,
        /// The colliding identifier.
        id: String,
    },

    /// The agent acted within its cooldown window.
    #[error("cooldown active, retry in {}s", display_secs(.retry_after))]
    RateLimited {
        /// Time until the agent may act again.
        retry_after: TimeDelta,
    },

    /// A store read or write failed.
    #[error("persistence failure: {0}")]
    Persistence(#[from] DbError),

    /// Persisted state could not be rebuilt.
    #[error("corrupt persisted state: {0}")]
    Corrupt(#[from] EventLogError),
}

impl AgoraError {
    /// Shorthand for [`AgoraError::NotFound`].
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id: id.into(),
        }
    }

    /// Shorthand for [`AgoraError::Validation`].
    pub fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Validation {
            field,
            reason: reason.into(),
        }
    }

    /// Whether the caller can fix the request and retry.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotFound { .. } | Self::Validation { .. } | Self::RateLimited { .. }
        )
    }
}

/// Whole seconds to wait, rounded up, never below one.
pub fn retry_after_secs(retry_after: TimeDelta) -> i64 {
    let secs = retry_after.num_seconds();
    let rounded = if retry_after > TimeDelta::seconds(secs) {
        secs.saturating_add(1)
    } else {
        secs
    };
    rounded.max(1)
}

fn display_secs(retry_after: &TimeDelta) -> i64 {
    retry_after_secs(*retry_after)
}
