//! Per-society event logs for the Agora simulation.
//!
//! Every decision, message, and join produces an immutable event appended
//! to its society's log. The log is the ordering authority for the society:
//! sequence numbers and timestamps are assigned at append time. Retention
//! is bounded; the oldest events are dropped first.
//!
//! - [`log`] -- The [`EventLog`] ring buffer and its persisted form.
//! - [`query`] -- [`EventQuery`] filters (kind, participant, viewer
//!   privacy) and tail limits.

pub mod log;
pub mod query;

pub use log::{DEFAULT_CAPACITY, EventLog, EventLogError, LogSnapshot};
pub use query::{DEFAULT_LIMIT, EventQuery, MAX_LIMIT};
