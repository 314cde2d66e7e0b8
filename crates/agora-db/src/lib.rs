//! Data layer for the Agora simulation.
//!
//! The simulation keeps its live state in memory and snapshots it to a
//! keyed store: one key for the agent directory, one for the economy, one
//! per society event log. This crate provides the store interface and two
//! implementations.
//!
//! ```text
//! Agora (in memory)
//!     |
//!     +-- periodic / shutdown snapshot --> StateStore
//!                                            |-- MemoryStore   (tests, ephemeral runs)
//!                                            +-- JsonFileStore ({data_dir}/{key}.json)
//! ```
//!
//! # Modules
//!
//! - [`store`] -- The [`StateStore`] trait and typed [`StateStoreExt`] helpers
//! - [`memory`] -- In-memory store
//! - [`file`] -- JSON-file store with atomic replace
//! - [`error`] -- Shared error types

pub mod error;
pub mod file;
pub mod memory;
pub mod store;

// Re-export primary types for convenience.
pub use error::DbError;
pub use file::JsonFileStore;
pub use memory::MemoryStore;
pub use store::{StateStore, StateStoreExt, validate_key};
