//! HTTP API for the Agora simulation.
//!
//! An Axum server exposing registration, membership, decisions, private
//! messages, event queries and the derived views (economy, evolution,
//! digest) of a shared [`Agora`](agora_core::Agora).
//!
//! Handlers hold no state of their own. Core errors map onto status
//! codes in [`error::ApiError`]; a rate-limited call answers `429` with a
//! `Retry-After` header. Malformed JSON bodies are rejected through the
//! same error type by [`extract::ApiJson`].

pub mod error;
pub mod extract;
pub mod handlers;
pub mod router;
pub mod server;
pub mod state;

pub use error::ApiError;
pub use extract::ApiJson;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
