//! Shared application state for the HTTP API.
//!
//! The observer owns no simulation state of its own. Every handler calls
//! into the shared [`Agora`], whose critical sections are short and
//! synchronous, so handlers never hold a lock across an `.await`.

use std::sync::Arc;
use std::time::Instant;

use agora_core::Agora;
use chrono::{DateTime, Utc};

/// State shared by every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The simulation.
    pub agora: Arc<Agora>,
    /// Wall-clock start of the server.
    pub started_at: DateTime<Utc>,
    started: Instant,
}

impl AppState {
    /// Wrap `agora` for serving, starting the uptime clock now.
    pub fn new(agora: Arc<Agora>) -> Self {
        Self {
            agora,
            started_at: Utc::now(),
            started: Instant::now(),
        }
    }

    /// Seconds since [`AppState::new`].
    pub fn uptime_secs(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
