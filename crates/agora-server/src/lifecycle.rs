//! Store selection and the snapshot lifecycle.
//!
//! State is restored once at startup, written every
//! `storage.snapshot_interval_secs`, and flushed a final time on
//! shutdown. A failed write is logged; the in-memory simulation keeps
//! serving. A failed restore stops startup, since the first snapshot
//! would otherwise overwrite the saved state with an empty one.

use std::sync::Arc;
use std::time::Duration;

use agora_core::config::StorageConfig;
use agora_core::{Agora, AgoraError};
use agora_db::{DbError, JsonFileStore, MemoryStore, StateStore};
use tokio::sync::watch;
use tracing::{info, warn};

/// Open the store named by `config`: JSON files under `data_dir`, or an
/// in-memory store when no directory is configured.
///
/// # Errors
///
/// Returns [`DbError::Config`] if the data directory cannot be created.
pub fn open_store(config: &StorageConfig) -> Result<Arc<dyn StateStore>, DbError> {
    match &config.data_dir {
        Some(dir) => Ok(Arc::new(JsonFileStore::open(dir)?)),
        None => {
            warn!("No data_dir configured, state will not survive a restart");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Restore saved state. Unusable society logs are skipped by the core;
/// an unreadable agents or economy key is returned as an error.
///
/// # Errors
///
/// Returns the [`AgoraError`] from [`Agora::restore`].
pub fn restore(agora: &Agora) -> Result<(), AgoraError> {
    let report = agora.restore()?;
    info!(
        agents = report.agents,
        logs = report.logs,
        events = report.events,
        "State restored"
    );
    if report.skipped > 0 {
        warn!(
            skipped = report.skipped,
            "Some society logs were unusable and start empty"
        );
    }
    Ok(())
}

/// Write one snapshot off the async runtime. Returns whether it succeeded.
pub async fn snapshot(agora: &Arc<Agora>) -> bool {
    let agora = Arc::clone(agora);
    match tokio::task::spawn_blocking(move || agora.persist()).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            warn!(error = %e, "Snapshot failed");
            false
        }
        Err(e) => {
            warn!(error = %e, "Snapshot task did not complete");
            false
        }
    }
}

/// Snapshot every `period` until `shutdown` turns `true` or its sender
/// is dropped. The first snapshot is taken one period after start.
pub async fn snapshot_loop(
    agora: Arc<Agora>,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let now = tokio::time::Instant::now();
    let mut ticker = tokio::time::interval_at(now.checked_add(period).unwrap_or(now), period);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
    loop {
        if *shutdown.borrow() {
            break;
        }
        tokio::select! {
            _ = ticker.tick() => {
                snapshot(&agora).await;
            }
            changed = shutdown.changed() => {
                if changed.is_err() {
                    break;
                }
            }
        }
    }
    info!("Snapshot loop stopped");
}
