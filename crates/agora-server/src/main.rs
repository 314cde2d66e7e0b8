//! Server binary for the Agora simulation.
//!
//! Wires configuration, the snapshot store, the HTTP API, the scripted
//! driver and the periodic snapshot task, then runs until Ctrl-C.
//!
//! # Startup Sequence
//!
//! 1. Load configuration from `agora.yaml` (or the path given as the
//!    first argument)
//! 2. Initialize structured logging (tracing)
//! 3. Open the store and restore saved state
//! 4. Start the HTTP API
//! 5. Start the scripted driver, if enabled
//! 6. Start the periodic snapshot task
//! 7. On Ctrl-C: signal every task, wait for them, write a final snapshot

mod error;
mod lifecycle;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use agora_core::config::LoggingConfig;
use agora_core::{Agora, AgoraConfig, ScriptedDriver};
use agora_observer::{AppState, ServerConfig, start_server};
use tokio::sync::watch;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::error::ServerError;

/// Configuration file read when no path is given.
const DEFAULT_CONFIG_PATH: &str = "agora.yaml";

/// Application entry point.
///
/// # Errors
///
/// Returns an error if configuration, logging, the store, the saved state
/// or the HTTP listener cannot be set up.
#[tokio::main]
async fn main() -> Result<(), ServerError> {
    // 1. Load configuration.
    let config_path = std::env::args_os()
        .nth(1)
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);
    let config = AgoraConfig::load_or_default(&config_path)?;

    // 2. Initialize structured logging.
    init_logging(&config.logging)?;
    info!(
        config = %config_path.display(),
        host = config.server.host,
        port = config.server.port,
        cooldown_secs = config.limits.cooldown_secs,
        event_capacity = config.limits.event_capacity,
        driver_enabled = config.driver.enabled,
        "agora-server starting"
    );

    // 3. Open the store and restore.
    let store = lifecycle::open_store(&config.storage)?;
    let agora = Arc::new(Agora::builder(config.clone()).store(store).build());
    lifecycle::restore(&agora)?;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    // 4. HTTP API.
    let server_config = ServerConfig::from(&config.server);
    let state = Arc::new(AppState::new(Arc::clone(&agora)));
    let server_signal = wait_for_shutdown(shutdown_rx.clone());
    let mut server =
        tokio::spawn(async move { start_server(&server_config, state, server_signal).await });

    // 5. Scripted driver.
    let driver = config.driver.enabled.then(|| {
        let driver = ScriptedDriver::new(Arc::clone(&agora), &config.driver);
        tokio::spawn(driver.run(shutdown_rx.clone()))
    });
    if driver.is_none() {
        info!("Scripted driver disabled");
    }

    // 6. Periodic snapshots.
    let snapshots = match config.storage.snapshot_interval_secs {
        0 => {
            info!("Periodic snapshots disabled");
            None
        }
        secs => Some(tokio::spawn(lifecycle::snapshot_loop(
            Arc::clone(&agora),
            Duration::from_secs(secs),
            shutdown_rx.clone(),
        ))),
    };

    // 7. Run until Ctrl-C or until the server stops on its own.
    let mut server_result = None;
    tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            if let Err(e) = signal {
                warn!(error = %e, "Could not listen for Ctrl-C, shutting down");
            }
            info!("Shutdown requested");
        }
        joined = &mut server => {
            server_result = Some(joined);
        }
    }

    if shutdown_tx.send(true).is_err() {
        warn!("Every task already stopped before the shutdown signal");
    }
    let server_result = match server_result {
        Some(joined) => joined,
        None => server.await,
    };
    if let Some(driver) = driver
        && let Err(e) = driver.await
    {
        warn!(error = %e, "Scripted driver task failed");
    }
    if let Some(snapshots) = snapshots
        && let Err(e) = snapshots.await
    {
        warn!(error = %e, "Snapshot task failed");
    }

    if lifecycle::snapshot(&agora).await {
        info!("Final snapshot written");
    }
    let stats = agora.stats();
    info!(
        agents = stats.agents,
        total_events = stats.total_events,
        "agora-server shutdown complete"
    );

    match server_result {
        Ok(result) => result.map_err(ServerError::from),
        Err(e) => {
            warn!(error = %e, "HTTP server task failed");
            Ok(())
        }
    }
}

/// Resolves once `shutdown` turns `true` or its sender is dropped.
async fn wait_for_shutdown(mut shutdown: watch::Receiver<bool>) {
    if shutdown.wait_for(|stop| *stop).await.is_err() {
        info!("Shutdown channel closed");
    }
}

/// Install the global subscriber. `RUST_LOG` wins over `logging.level`.
fn init_logging(config: &LoggingConfig) -> Result<(), ServerError> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ServerError::Logging {
        message: e.to_string(),
    })
}
