//! OS signal handling.
//!
//! # Responsibilities
//! - Listen for SIGTERM, SIGINT and SIGHUP
//! - Translate signals to internal events
//! - Trigger shutdown or a routing table reload
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - SIGHUP triggers a reload, not shutdown
//! - Only Ctrl+C is available off Unix

use std::io;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::lifecycle::shutdown::Shutdown;

/// What a received signal asks the service to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalEvent {
    Shutdown,
    Reload,
}

/// Wait for the next relevant signal.
#[cfg(unix)]
pub async fn next_signal() -> io::Result<SignalEvent> {
    use tokio::signal::unix::{signal, SignalKind};

    let mut terminate = signal(SignalKind::terminate())?;
    let mut hangup = signal(SignalKind::hangup())?;

    tokio::select! {
        res = tokio::signal::ctrl_c() => res.map(|()| SignalEvent::Shutdown),
        _ = terminate.recv() => Ok(SignalEvent::Shutdown),
        _ = hangup.recv() => Ok(SignalEvent::Reload),
    }
}

/// Wait for the next relevant signal.
#[cfg(not(unix))]
pub async fn next_signal() -> io::Result<SignalEvent> {
    tokio::signal::ctrl_c().await.map(|()| SignalEvent::Shutdown)
}

/// Spawn a task that turns signals into shutdown and reload requests.
pub fn spawn_signal_handler(
    shutdown: Shutdown,
    reload_tx: mpsc::UnboundedSender<()>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            match next_signal().await {
                Ok(SignalEvent::Shutdown) => {
                    tracing::info!("Shutdown signal received");
                    shutdown.trigger();
                    break;
                }
                Ok(SignalEvent::Reload) => {
                    tracing::info!("Reload signal received");
                    if reload_tx.send(()).is_err() {
                        tracing::warn!("Reload requested but no reload task is running");
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to install signal handlers");
                    break;
                }
            }
        }
    })
}
