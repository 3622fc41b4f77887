//! Shutdown coordination for the redirect service.
//!
//! A single `watch` flag flips once from serving to stopping. Listeners read
//! the flag rather than a queued message, so one created after the flip
//! still sees it.

use std::sync::Arc;

use tokio::sync::watch;

/// Owner side of the stop flag. Clones share the same flag.
#[derive(Debug, Clone)]
pub struct Shutdown {
    stopping: Arc<watch::Sender<bool>>,
}

/// Task side of the stop flag, handed to the HTTP server and the reload task.
#[derive(Debug, Clone)]
pub struct ShutdownListener {
    stopping: watch::Receiver<bool>,
}

impl Shutdown {
    pub fn new() -> Self {
        let (stopping, _) = watch::channel(false);
        Self {
            stopping: Arc::new(stopping),
        }
    }

    pub fn subscribe(&self) -> ShutdownListener {
        ShutdownListener {
            stopping: self.stopping.subscribe(),
        }
    }

    /// Flip the flag. Repeated calls are no-ops.
    pub fn trigger(&self) {
        self.stopping.send_replace(true);
    }

    pub fn is_triggered(&self) -> bool {
        *self.stopping.borrow()
    }

    /// Listeners that have not been dropped yet.
    pub fn receiver_count(&self) -> usize {
        self.stopping.receiver_count()
    }
}

impl Default for Shutdown {
    fn default() -> Self {
        Self::new()
    }
}

impl ShutdownListener {
    /// Resolves once shutdown is triggered or every [`Shutdown`] is gone.
    pub async fn wait(&mut self) {
        let _ = self.stopping.wait_for(|stopping| *stopping).await;
    }
}
