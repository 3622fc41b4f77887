//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Load settings → Load + validate routing table → Initialize router
//!     → Start watcher and signal handler → Start listener
//!
//! Shutdown (shutdown.rs):
//!     Signal received → Stop accepting → Drain in-flight requests → Exit
//!
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Trigger graceful shutdown
//!     SIGHUP → Reload routing table from disk
//! ```
//!
//! # Design Decisions
//! - Fail fast: an invalid routing table at startup is fatal
//! - A failed reload is logged and the running table is kept

pub mod shutdown;
pub mod signals;

pub use shutdown::{Shutdown, ShutdownListener};
pub use signals::{spawn_signal_handler, SignalEvent};
