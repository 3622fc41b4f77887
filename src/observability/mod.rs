//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! router, engine, watcher, http server produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, gauges, histograms)
//!
//! Consumers:
//!     → stdout (text or JSON lines)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every event (path, group, routing, target)
//! - Request ID flows through the HTTP layer
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
