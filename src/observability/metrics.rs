//! Metrics collection and exposition.
//!
//! # Metrics
//! - `redirect_resolutions_total` (counter): resolutions by outcome
//! - `redirect_resolution_duration_seconds` (histogram): resolve latency
//! - `redirect_config_reloads_total` (counter): table installs by result
//! - `redirect_routing_groups` (gauge): groups in the active table
//!
//! Without an installed recorder every call is a no-op, so library users and
//! tests pay nothing.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::routing::engine::{NoMatchReason, RedirectMatch};
use crate::routing::router::ResolveError;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one resolution attempt.
pub fn record_resolution(result: &Result<RedirectMatch, ResolveError>, start: Instant) {
    let outcome = match result {
        Ok(_) => "found",
        Err(ResolveError::NoMatch(NoMatchReason::NoGroup)) => "no_group",
        Err(ResolveError::NoMatch(NoMatchReason::NoRouting)) => "no_routing",
        Err(ResolveError::NotInitialized) => "not_initialized",
        Err(ResolveError::InvalidConfiguration(_)) => "invalid_configuration",
    };

    counter!("redirect_resolutions_total", "outcome" => outcome).increment(1);
    histogram!("redirect_resolution_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record an attempt to install a routing table.
pub fn record_reload(accepted: bool) {
    let result = if accepted { "accepted" } else { "rejected" };
    counter!("redirect_config_reloads_total", "result" => result).increment(1);
}

pub fn set_group_count(groups: usize) {
    gauge!("redirect_routing_groups").set(groups as f64);
}
