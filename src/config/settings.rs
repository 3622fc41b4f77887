//! Service settings for the redirect server binary.
//!
//! These control the collaborators around the resolver (listener, routing
//! table location, observability). All fields have defaults so an empty
//! settings file is valid.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings for the redirect service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ServiceSettings {
    pub listener: ListenerSettings,
    pub routing: RoutingSettings,
    pub observability: ObservabilitySettings,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerSettings {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Path that serves the router status instead of a redirect.
    pub status_path: String,
}

impl Default for ListenerSettings {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            status_path: "/_status".to_string(),
        }
    }
}

/// Where the routing table comes from.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutingSettings {
    /// Routing table file (`.json` or `.toml`).
    pub config_path: PathBuf,

    /// Reload the table when the file changes.
    pub watch: bool,

    /// Poll interval for the file watcher in seconds.
    pub watch_interval_secs: u64,
}

impl Default for RoutingSettings {
    fn default() -> Self {
        Self {
            config_path: PathBuf::from("routing.json"),
            watch: true,
            watch_interval_secs: 2,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilitySettings {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Emit logs as JSON lines instead of human-readable text.
    pub json_logs: bool,

    /// Enable the Prometheus metrics endpoint.
    pub metrics_enabled: bool,

    pub metrics_address: String,
}

impl Default for ObservabilitySettings {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
