//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once at startup
//! - Pick JSON or human-readable output
//! - Honor `RUST_LOG` over the configured level
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - JSON format for production, pretty format for development

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::settings::ObservabilitySettings;

/// Build the filter: `RUST_LOG` if set, otherwise the configured level for
/// this crate and tower-http.
pub fn env_filter(settings: &ObservabilitySettings) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "redirect_router={level},tower_http={level}",
            level = settings.log_level
        )
        .into()
    })
}

/// Install the global subscriber. Call once, before anything logs.
pub fn init_logging(settings: &ObservabilitySettings) {
    let registry = tracing_subscriber::registry().with(env_filter(settings));

    if settings.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
