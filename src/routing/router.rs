//! Redirect router: the long-lived holder of the routing table.
//!
//! # Responsibilities
//! - Validate and install routing tables
//! - Resolve raw URLs to redirect targets against the current table
//! - Report a read-only status snapshot
//!
//! # Design Decisions
//! - Explicit context object, not a global: tests build independent routers
//! - Tables are swapped whole via `ArcSwapOption`; readers never see a mix
//! - A rejected table leaves the previous one in place
//! - Misses surface as `ResolveError::NoMatch`, distinct from system faults

use std::sync::Arc;
use std::time::Instant;

use arc_swap::ArcSwapOption;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::config::schema::{ConfigMetadata, RoutingConfiguration};
use crate::config::validation::{validate_config, validate_value, ValidationError};
use crate::observability::metrics;
use crate::routing::engine::{self, EngineError, MatchResult, NoMatchReason, RedirectMatch};
use crate::routing::request::decompose;

/// Failure to turn a URL into a redirect target.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("not initialized")]
    NotInitialized,

    #[error("{0}")]
    NoMatch(NoMatchReason),

    #[error("invalid routing table: {0}")]
    InvalidConfiguration(#[from] EngineError),
}

/// Snapshot of the router state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouterStatus {
    pub initialized: bool,
    pub configuration_loaded: bool,
    pub group_count: usize,
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ConfigMetadata>,
}

/// Holds the active routing table and resolves URLs against it.
#[derive(Debug, Default)]
pub struct RedirectRouter {
    table: ArcSwapOption<RoutingConfiguration>,
}

impl RedirectRouter {
    /// Create a router with no table installed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate an untrusted value and install it, replacing any prior table.
    pub fn initialize(&self, raw: &Value) -> Result<(), ValidationError> {
        let config = validate_value(raw).inspect_err(|e| {
            metrics::record_reload(false);
            tracing::warn!(error = %e, "Rejected routing table");
        })?;
        self.install(config);
        Ok(())
    }

    /// Validate a typed table and install it, replacing any prior table.
    pub fn initialize_with(&self, config: RoutingConfiguration) -> Result<(), ValidationError> {
        validate_config(&config).inspect_err(|e| {
            metrics::record_reload(false);
            tracing::warn!(error = %e, "Rejected routing table");
        })?;
        self.install(config);
        Ok(())
    }

    /// Drop the installed table. Resolves fail with `NotInitialized` until the
    /// next successful initialize.
    pub fn reset(&self) {
        self.table.store(None);
        metrics::set_group_count(0);
        tracing::info!("Routing table cleared");
    }

    fn install(&self, config: RoutingConfiguration) {
        tracing::info!(
            version = %config.version,
            groups = config.group_count(),
            "Routing table installed"
        );
        metrics::record_reload(true);
        metrics::set_group_count(config.group_count());
        self.table.store(Some(Arc::new(config)));
    }

    /// Resolve a URL to its redirect target.
    pub fn resolve(&self, url: &str) -> Result<String, ResolveError> {
        self.resolve_match(url).map(|m| m.target_url)
    }

    /// Resolve a URL, keeping the matched group and routing names.
    pub fn resolve_match(&self, url: &str) -> Result<RedirectMatch, ResolveError> {
        let start = Instant::now();
        let result = self.resolve_inner(url);
        metrics::record_resolution(&result, start);
        result
    }

    fn resolve_inner(&self, url: &str) -> Result<RedirectMatch, ResolveError> {
        let table = self.table.load_full().ok_or(ResolveError::NotInitialized)?;
        let request = decompose(url);

        match engine::resolve(&table, &request)? {
            MatchResult::Found(found) => Ok(found),
            MatchResult::NotFound(reason) => Err(ResolveError::NoMatch(reason)),
        }
    }

    /// Current table, if one is installed.
    pub fn current(&self) -> Option<Arc<RoutingConfiguration>> {
        self.table.load_full()
    }

    pub fn status(&self) -> RouterStatus {
        let table = self.table.load();
        match table.as_deref() {
            Some(config) => RouterStatus {
                initialized: true,
                configuration_loaded: true,
                group_count: config.group_count(),
                version: Some(config.version.clone()),
                metadata: config.metadata.clone(),
            },
            None => RouterStatus {
                initialized: false,
                configuration_loaded: false,
                group_count: 0,
                version: None,
                metadata: None,
            },
        }
    }
}
