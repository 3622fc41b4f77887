//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! routing table file (JSON/TOML)
//!     → loader.rs (parse into an untrusted value)
//!     → validation.rs (structural checks, fail fast)
//!     → RoutingConfiguration (validated, immutable)
//!     → installed into the RedirectRouter
//!
//! On reload (file change or SIGHUP):
//!     watcher.rs detects change
//!     → loader.rs loads new table
//!     → validation.rs validates
//!     → atomic swap inside the router
//!     → in-flight resolves finish on the old table
//! ```
//!
//! # Design Decisions
//! - A routing table is immutable once loaded; changes require full reload
//! - Service settings have defaults for every field, routing tables do not
//! - A failed reload never replaces a working table

pub mod loader;
pub mod schema;
pub mod settings;
pub mod validation;
pub mod watcher;

pub use loader::{load_routing_config, load_settings, parse_routing_config, ConfigError, ConfigFormat};
pub use schema::{Condition, ConfigMetadata, Routing, RoutingConfiguration, RoutingGroup};
pub use settings::{ListenerSettings, ObservabilitySettings, RoutingSettings, ServiceSettings};
pub use validation::{validate_config, validate_value, ValidationError};
