//! Rule-table redirect resolver.
//!
//! Resolves a request URL to a redirect target using an ordered table of
//! groups (selected by path) and routings (selected by query parameter
//! conditions).

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::schema::RoutingConfiguration;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::RedirectRouter;
