//! HTTP front end.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, tracing)
//!     → RedirectRouter::resolve_match (path + query)
//!     → response.rs (302 redirect or status-coded failure)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use server::{AppState, HttpServer, ServerError, X_REQUEST_ID};
