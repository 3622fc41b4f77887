//! Response mapping.
//!
//! # Responsibilities
//! - Turn a resolved target into a redirect
//! - Map resolution failures to status codes
//!
//! # Design Decisions
//! - 302 Found: targets may change with the next table reload
//! - A miss is 404 with the reason as plain text
//! - Missing table is 503, a broken table 500

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::routing::router::ResolveError;

/// Redirect the client to `target`.
pub fn redirect(target: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, target.to_string())]).into_response()
}

impl ResolveError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ResolveError::NotInitialized => StatusCode::SERVICE_UNAVAILABLE,
            ResolveError::NoMatch(_) => StatusCode::NOT_FOUND,
            ResolveError::InvalidConfiguration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ResolveError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}
