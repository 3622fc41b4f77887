//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the redirect and status handlers
//! - Wire up middleware (tracing, request ID)
//! - Serve until the shutdown signal fires

use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, Uri},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use thiserror::Error;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::settings::ListenerSettings;
use crate::http::response::redirect;
use crate::lifecycle::ShutdownListener;
use crate::routing::router::{RedirectRouter, RouterStatus};

pub const X_REQUEST_ID: &str = "x-request-id";

/// Errors building the HTTP front end.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServerError {
    /// The status path is the root or a pattern that overlaps the
    /// catch-all redirect route.
    #[error("status path {0:?} collides with the redirect routes")]
    StatusPathConflict(String),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<RedirectRouter>,
}

/// HTTP front end for a [`RedirectRouter`].
pub struct HttpServer {
    app: Router,
}

impl HttpServer {
    /// Create a new HTTP server resolving against `router`.
    pub fn new(
        router: Arc<RedirectRouter>,
        settings: &ListenerSettings,
    ) -> Result<Self, ServerError> {
        let status_path = status_route(&settings.status_path)?;
        let state = AppState { router };
        Ok(Self {
            app: Self::build_router(&status_path, state),
        })
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(status_path: &str, state: AppState) -> Router {
        let request_id = HeaderName::from_static(X_REQUEST_ID);

        Router::new()
            .route(status_path, get(status_handler))
            .route("/", get(redirect_handler))
            .route("/{*path}", get(redirect_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::new(request_id.clone(), MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(PropagateRequestIdLayer::new(request_id)),
            )
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: ShutdownListener,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.app)
            .with_graceful_shutdown(async move { shutdown.wait().await })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

/// Normalizes the configured status path to an absolute static route.
///
/// The root is taken by the redirect handler, and a `{param}` or `*` segment
/// would overlap `/{*path}`, which axum rejects with a panic.
fn status_route(configured: &str) -> Result<String, ServerError> {
    let route = if configured.starts_with('/') {
        configured.to_string()
    } else {
        format!("/{configured}")
    };

    let overlaps = route == "/" || route.contains(['{', '}', '*', '?', '#']) || route.contains("//");
    if overlaps {
        return Err(ServerError::StatusPathConflict(configured.to_string()));
    }
    Ok(route)
}

/// Resolve the request URL and redirect, or explain the miss.
async fn redirect_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Response {
    let request_id = headers
        .get(X_REQUEST_ID)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("unknown");
    let url = uri.path_and_query().map_or("/", |pq| pq.as_str());

    match state.router.resolve_match(url) {
        Ok(found) => {
            tracing::info!(
                request_id = %request_id,
                url = %url,
                group = %found.group_name,
                routing = %found.routing_name,
                target = %found.target_url,
                "Redirecting"
            );
            redirect(&found.target_url)
        }
        Err(e) => {
            tracing::warn!(request_id = %request_id, url = %url, reason = %e, "Request not resolved");
            e.into_response()
        }
    }
}

async fn status_handler(State(state): State<AppState>) -> Json<RouterStatus> {
    Json(state.router.status())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server_with_status_path(path: &str) -> Result<HttpServer, ServerError> {
        let settings = ListenerSettings {
            status_path: path.to_string(),
            ..ListenerSettings::default()
        };
        HttpServer::new(Arc::new(RedirectRouter::new()), &settings)
    }

    #[test]
    fn test_status_route_normalized() {
        assert_eq!(status_route("/_status"), Ok("/_status".to_string()));
        assert_eq!(status_route("health"), Ok("/health".to_string()));
        assert_eq!(status_route("/admin/status"), Ok("/admin/status".to_string()));
    }

    #[test]
    fn test_status_route_overlapping_redirects_is_rejected() {
        for path in ["/", "", "/{name}", "/{*rest}", "/a*", "//x", "/s?x=1"] {
            assert_eq!(
                status_route(path),
                Err(ServerError::StatusPathConflict(path.to_string())),
                "{path}"
            );
        }
    }

    #[test]
    fn test_server_refuses_root_status_path() {
        assert!(matches!(
            server_with_status_path("/"),
            Err(ServerError::StatusPathConflict(_))
        ));
        assert!(server_with_status_path("/_status").is_ok());
    }
}
