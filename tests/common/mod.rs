//! Shared fixtures for integration tests.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use redirect_router::config::ListenerSettings;
use redirect_router::{HttpServer, RedirectRouter, Shutdown};
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// The Eheschliessung table: one conditional group with a specific and a
/// default routing.
pub fn scenario_table() -> Value {
    json!({
        "version": "1.0",
        "metadata": {
            "created": "2024-01-10T08:00:00Z",
            "lastModified": "2024-03-02T12:30:00Z",
            "author": "Bürgeramt"
        },
        "groups": [
            {
                "name": "Eheschliessung",
                "description": "Civil marriage appointments",
                "dependsOnKey": "leika",
                "dependsOnValue": "99059001000000",
                "routings": [
                    {
                        "name": "BzMitte",
                        "dependsOnKey": "oeid",
                        "dependsOnValue": "2289",
                        "redirectTarget": "https://x/bzmitte"
                    },
                    { "name": "Default", "redirectTarget": "https://x/default" }
                ]
            },
            {
                "name": "Personalausweis",
                "routings": [
                    { "name": "Only", "redirectTarget": "https://x/ausweis" }
                ]
            }
        ]
    })
}

/// Write `contents` to a uniquely named file in the temp directory.
#[allow(dead_code)]
pub fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "redirect-router-{}-{}",
        std::process::id(),
        name
    ));
    std::fs::write(&path, contents).unwrap();
    path
}

/// Start an HTTP server on an ephemeral port. Returns its address and the
/// shutdown handle that stops it.
#[allow(dead_code)]
pub async fn start_server(router: Arc<RedirectRouter>) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(router, &ListenerSettings::default()).unwrap();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}
