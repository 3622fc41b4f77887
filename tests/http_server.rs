//! HTTP front end tests against a real listener.

use std::net::SocketAddr;
use std::sync::Arc;

use redirect_router::RedirectRouter;
use reqwest::{redirect::Policy, StatusCode};

mod common;

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(Policy::none())
        .no_proxy()
        .build()
        .unwrap()
}

async fn get(addr: SocketAddr, path_and_query: &str) -> reqwest::Response {
    client()
        .get(format!("http://{addr}{path_and_query}"))
        .send()
        .await
        .expect("server unreachable")
}

fn initialized_router() -> Arc<RedirectRouter> {
    let router = Arc::new(RedirectRouter::new());
    router.initialize(&common::scenario_table()).unwrap();
    router
}

#[tokio::test]
async fn test_redirects_to_target() {
    let (addr, shutdown) = common::start_server(initialized_router()).await;

    let res = get(addr, "/Eheschliessung?leika=99059001000000&oeid=2289").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "https://x/bzmitte");
    assert!(res.headers().contains_key("x-request-id"));

    shutdown.trigger();
}

#[tokio::test]
async fn test_miss_is_not_found_with_reason() {
    let (addr, shutdown) = common::start_server(initialized_router()).await;

    let res = get(addr, "/DoesNotExist").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(res.text().await.unwrap(), "no matching routing group found");

    let res = get(addr, "/").await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    shutdown.trigger();
}

#[tokio::test]
async fn test_uninitialized_router_is_unavailable() {
    let (addr, shutdown) = common::start_server(Arc::new(RedirectRouter::new())).await;

    let res = get(addr, "/Eheschliessung").await;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(res.text().await.unwrap(), "not initialized");

    shutdown.trigger();
}

#[tokio::test]
async fn test_status_endpoint() {
    let (addr, shutdown) = common::start_server(initialized_router()).await;

    let res = get(addr, "/_status").await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: serde_json::Value = serde_json::from_str(&res.text().await.unwrap()).unwrap();
    assert_eq!(body["initialized"], true);
    assert_eq!(body["configuration_loaded"], true);
    assert_eq!(body["group_count"], 2);
    assert_eq!(body["version"], "1.0");

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_ascii_group_over_http() {
    let router = Arc::new(RedirectRouter::new());
    router
        .initialize(&serde_json::json!({
            "version": "1.0",
            "groups": [{ "name": "Ämter", "routings": [{ "name": "r", "redirectTarget": "https://x/aemter" }] }]
        }))
        .unwrap();
    let (addr, shutdown) = common::start_server(router).await;

    let res = get(addr, "/%C3%84mter?k=1").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "https://x/aemter");

    shutdown.trigger();
}

#[tokio::test]
async fn test_reload_is_visible_to_server() {
    let router = initialized_router();
    let (addr, shutdown) = common::start_server(router.clone()).await;

    assert_eq!(get(addr, "/Neu").await.status(), StatusCode::NOT_FOUND);

    router
        .initialize(&serde_json::json!({
            "version": "2.0",
            "groups": [{ "name": "Neu", "routings": [{ "name": "r", "redirectTarget": "https://x/neu" }] }]
        }))
        .unwrap();

    let res = get(addr, "/neu").await;
    assert_eq!(res.status(), StatusCode::FOUND);
    assert_eq!(res.headers()["location"], "https://x/neu");

    shutdown.trigger();
}

#[tokio::test]
async fn test_non_get_is_rejected() {
    let (addr, shutdown) = common::start_server(initialized_router()).await;

    let res = client()
        .post(format!("http://{addr}/Eheschliessung"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::METHOD_NOT_ALLOWED);

    shutdown.trigger();
}
