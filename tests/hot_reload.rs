mod common;

use std::io::Write;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use common::{body_json, get};
use route_mount::config::{load_config, AppConfig, ResourceConfig};
use route_mount::http::HttpServer;
use route_mount::mount::MountRegistry;
use route_mount::resources::ResourceCatalog;
use route_mount::routing::Router;

fn static_resource(name: &str, path: &str, payload: serde_json::Value) -> ResourceConfig {
    let mut config = ResourceConfig::new(name, "static");
    config.path = Some(path.to_string());
    config.payload = Some(payload);
    config
}

fn setup() -> (Arc<MountRegistry>, HttpServer) {
    let router = Arc::new(Router::new());
    let registry = Arc::new(MountRegistry::new(router.clone(), ResourceCatalog::builtin()));
    let server = HttpServer::new(AppConfig::default(), router);
    (registry, server)
}

#[tokio::test]
async fn test_apply_attaches_and_serves() {
    let (registry, server) = setup();
    let report = registry.apply(&[static_resource("status", "/status", json!({ "ok": true }))]);
    assert_eq!(report.attached, vec!["status".to_string()]);
    assert!(report.detached.is_empty());

    let res = server.app().oneshot(get("/status")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(body_json(res).await, json!({ "ok": true }));

    // HEAD is answered by the GET binding.
    let res = server
        .app()
        .oneshot(Request::head("/status").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unchanged_config_is_noop() {
    let (registry, _server) = setup();
    let resources = vec![static_resource("status", "/status", json!(1))];
    registry.apply(&resources);
    let bindings = registry.router().len();

    assert!(registry.apply(&resources).is_noop());
    assert_eq!(registry.router().len(), bindings);
}

#[tokio::test]
async fn test_changed_resource_is_replaced() {
    let (registry, server) = setup();
    registry.apply(&[static_resource("status", "/status", json!({ "v": 1 }))]);
    assert_eq!(registry.router().len(), 1);

    let report = registry.apply(&[static_resource("status", "/status", json!({ "v": 2 }))]);
    assert_eq!(report.detached, vec!["status".to_string()]);
    assert_eq!(report.attached, vec!["status".to_string()]);
    assert_eq!(registry.router().len(), 1);

    let res = server.app().oneshot(get("/status")).await.unwrap();
    assert_eq!(body_json(res).await, json!({ "v": 2 }));
}

#[tokio::test]
async fn test_moved_resource_leaves_old_path() {
    let (registry, server) = setup();
    registry.apply(&[static_resource("status", "/status", json!(true))]);
    registry.apply(&[static_resource("status", "/health", json!(true))]);

    let res = server.app().oneshot(get("/status")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let res = server.app().oneshot(get("/health")).await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_removed_resource_is_detached() {
    let (registry, server) = setup();
    registry.apply(&[
        static_resource("status", "/status", json!(true)),
        static_resource("version", "/version", json!("1.0")),
    ]);
    assert_eq!(registry.names(), vec!["status".to_string(), "version".to_string()]);

    let report = registry.apply(&[static_resource("version", "/version", json!("1.0"))]);
    assert_eq!(report.detached, vec!["status".to_string()]);
    assert!(report.attached.is_empty());
    assert_eq!(registry.len(), 1);

    let res = server.app().oneshot(get("/status")).await.unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(res).await,
        json!({ "error": "Not found", "code": 404, "expose": true })
    );
}

#[tokio::test]
async fn test_failed_resource_does_not_block_others() {
    let (registry, _server) = setup();
    let report = registry.apply(&[
        ResourceConfig::new("ghost", "nonexistent"),
        static_resource("status", "/status", json!(true)),
    ]);
    assert_eq!(report.attached, vec!["status".to_string()]);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].0, "ghost");
    assert_eq!(registry.len(), 1);
}

#[tokio::test]
async fn test_detach_all_empties_router() {
    let (registry, _server) = setup();
    registry.apply(&[
        static_resource("a", "/a", json!(1)),
        static_resource("b", "/b", json!(2)),
    ]);
    assert_eq!(registry.detach_all(), 2);
    assert!(registry.is_empty());
    assert!(registry.router().is_empty());
}

#[tokio::test]
async fn test_echo_resource_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
        [[resources]]
        name = "echo"
        kind = "echo"
        path = "/echo"
        "#
    )
    .unwrap();

    let catalog = ResourceCatalog::builtin();
    let kinds = catalog.kinds();
    let kind_refs: Vec<&str> = kinds.iter().map(String::as_str).collect();
    let config = load_config(file.path(), &kind_refs).unwrap();

    let router = Arc::new(Router::new());
    let registry = MountRegistry::new(router.clone(), catalog);
    let report = registry.apply(&config.resources);
    assert_eq!(report.attached, vec!["echo".to_string()]);

    let server = HttpServer::new(config, router);
    let res = server
        .app()
        .oneshot(
            Request::post("/echo?page=2")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"name":"ada"}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(
        body_json(res).await,
        json!({ "query": { "page": "2" }, "body": { "name": "ada" } })
    );

    let res = server.app().oneshot(get("/echo?q=x")).await.unwrap();
    assert_eq!(body_json(res).await, json!({ "query": { "q": "x" } }));
}
