mod common;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::header::{CONTENT_TYPE, HOST, VIA};
use axum::http::{Method, StatusCode};
use bootvisor::http::{self, AppState, Listener, Proxy};
use bootvisor::{Addr, DEFAULT_EVENT_PATHS, Engine, Event};
use common::{FakeRuntime, ID, capture};
use futures::StreamExt;
use tokio::time::timeout;
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

fn facade(upstream: &Path) -> (Router, Arc<Engine>, CancellationToken, Arc<std::sync::Mutex<String>>) {
    let engine = Engine::builder(Arc::new(FakeRuntime::new()), capture().0).build();
    let (log, written) = capture();
    let proxy = Proxy::new(Addr::Unix { path: upstream.to_path_buf() }, log);
    let token = CancellationToken::new();

    let paths: Vec<String> = DEFAULT_EVENT_PATHS.iter().map(|p| p.to_string()).collect();
    let router = http::router(AppState::new(Arc::clone(&engine), proxy, token.clone()), &paths);
    (router, engine, token, written)
}

fn get(uri: &str) -> Request {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_event_stream_delivers_native_json() {
    let dir = tempfile::tempdir().unwrap();
    let (router, engine, _token, _) = facade(&dir.path().join("docker.sock"));

    let resp = router.oneshot(get("/events")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()[CONTENT_TYPE], "application/json");
    assert_eq!(engine.subscribers().len(), 1);

    let event = Arc::new(Event::container("start", ID).with_attribute("image", "nginx"));
    assert_eq!(engine.emit(&event).await, 1);

    let mut body = resp.into_body().into_data_stream();
    let chunk = timeout(Duration::from_secs(1), body.next()).await.unwrap().unwrap().unwrap();
    assert_eq!(chunk.as_ref(), serde_json::to_vec(event.as_ref()).unwrap().as_slice());

    drop(body);
    assert!(engine.subscribers().is_empty());
}

#[tokio::test]
async fn test_every_event_path_streams() {
    let dir = tempfile::tempdir().unwrap();
    let (router, engine, _token, _) = facade(&dir.path().join("docker.sock"));

    for path in DEFAULT_EVENT_PATHS {
        let resp = router.clone().oneshot(get(path)).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK, "{path}");
        assert_eq!(resp.headers()[CONTENT_TYPE], "application/json", "{path}");
    }
    assert!(engine.subscribers().is_empty());
}

#[tokio::test]
async fn test_event_stream_ends_on_shutdown() {
    let dir = tempfile::tempdir().unwrap();
    let (router, engine, token, _) = facade(&dir.path().join("docker.sock"));

    let resp = router.oneshot(get("/v1.24/events")).await.unwrap();
    let mut body = resp.into_body().into_data_stream();

    token.cancel();
    let next = timeout(Duration::from_secs(1), body.next()).await.unwrap();
    assert!(next.is_none());

    drop(body);
    assert!(engine.subscribers().is_empty());
}

#[tokio::test]
async fn test_proxy_reports_unreachable_upstream() {
    let dir = tempfile::tempdir().unwrap();
    let (router, _, _, written) = facade(&dir.path().join("missing.sock"));

    let resp = router.oneshot(get("/containers/json")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert!(resp.headers().get(VIA).is_none());

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let body = String::from_utf8(body.to_vec()).unwrap();
    assert!(body.starts_with("<h1>Proxy error</h1><pre>dial unix://"), "{body}");

    let log = written.lock().unwrap();
    assert!(log.contains(">>> GET /containers/json"));
    assert!(log.contains("<<< 502 dial"));
}

#[tokio::test]
async fn test_proxy_forwards_to_unix_upstream() {
    let dir = tempfile::tempdir().unwrap();
    let socket = dir.path().join("docker.sock");

    let upstream = Router::new().fallback(|req: Request| async move {
        let host = req
            .headers()
            .get(HOST)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("-")
            .to_string();
        let body = to_bytes(req.into_body(), usize::MAX).await.unwrap();
        (
            StatusCode::CREATED,
            [("x-upstream", "docker")],
            format!("{host} {}", String::from_utf8_lossy(&body)),
        )
    });
    let listener = tokio::net::UnixListener::bind(&socket).unwrap();
    tokio::spawn(async move { axum::serve(listener, upstream).await });

    let (router, _, _, written) = facade(&socket);
    let req = Request::builder()
        .method(Method::POST)
        .uri("http://localhost/v1.24/containers/create?name=web")
        .body(Body::from("{\"Image\":\"nginx\"}"))
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()["x-upstream"], "docker");
    assert_eq!(resp.headers()[VIA], "1.1 Boot");

    let body = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert_eq!(body.as_ref(), b"unix.sock {\"Image\":\"nginx\"}");

    let log = written.lock().unwrap();
    assert!(log.contains(">>> POST http://localhost/v1.24/containers/create?name=web"));
    assert!(log.contains("<<< 201 Created"));
}

#[tokio::test]
async fn test_listener_binds_over_stale_socket() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("boot.sock");
    std::fs::write(&path, b"stale").unwrap();

    let listener = Listener::bind(&Addr::Unix { path: path.clone() }).await.unwrap();
    assert_eq!(listener.describe(), format!("unix://{}", path.display()));
}

#[tokio::test]
async fn test_serve_stops_on_cancel() {
    let listener = Listener::bind(&Addr::parse("http://127.0.0.1:0").unwrap())
        .await
        .unwrap();
    assert!(listener.describe().starts_with("http://127.0.0.1:"));

    let token = CancellationToken::new();
    let server = tokio::spawn(http::serve(listener, Router::new(), token.clone()));
    token.cancel();

    let res = timeout(Duration::from_secs(1), server).await.unwrap().unwrap();
    assert!(res.is_ok());
}
