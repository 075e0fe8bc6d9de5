use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use spawngrid::{BucketCache, BucketRecord, Config, MemoryStore};
use spawngrid_server::{ErrorBody, Handler, Health, StatusPolicy, router, run_server};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

fn handler(policy: StatusPolicy) -> (Handler, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let cache = BucketCache::new(store.clone(), Config::default()).unwrap();
    (Handler::new(Arc::new(cache), policy), store)
}

async fn get(handler: Handler, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
    let request = Request::builder()
        .uri(uri)
        .header(header::ORIGIN, "https://map.example.com")
        .body(Body::empty())
        .unwrap();
    let response = router(handler).oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

#[tokio::test]
async fn test_coordinates_body_shape() {
    tracing_subscriber::fmt::try_init().ok();
    let (handler, store) = handler(StatusPolicy::Strict);

    let (status, headers, body) = get(handler, "/coordinates/37.7749/-122.4194").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["CoordinateBucket"], "2777:-9002");
    assert_eq!(json["ZombieCoordinates"].as_array().unwrap().len(), 45);
    assert_eq!(json["LootboxCoordinates"].as_array().unwrap().len(), 45);
    assert_eq!(json["ZombieCoordinates"][0].as_array().unwrap().len(), 2);

    let record: BucketRecord = serde_json::from_slice(&body).unwrap();
    let age = chrono::Utc::now() - record.generated_at;
    assert!(age < chrono::TimeDelta::minutes(1));
    assert_eq!(store.len(), 9);
}

#[tokio::test]
async fn test_percent_encoded_path_accepted() {
    let (handler, _) = handler(StatusPolicy::Strict);
    let (status, _, body) = get(handler, "/coordinates/37.7749/%2D122.4194").await;
    assert_eq!(status, StatusCode::OK);

    let record: BucketRecord = serde_json::from_slice(&body).unwrap();
    assert_eq!(record.id, "2777:-9002");
}

#[tokio::test]
async fn test_malformed_latitude_is_client_error() {
    let (handler, store) = handler(StatusPolicy::Strict);

    let (status, headers, body) = get(handler, "/coordinates/abc/1.0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");

    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("latitude"), "{}", error.error);
    assert_eq!(store.stats().get_count, 0);
}

#[tokio::test]
async fn test_legacy_policy_answers_500() {
    let (handler, store) = handler(StatusPolicy::Legacy);

    let (status, _, body) = get(handler, "/coordinates/abc/1.0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(serde_json::from_slice::<ErrorBody>(&body).is_ok());
    assert_eq!(store.stats().get_count, 0);
}

#[tokio::test]
async fn test_path_is_decoded_once() {
    let (handler, store) = handler(StatusPolicy::Strict);

    // `%252D1.5` is the encoding of the literal text `%2D1.5`
    let (status, _, body) = get(handler, "/coordinates/%252D1.5/0").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("%2D1.5"), "{}", error.error);
    assert_eq!(store.stats().get_count, 0);
}

#[tokio::test]
async fn test_invalid_utf8_follows_legacy_policy() {
    let (handler, store) = handler(StatusPolicy::Legacy);

    let (status, headers, body) = get(handler, "/coordinates/%FF/0").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(headers[header::CONTENT_TYPE], "application/json");

    let error: ErrorBody = serde_json::from_slice(&body).unwrap();
    assert!(error.error.contains("latitude"), "{}", error.error);
    assert_eq!(store.stats().get_count, 0);
}

#[tokio::test]
async fn test_invalid_utf8_is_client_error() {
    let (handler, _) = handler(StatusPolicy::Strict);

    let (status, _, body) = get(handler, "/coordinates/0/%C3%28").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(serde_json::from_slice::<ErrorBody>(&body).is_ok());
}

#[tokio::test]
async fn test_out_of_range_rejected() {
    let (handler, _) = handler(StatusPolicy::Strict);
    let (status, _, _) = get(handler, "/coordinates/12.0/181").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let (handler, _) = handler(StatusPolicy::Strict);
    let (status, _, _) = get(handler, "/coordinates/12.0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_over_tcp() -> anyhow::Result<()> {
    tracing_subscriber::fmt::try_init().ok();
    let (handler, _) = handler(StatusPolicy::Strict);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let bound_addr = listener.local_addr()?;

    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();
    let server = tokio::spawn(async move {
        run_server(listener, handler, async move {
            stop_rx.await.ok();
        })
        .await
    });

    let mut stream = tokio::net::TcpStream::connect(bound_addr).await?;
    stream
        .write_all(b"GET /health HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n")
        .await?;
    let mut response = String::new();
    stream.read_to_string(&mut response).await?;

    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    let body = response.split("\r\n\r\n").nth(1).unwrap_or_default();
    let health: Health = serde_json::from_str(body)?;
    assert_eq!(health, Health::ok());

    stop_tx.send(()).ok();
    server.await??;
    Ok(())
}
