use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};

use legal_rag_server::config::SearchConfig;
use legal_rag_server::error::ApiError;
use legal_rag_server::search::{SearchProvider, TavilyClient};

#[derive(Clone)]
struct Attempts(Arc<AtomicUsize>);

async fn spawn_stub(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn client_for(addr: SocketAddr) -> TavilyClient {
    TavilyClient::new(SearchConfig {
        api_key: "test-key".to_string(),
        base_url: format!("http://{}", addr),
        topic_prefix: "company law".to_string(),
        timeout_seconds: 5,
    })
}

fn ranked_results() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "results": [
            {
                "title": "AGM notice requirements",
                "url": "https://example.com/agm",
                "content": "Notice periods for annual general meetings.",
                "score": 0.9
            }
        ]
    }))
}

// Fails the first request with a 500, serves results afterwards.
async fn flaky_search(State(attempts): State<Attempts>) -> Response {
    if attempts.0.fetch_add(1, Ordering::SeqCst) == 0 {
        (StatusCode::INTERNAL_SERVER_ERROR, "upstream error").into_response()
    } else {
        ranked_results().into_response()
    }
}

async fn always_500(State(attempts): State<Attempts>) -> Response {
    attempts.0.fetch_add(1, Ordering::SeqCst);
    (StatusCode::INTERNAL_SERVER_ERROR, "upstream error").into_response()
}

async fn always_400(State(attempts): State<Attempts>) -> Response {
    attempts.0.fetch_add(1, Ordering::SeqCst);
    (StatusCode::BAD_REQUEST, "bad query").into_response()
}

#[tokio::test]
async fn server_error_is_retried_once_then_succeeds() {
    let attempts = Attempts(Arc::new(AtomicUsize::new(0)));
    let app = Router::new()
        .route("/search", post(flaky_search))
        .with_state(attempts.clone());
    let addr = spawn_stub(app).await;

    let results = client_for(addr)
        .search("What is an AGM?", 3)
        .await
        .expect("second attempt should recover");

    assert_eq!(attempts.0.load(Ordering::SeqCst), 2);
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].title, "AGM notice requirements");
}

#[tokio::test]
async fn persistent_server_errors_fail_after_exactly_one_retry() {
    let attempts = Attempts(Arc::new(AtomicUsize::new(0)));
    let app = Router::new()
        .route("/search", post(always_500))
        .with_state(attempts.clone());
    let addr = spawn_stub(app).await;

    let err = client_for(addr).search("What is an AGM?", 3).await.unwrap_err();

    assert_eq!(attempts.0.load(Ordering::SeqCst), 2);
    assert!(matches!(err, ApiError::SearchUnavailable(_)));
}

#[tokio::test]
async fn client_error_is_not_retried() {
    let attempts = Attempts(Arc::new(AtomicUsize::new(0)));
    let app = Router::new()
        .route("/search", post(always_400))
        .with_state(attempts.clone());
    let addr = spawn_stub(app).await;

    let err = client_for(addr).search("What is an AGM?", 3).await.unwrap_err();

    assert_eq!(attempts.0.load(Ordering::SeqCst), 1);
    assert!(matches!(err, ApiError::SearchUnavailable(_)));
}
