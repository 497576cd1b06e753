//! # Token Refresh Integration Tests
//!
//! Exercises the 401 refresh-and-retry flow of the API client against a
//! real loopback HTTP server.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::{json, Value};

use chat_client::core::config::ClientConfig;
use chat_client::services::api::ApiClient;
use chat_client::services::storage::{MemoryStore, Session, SessionStore};

const STALE_TOKEN: &str = "stale-access-token";
const GOOD_TOKEN: &str = "fresh-access-token";
const VALID_REFRESH: &str = "valid-refresh-token";

#[derive(Default)]
struct TestBackend {
    rooms_calls: AtomicUsize,
    authorized_rooms_calls: AtomicUsize,
    refresh_calls: AtomicUsize,
}

async fn rooms(
    State(backend): State<Arc<TestBackend>>,
    headers: HeaderMap,
) -> (StatusCode, Json<Value>) {
    backend.rooms_calls.fetch_add(1, Ordering::SeqCst);
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    if auth == format!("Bearer {}", GOOD_TOKEN) {
        backend.authorized_rooms_calls.fetch_add(1, Ordering::SeqCst);
        (
            StatusCode::OK,
            Json(json!([{ "id": 1, "uuid": "room-1", "name": "Algebra" }])),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Token expired" })),
        )
    }
}

async fn refresh(
    State(backend): State<Arc<TestBackend>>,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    backend.refresh_calls.fetch_add(1, Ordering::SeqCst);
    if body["refresh_token"] == VALID_REFRESH {
        (StatusCode::OK, Json(json!({ "access_token": GOOD_TOKEN })))
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "message": "Invalid refresh token" })),
        )
    }
}

async fn spawn_backend() -> (Arc<TestBackend>, String) {
    let backend = Arc::new(TestBackend::default());
    let app = Router::new()
        .route("/api/chatbot/rooms/", get(rooms))
        .route("/api/auth/refresh/", post(refresh))
        .with_state(backend.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test backend");
    });

    (backend, format!("http://{}", addr))
}

fn store_with_tokens(refresh_token: Option<&str>) -> SessionStore {
    let store = SessionStore::new(Arc::new(MemoryStore::default()));
    store.save_session(&Session {
        access_token: STALE_TOKEN.to_string(),
        refresh_token: refresh_token.map(str::to_string),
        email: "alice@example.com".to_string(),
        username: "Alice".to_string(),
    });
    store
}

fn client_for(base_url: String, store: &SessionStore) -> ApiClient {
    let config = ClientConfig {
        api_base_url: base_url,
        ..ClientConfig::default()
    };
    ApiClient::new(config, store.clone())
}

#[tokio::test]
async fn test_401_refreshes_and_retries_exactly_once() {
    let (backend, base_url) = spawn_backend().await;
    let store = store_with_tokens(Some(VALID_REFRESH));
    let client = client_for(base_url, &store);

    let rooms = client.list_rooms().await.expect("request should succeed after refresh");
    assert_eq!(rooms.len(), 1);
    assert_eq!(rooms[0].name, "Algebra");

    // One 401 attempt, one refresh, one authorized retry
    assert_eq!(backend.rooms_calls.load(Ordering::SeqCst), 2);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.authorized_rooms_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.access_token().as_deref(), Some(GOOD_TOKEN));
}

#[tokio::test]
async fn test_invalid_refresh_token_clears_tokens_and_surfaces_original_error() {
    let (backend, base_url) = spawn_backend().await;
    let store = store_with_tokens(Some("wrong-refresh-token"));
    let client = client_for(base_url, &store);

    let err = client.list_rooms().await.expect_err("request should fail");
    assert!(err.is_unauthorized());
    assert_eq!(err.to_string(), "Token expired");

    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test]
async fn test_missing_refresh_token_fails_without_refresh_call() {
    let (backend, base_url) = spawn_backend().await;
    let store = store_with_tokens(None);
    let client = client_for(base_url, &store);

    let err = client.list_rooms().await.expect_err("request should fail");
    assert!(err.is_unauthorized());

    assert_eq!(backend.rooms_calls.load(Ordering::SeqCst), 1);
    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 0);
    assert!(store.access_token().is_none());
    assert!(store.refresh_token().is_none());
}

#[tokio::test]
async fn test_concurrent_401s_share_a_single_refresh() {
    let (backend, base_url) = spawn_backend().await;
    let store = store_with_tokens(Some(VALID_REFRESH));
    let client = Arc::new(client_for(base_url, &store));

    let mut tasks = Vec::new();
    for _ in 0..5 {
        let client = client.clone();
        tasks.push(tokio::spawn(async move { client.list_rooms().await }));
    }
    for task in tasks {
        let rooms = task.await.expect("task").expect("request should succeed");
        assert_eq!(rooms.len(), 1);
    }

    assert_eq!(backend.refresh_calls.load(Ordering::SeqCst), 1);
    assert_eq!(store.access_token().as_deref(), Some(GOOD_TOKEN));
}
