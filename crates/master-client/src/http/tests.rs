//! Tests for the HTTP change queue against a stub master.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use rstest::rstest;
use serde_json::{json, Value};

use pipeline::Revision;

use super::*;

type Received = Arc<Mutex<Vec<Value>>>;

async fn accept(State(received): State<Received>, Json(change): Json<Value>) -> impl IntoResponse {
    let mut received = received.lock().unwrap();
    received.push(change);
    Json(json!({ "changeid": 100 + received.len() as u64 }))
}

async fn refuse() -> impl IntoResponse {
    (StatusCode::BAD_REQUEST, "unknown branch\n")
}

async fn garble() -> impl IntoResponse {
    "this is not json"
}

/// Starts a stub master on an ephemeral port.
async fn stub_master() -> (SocketAddr, Received) {
    let received = Received::default();
    let app = Router::new()
        .route("/changes", post(accept))
        .route("/refuse", post(refuse))
        .route("/garble", post(garble))
        .with_state(received.clone());
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (addr, received)
}

fn queue(addr: SocketAddr, path: &str) -> HttpChangeQueue {
    HttpChangeQueue::new(&MasterConfig::new(format!("http://{addr}{path}"))).unwrap()
}

fn change() -> ChangeRecord {
    ChangeRecord {
        revision: Some(Revision::from("abc123")),
        who: Some("root".to_owned()),
        files: vec!["src/lib.rs".to_owned()],
        when: Some(1_700_000_000),
        ..ChangeRecord::new()
    }
}

#[tokio::test]
async fn posts_record_and_returns_master_id() {
    let (addr, received) = stub_master().await;
    let queue = queue(addr, "/changes");

    let first = queue.add_change(&change()).await.unwrap();
    let second = queue.add_change(&change()).await.unwrap();
    assert_eq!(first.as_u64(), 101);
    assert_eq!(second.as_u64(), 102);

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0]["revision"], "abc123");
    assert_eq!(received[0]["who"], "root");
    assert_eq!(received[0]["files"], json!(["src/lib.rs"]));
    assert_eq!(received[0]["when"], 1_700_000_000);
    assert!(received[0].get("discard").is_none());
}

#[tokio::test]
async fn non_success_status_is_a_rejection() {
    let (addr, _) = stub_master().await;
    let err = queue(addr, "/refuse").add_change(&change()).await.unwrap_err();
    assert!(matches!(err, QueueError::Rejected { .. }));
    assert!(err.to_string().contains("unknown branch"), "{err}");
    assert!(err.to_string().contains("400"), "{err}");
}

#[tokio::test]
async fn unreadable_response_means_unavailable() {
    let (addr, _) = stub_master().await;
    let err = queue(addr, "/garble").add_change(&change()).await.unwrap_err();
    assert!(matches!(err, QueueError::Unavailable { .. }));
}

#[tokio::test]
async fn unreachable_master_means_unavailable() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = queue(addr, "/changes").add_change(&change()).await.unwrap_err();
    assert!(matches!(err, QueueError::Unavailable { .. }));
}

#[tokio::test]
async fn malformed_change_never_leaves_the_process() {
    let (addr, received) = stub_master().await;
    let mut malformed = change();
    malformed.extra.insert("bogus".to_owned(), Value::Bool(true));

    let err = queue(addr, "/changes").add_change(&malformed).await.unwrap_err();
    assert!(matches!(err, QueueError::Rejected { .. }));
    assert!(received.lock().unwrap().is_empty());
}

#[rstest]
#[case::not_a_url("master")]
#[case::wrong_scheme("ftp://master.example.org/changes")]
fn bad_urls_are_refused(#[case] url: &str) {
    let err = HttpChangeQueue::new(&MasterConfig::new(url)).unwrap_err();
    assert!(matches!(err, MasterClientError::InvalidUrl { .. }));
}

#[test]
fn timeout_defaults_when_omitted() {
    let config: MasterConfig = serde_json::from_value(json!({"url": "http://m/changes"})).unwrap();
    assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
}
