// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Overpass retry behaviour against an in-process endpoint

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Form, Router};
use citymesh_scene::{OverpassClient, OverpassConfig};
use serde::Deserialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

const PAYLOAD: &str = r#"{"elements":[{"type":"way","id":7,"tags":{"building":"yes"},
"geometry":[{"lat":44.818,"lon":20.405},{"lat":44.818,"lon":20.406},{"lat":44.819,"lon":20.406}]}]}"#;

#[derive(Clone)]
struct Mock {
    calls: Arc<AtomicU32>,
    /// Calls answered with `failure` before the payload is served
    failures: u32,
    failure: StatusCode,
}

#[derive(Deserialize)]
struct Query {
    data: String,
}

async fn interpreter(State(mock): State<Mock>, Form(query): Form<Query>) -> (StatusCode, String) {
    assert!(query.data.contains("out geom;"));
    let call = mock.calls.fetch_add(1, Ordering::SeqCst) + 1;
    if call <= mock.failures {
        (mock.failure, String::new())
    } else {
        (StatusCode::OK, PAYLOAD.to_string())
    }
}

async fn serve(failures: u32, failure: StatusCode) -> (String, Arc<AtomicU32>) {
    let calls = Arc::new(AtomicU32::new(0));
    let mock = Mock {
        calls: calls.clone(),
        failures,
        failure,
    };
    let app = Router::new()
        .route("/api/interpreter", post(interpreter))
        .with_state(mock);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    (format!("http://{addr}/api/interpreter"), calls)
}

fn config(endpoint: String) -> OverpassConfig {
    OverpassConfig {
        endpoint,
        gateway_backoff: Duration::from_millis(1),
        failure_backoff: Duration::from_millis(5),
        request_timeout: Duration::from_secs(5),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_nine_gateway_timeouts_then_success() {
    let (endpoint, calls) = serve(9, StatusCode::GATEWAY_TIMEOUT).await;
    let client = OverpassClient::new(config(endpoint)).unwrap();

    let elements = client.fetch_elements().await;
    assert_eq!(elements.len(), 1);
    assert_eq!(elements[0].id, 7);
    assert_eq!(calls.load(Ordering::SeqCst), 10);
}

#[tokio::test]
async fn test_other_errors_retry_too() {
    let (endpoint, calls) = serve(2, StatusCode::TOO_MANY_REQUESTS).await;
    let client = OverpassClient::new(config(endpoint)).unwrap();

    assert_eq!(client.fetch_elements().await.len(), 1);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_exhausted_budget_yields_empty() {
    let (endpoint, calls) = serve(u32::MAX, StatusCode::GATEWAY_TIMEOUT).await;
    let client = OverpassClient::new(OverpassConfig {
        max_attempts: 4,
        ..config(endpoint)
    })
    .unwrap();

    assert!(client.fetch_elements().await.is_empty());
    assert_eq!(calls.load(Ordering::SeqCst), 4);
}

#[tokio::test]
async fn test_unreachable_endpoint_yields_empty() {
    // nothing listens on the discard port
    let client = OverpassClient::new(OverpassConfig {
        max_attempts: 2,
        ..config("http://127.0.0.1:9/api/interpreter".to_string())
    })
    .unwrap();

    assert!(client.fetch_elements().await.is_empty());
}
