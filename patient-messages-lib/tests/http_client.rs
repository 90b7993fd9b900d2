//! HTTP record source tests against a local server.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::time::Duration;

use http_body_util::Full;
use hyper::Request;
use hyper::Response;
use hyper::StatusCode;
use hyper::body::Bytes;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use patient_messages_lib::{
    ClientConfig, LoadError, LoadState, MessageClient, RecordId, RecordSource, RecordStore,
    project,
};
use tokio::net::TcpListener;

/// Serve every request with the same status and body. Returns the endpoint URL.
async fn serve(status: StatusCode, body: &'static str) -> String {
    serve_bytes(status, Bytes::from_static(body.as_bytes())).await
}

async fn serve_bytes(status: StatusCode, body: Bytes) -> String {
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        loop {
            let Ok((stream, _)) = listener.accept().await else {
                return;
            };
            let body = body.clone();
            let service = service_fn(move |_req: Request<Incoming>| {
                let body = body.clone();
                async move {
                    Ok::<_, Infallible>(
                        Response::builder()
                            .status(status)
                            .header("Content-Type", "application/json")
                            .body(Full::new(body))
                            .unwrap(),
                    )
                }
            });
            tokio::spawn(async move {
                let _ = http1::Builder::new()
                    .serve_connection(TokioIo::new(stream), service)
                    .await;
            });
        }
    });

    format!("http://{}/data", addr)
}

fn client(endpoint: &str) -> MessageClient {
    let config = ClientConfig::new(endpoint)
        .unwrap()
        .with_timeout(Duration::from_secs(5));
    MessageClient::from_config(&config).unwrap()
}

const SCENARIO: &str = r#"[
    {"id": 1, "patient_name": "Jane Roe", "room_number": "4A",
     "attending_person_name": "Nurse Kim", "send_timestamp": 100,
     "reply_timestamp": 150, "admin_comments": ""},
    {"id": 2, "patient_name": "John Doe", "room_number": "4B",
     "attending_person_name": "Nurse Lee", "send_timestamp": 200,
     "reply_timestamp": null, "admin_comments": "awaiting reply"}
]"#;

#[tokio::test]
async fn test_fetch_decodes_records() {
    let endpoint = serve(StatusCode::OK, SCENARIO).await;
    let records = client(&endpoint).fetch().await.unwrap();

    assert_eq!(records.len(), 2);
    assert_eq!(records[0].id, RecordId::from(1));
    assert_eq!(records[1].patient_name.as_deref(), Some("John Doe"));
    assert!(records[1].reply_timestamp.is_none());
}

#[tokio::test]
async fn test_non_success_status_is_http_error() {
    let endpoint = serve(StatusCode::INTERNAL_SERVER_ERROR, "").await;
    let err = client(&endpoint).fetch().await.unwrap_err();

    assert_eq!(err.status_code(), Some(500));
    assert_eq!(err.to_string(), "HTTP 500: Internal Server Error");
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let endpoint = serve(StatusCode::OK, r#"{"rows": []}"#).await;
    let err = client(&endpoint).fetch().await.unwrap_err();

    assert!(err.is_decode());
    match err {
        LoadError::Decode { body, .. } => assert_eq!(body.as_deref(), Some(r#"{"rows": []}"#)),
        other => panic!("expected decode error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_endpoint_is_network_error() {
    // Bind then drop to get a port nobody listens on.
    let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let err = client(&format!("http://{}/data", addr)).fetch().await.unwrap_err();
    assert!(matches!(err, LoadError::Network(_)));
}

#[tokio::test]
async fn test_store_with_http_source_scenario() {
    let endpoint = serve(StatusCode::OK, SCENARIO).await;
    let store = RecordStore::new();
    store.mount(client(&endpoint));

    let state = store.settled().await;
    assert!(state.is_loaded());

    let view = project(&state, &[RecordId::from(1)]);
    assert!(view.rows[0].is_selected);
    assert_eq!(view.rows[0].latency_text(), "50s");
    assert!(!view.rows[1].is_selected);
    assert_eq!(view.rows[1].latency_text(), "not available");
    assert!(view.header.is_indeterminate());
    assert!(!view.header.is_checked());
}

#[tokio::test]
async fn test_store_with_failing_http_source() {
    let endpoint = serve(StatusCode::SERVICE_UNAVAILABLE, "down for maintenance").await;
    let store = RecordStore::new();
    store.mount(client(&endpoint));

    let state = store.settled().await;
    assert_eq!(
        state,
        LoadState::Failed("HTTP 503: down for maintenance".to_string())
    );
    assert!(project(&state, &[]).rows.is_empty());
}

#[tokio::test]
async fn test_large_error_page_is_capped() {
    let page = format!("<html><body>{}</body></html>", "x".repeat(120_000));
    let endpoint = serve_bytes(StatusCode::BAD_GATEWAY, Bytes::from(page)).await;
    let store = RecordStore::new();
    store.mount(client(&endpoint));

    let state = store.settled().await;
    let message = state.error().expect("load fails on 502");
    assert!(message.starts_with("HTTP 502: <html><body>xxx"));
    assert!(message.len() <= "HTTP 502: ".len() + 512);

    let view = project(&state, &[]);
    assert!(view.rows.is_empty());
}
