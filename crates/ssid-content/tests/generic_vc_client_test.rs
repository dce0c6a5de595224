//! Contract tests for the content client against `POST /handleGenericVC`.
//!
//! wiremock stands in for the hosted service; request and response shapes
//! follow the deployed endpoint.

use ssid_content::{ContentClient, ContentError, ContentService, ContentServiceConfig};
use ssid_core::{Cid, Hash256};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(mock_server: &MockServer) -> ContentClient {
    let config = ContentServiceConfig::with_base_url(&mock_server.uri()).unwrap();
    ContentClient::new(config).unwrap()
}

fn hash_hex() -> String {
    format!("0x{}", "ab".repeat(32))
}

#[tokio::test]
async fn fetch_sends_get_vc_action_and_returns_hash() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/handleGenericVC"))
        .and(body_json(serde_json::json!({"action": "get_vc", "cid": "bafy-cid-1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": {
                "data": {"name": "Alice", "degree": "BSc"},
                "hash": hash_hex()
            }
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = test_client(&mock_server);
    let content = client
        .fetch_generic_vc(&Cid::new("bafy-cid-1").unwrap())
        .await
        .unwrap();

    assert_eq!(content.hash, Hash256([0xab; 32]));
    assert_eq!(content.data["degree"], "BSc");
}

#[tokio::test]
async fn trait_object_dispatches_to_http() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/handleGenericVC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": {"data": null, "hash": hash_hex()}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let service: Box<dyn ContentService> = Box::new(test_client(&mock_server));
    let content = service
        .fetch_generic_vc(&Cid::new("x").unwrap())
        .await
        .unwrap();
    assert_eq!(content.hash, Hash256([0xab; 32]));
}

#[tokio::test]
async fn not_found_is_typed() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/handleGenericVC"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .fetch_generic_vc(&Cid::new("missing").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::NotFound(cid) if cid == "missing"));
}

#[tokio::test]
async fn server_error_carries_status_and_body() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/handleGenericVC"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .fetch_generic_vc(&Cid::new("c").unwrap())
        .await
        .unwrap_err();
    match err {
        ContentError::ApiError { status, body, .. } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected ApiError, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_hash_is_a_deserialization_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/handleGenericVC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "message": {"data": {}, "hash": "not-hex"}
        })))
        .mount(&mock_server)
        .await;

    let err = test_client(&mock_server)
        .fetch_generic_vc(&Cid::new("c").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Deserialization { .. }));
}

#[tokio::test]
async fn connection_failure_is_http_error() {
    // Nothing listens on this port.
    let config = ContentServiceConfig::with_base_url("http://127.0.0.1:9").unwrap();
    let client = ContentClient::new(config).unwrap();
    let err = client
        .fetch_generic_vc(&Cid::new("c").unwrap())
        .await
        .unwrap_err();
    assert!(matches!(err, ContentError::Http { .. }));
}
