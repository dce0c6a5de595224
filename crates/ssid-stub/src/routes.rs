//! Route definitions for the content stub server.
//!
//! Serves the endpoint that `ssid-content` calls, with response shapes that
//! deserialize into the client's types.
//!
//! | Method | Path | Action |
//! |--------|------|--------|
//! | GET | `/health` | liveness |
//! | POST | `/handleGenericVC` | `get_vc` reads, `store_vc` writes |

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use ssid_content::{GenericVcResponse, GENERIC_VC_ENDPOINT};

use crate::content::MemoryContentService;

/// Request body accepted by the stub. `data` is only read by `store_vc`.
#[derive(Debug, Deserialize)]
struct ContentRequest {
    action: String,
    cid: String,
    #[serde(default)]
    data: Option<Value>,
}

/// Build the router over `store`.
pub fn router(store: MemoryContentService) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(&format!("/{GENERIC_VC_ENDPOINT}"), post(handle_generic_vc))
        .fallback(not_implemented)
        .with_state(store)
}

async fn health() -> StatusCode {
    StatusCode::OK
}

async fn handle_generic_vc(
    State(store): State<MemoryContentService>,
    Json(body): Json<ContentRequest>,
) -> Response {
    match body.action.as_str() {
        "get_vc" => match store.get(&body.cid) {
            Some(content) => Json(GenericVcResponse { message: content }).into_response(),
            None => {
                tracing::debug!(cid = %body.cid, "no content stored");
                (
                    StatusCode::NOT_FOUND,
                    Json(json!({"error": format!("no content for cid {}", body.cid)})),
                )
                    .into_response()
            }
        },
        "store_vc" => {
            let data = body.data.unwrap_or(Value::Null);
            let hash = store.put(&body.cid, data);
            tracing::info!(cid = %body.cid, %hash, "stored generic credential content");
            (StatusCode::CREATED, Json(json!({"message": {"hash": hash}}))).into_response()
        }
        other => (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": format!("unknown action {other}")})),
        )
            .into_response(),
    }
}

async fn not_implemented() -> StatusCode {
    StatusCode::NOT_IMPLEMENTED
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use http_body_util::BodyExt;
    use ssid_core::Hash256;
    use tower::ServiceExt;

    async fn body_json(resp: Response) -> Value {
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn post_json(body: Value) -> axum::http::Request<Body> {
        axum::http::Request::builder()
            .method("POST")
            .uri("/handleGenericVC")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn health_returns_200() {
        let req = axum::http::Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();
        let resp = router(MemoryContentService::new()).oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn get_vc_returns_stored_content() {
        let store = MemoryContentService::new();
        store.put_with_hash("cid-1", json!({"name": "Alice"}), Hash256([0xab; 32]));

        let resp = router(store)
            .oneshot(post_json(json!({"action": "get_vc", "cid": "cid-1"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        let body = body_json(resp).await;
        assert_eq!(body["message"]["data"]["name"], "Alice");
        assert_eq!(body["message"]["hash"], format!("0x{}", "ab".repeat(32)));
    }

    #[tokio::test]
    async fn get_vc_unknown_cid_is_404() {
        let resp = router(MemoryContentService::new())
            .oneshot(post_json(json!({"action": "get_vc", "cid": "missing"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn store_then_get() {
        let store = MemoryContentService::new();
        let app = router(store.clone());
        let resp = app
            .clone()
            .oneshot(post_json(
                json!({"action": "store_vc", "cid": "c", "data": {"degree": "BSc"}}),
            ))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
        let stored = store.get("c").unwrap();
        let body = body_json(resp).await;
        assert_eq!(body["message"]["hash"], stored.hash.to_hex());

        let resp = app
            .oneshot(post_json(json!({"action": "get_vc", "cid": "c"})))
            .await
            .unwrap();
        assert_eq!(body_json(resp).await["message"]["data"]["degree"], "BSc");
    }

    #[tokio::test]
    async fn unknown_action_is_400() {
        let resp = router(MemoryContentService::new())
            .oneshot(post_json(json!({"action": "delete", "cid": "c"})))
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
