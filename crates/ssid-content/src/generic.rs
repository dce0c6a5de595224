//! # Generic Credential Content
//!
//! | Method | Path | Body | Response |
//! |--------|------|------|----------|
//! | POST | `/handleGenericVC` | `{"action":"get_vc","cid":"<cid>"}` | `{"message":{"data":…,"hash":"0x…"}}` |
//!
//! The returned `hash` is the hash of record of every generic credential
//! that references the `cid`.

use serde::{Deserialize, Serialize};
use ssid_core::{Cid, Hash256};

use crate::error::ContentError;
use crate::ContentClient;

/// Endpoint name under the service base URL.
pub const GENERIC_VC_ENDPOINT: &str = "handleGenericVC";

/// Request body for `handleGenericVC`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericVcRequest {
    /// Operation; always `get_vc` for reads.
    pub action: String,
    /// Content identifier as text.
    pub cid: String,
}

impl GenericVcRequest {
    /// A read request for `cid`.
    pub fn get_vc(cid: &Cid) -> Self {
        Self {
            action: "get_vc".to_string(),
            cid: cid.as_str().to_string(),
        }
    }
}

/// Content stored for a `cid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenericVcContent {
    /// The credential content itself.
    pub data: serde_json::Value,
    /// Hash of record.
    pub hash: Hash256,
}

/// Response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenericVcResponse {
    pub message: GenericVcContent,
}

impl ContentClient {
    /// Fetch the content and hash stored for `cid`.
    pub async fn fetch_generic_vc(&self, cid: &Cid) -> Result<GenericVcContent, ContentError> {
        let endpoint = format!("POST /{GENERIC_VC_ENDPOINT}");
        let url = self.config().endpoint(GENERIC_VC_ENDPOINT);
        tracing::debug!(cid = %cid, "fetching generic credential content");

        let resp = self
            .http()
            .post(&url)
            .json(&GenericVcRequest::get_vc(cid))
            .send()
            .await
            .map_err(|e| ContentError::Http {
                endpoint: endpoint.clone(),
                source: e,
            })?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(ContentError::NotFound(cid.to_string()));
        }

        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            return Err(ContentError::ApiError {
                endpoint,
                status,
                body,
            });
        }

        resp.json::<GenericVcResponse>()
            .await
            .map(|r| r.message)
            .map_err(|e| ContentError::Deserialization {
                endpoint,
                source: e,
            })
    }
}
