//! # ssid-content: Off-Chain Content Service Client
//!
//! Generic verifiable credentials anchor to content hosted off-chain. The
//! ledger stores only a content identifier (`cid`); the content and its hash
//! of record come from this service.
//!
//! ## Architecture
//!
//! [`ContentClient`] is the HTTP implementation of [`ContentService`]. The
//! SDK depends on the trait, so tests and local development can swap in an
//! in-memory service.
//!
//! No retry and no default timeout: a failed request fails the operation
//! that made it, and deadlines are the caller's policy.

pub mod config;
pub mod error;
pub mod generic;

pub use config::{ConfigError, ContentServiceConfig};
pub use error::ContentError;
pub use generic::{GenericVcContent, GenericVcRequest, GenericVcResponse, GENERIC_VC_ENDPOINT};

use async_trait::async_trait;
use ssid_core::Cid;

/// The content service boundary.
///
/// Implementations must be `Send + Sync` so they can be shared across async
/// tasks behind an `Arc`.
#[async_trait]
pub trait ContentService: Send + Sync {
    /// Fetch the content and hash of record stored for `cid`.
    async fn fetch_generic_vc(&self, cid: &Cid) -> Result<GenericVcContent, ContentError>;
}

/// HTTP client for the content service.
#[derive(Debug, Clone)]
pub struct ContentClient {
    http: reqwest::Client,
    config: ContentServiceConfig,
}

impl ContentClient {
    /// Create a client from configuration.
    pub fn new(config: ContentServiceConfig) -> Result<Self, ContentError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| ContentError::Http {
            endpoint: "client_init".into(),
            source: e,
        })?;
        Ok(Self { http, config })
    }

    /// The configuration this client was built from.
    pub fn config(&self) -> &ContentServiceConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }
}

#[async_trait]
impl ContentService for ContentClient {
    async fn fetch_generic_vc(&self, cid: &Cid) -> Result<GenericVcContent, ContentError> {
        ContentClient::fetch_generic_vc(self, cid).await
    }
}
