//! In-memory content service backed by `DashMap`.
//!
//! Content is keyed by the `cid` text. The hash of record is the SHA-256 of
//! the serialized content unless one is supplied explicitly.

use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;
use ssid_content::{ContentError, ContentService, GenericVcContent};
use ssid_core::{Cid, Hash256};

/// Shared content store. Cheaply cloneable; all clones share the same data.
#[derive(Clone, Default)]
pub struct MemoryContentService {
    entries: Arc<DashMap<String, GenericVcContent>>,
}

impl MemoryContentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `data` under `cid` and return its hash of record.
    pub fn put(&self, cid: &str, data: Value) -> Hash256 {
        let hash = ssid_crypto::sha256(data.to_string().as_bytes());
        self.put_with_hash(cid, data, hash);
        hash
    }

    /// Store `data` under `cid` with an explicit hash.
    pub fn put_with_hash(&self, cid: &str, data: Value, hash: Hash256) {
        self.entries
            .insert(cid.to_string(), GenericVcContent { data, hash });
    }

    pub fn get(&self, cid: &str) -> Option<GenericVcContent> {
        self.entries.get(cid).map(|e| e.value().clone())
    }

    pub fn remove(&self, cid: &str) -> Option<GenericVcContent> {
        self.entries.remove(cid).map(|(_, v)| v)
    }
}

#[async_trait]
impl ContentService for MemoryContentService {
    async fn fetch_generic_vc(&self, cid: &Cid) -> Result<GenericVcContent, ContentError> {
        self.get(cid.as_str())
            .ok_or_else(|| ContentError::NotFound(cid.to_string()))
    }
}
