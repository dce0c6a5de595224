//! # Credential Schemas
//!
//! Schemas for off-ledger JSON credentials are registered on the ledger
//! under the SHA-256 of their serialized properties.

use std::sync::Arc;

use ssid_core::Hash256;
use ssid_crypto::Signer;
use ssid_vc::Schema;

use crate::error::{NotFound, SdkError};
use crate::ledger::{Ledger, LedgerCall};
use crate::submit::submit_and_watch;

#[derive(Clone)]
pub struct SchemaClient {
    ledger: Arc<dyn Ledger>,
}

impl SchemaClient {
    pub fn new(ledger: Arc<dyn Ledger>) -> Self {
        Self { ledger }
    }

    pub async fn store_schema(
        &self,
        schema: &Schema,
        signer: &dyn Signer,
    ) -> Result<Hash256, SdkError> {
        let call = LedgerCall::SchemaAdd {
            hash: schema.hash,
            json_data: schema.json_data.as_bytes().to_vec(),
        };
        submit_and_watch(self.ledger.as_ref(), call, signer).await
    }

    /// Whether a schema is registered under `hash`.
    ///
    /// A hash that is not valid hex is simply not registered.
    pub async fn schema_exists(&self, hash: &str) -> Result<bool, SdkError> {
        let Ok(hash) = Hash256::from_hex(hash) else {
            return Ok(false);
        };
        Ok(self.ledger.schema(&hash).await?.is_some())
    }

    /// The stored schema, or [`NotFound::Schema`].
    pub async fn get_schema(&self, hash: &Hash256) -> Result<Schema, SdkError> {
        let json_data = self
            .ledger
            .schema(hash)
            .await?
            .ok_or(NotFound::Schema(*hash))?;
        Ok(Schema {
            json_data,
            hash: *hash,
        })
    }
}
