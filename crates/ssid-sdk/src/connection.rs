//! # Connection Pool
//!
//! One ledger connection per [`Network`], created on first use and shared
//! afterwards. Concurrent first callers wait on the same connection attempt
//! instead of opening several.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use ssid_core::Network;
use tokio::sync::Mutex;

use crate::error::LedgerError;
use crate::ledger::Ledger;

/// Opens ledger connections.
#[async_trait]
pub trait LedgerConnector: Send + Sync {
    async fn connect(&self, network: Network) -> Result<Arc<dyn Ledger>, LedgerError>;
}

/// Memoizes one connection per network.
pub struct ConnectionPool {
    connector: Arc<dyn LedgerConnector>,
    connections: Mutex<HashMap<Network, Arc<dyn Ledger>>>,
}

impl ConnectionPool {
    pub fn new(connector: Arc<dyn LedgerConnector>) -> Self {
        Self {
            connector,
            connections: Mutex::new(HashMap::new()),
        }
    }

    /// The shared connection for `network`, connecting if needed.
    ///
    /// A failed attempt is not cached; the next call retries.
    pub async fn get(&self, network: Network) -> Result<Arc<dyn Ledger>, LedgerError> {
        let mut connections = self.connections.lock().await;
        if let Some(ledger) = connections.get(&network) {
            return Ok(Arc::clone(ledger));
        }
        tracing::info!(%network, endpoint = network.ledger_endpoint(), "connecting to ledger");
        let ledger = self.connector.connect(network).await?;
        connections.insert(network, Arc::clone(&ledger));
        Ok(ledger)
    }

    /// A new connection that bypasses the pool.
    pub async fn connect_fresh(&self, network: Network) -> Result<Arc<dyn Ledger>, LedgerError> {
        self.connector.connect(network).await
    }

    /// Forget the pooled connection for `network`. Returns whether one existed.
    ///
    /// Holders of the old `Arc` keep using it until they drop it.
    pub async fn close(&self, network: Network) -> bool {
        let removed = self.connections.lock().await.remove(&network).is_some();
        if removed {
            tracing::info!(%network, "closed ledger connection");
        }
        removed
    }

    pub async fn close_all(&self) {
        self.connections.lock().await.clear();
    }

    /// Networks with a pooled connection.
    pub async fn connected(&self) -> Vec<Network> {
        self.connections.lock().await.keys().copied().collect()
    }
}

impl std::fmt::Debug for ConnectionPool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionPool").finish_non_exhaustive()
    }
}
