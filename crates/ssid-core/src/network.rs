//! Deployment environments and their endpoints.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A deployment environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// A ledger node on the developer's machine.
    #[default]
    Local,
    /// Shared development network.
    Dev,
    /// Public test network.
    Testnet,
    /// Production.
    Mainnet,
}

impl Network {
    /// All networks, in declaration order.
    pub const ALL: [Network; 4] = [
        Network::Local,
        Network::Dev,
        Network::Testnet,
        Network::Mainnet,
    ];

    /// WebSocket endpoint of the ledger node.
    pub fn ledger_endpoint(&self) -> &'static str {
        match self {
            Self::Local => "ws://127.0.0.1:9944",
            Self::Dev | Self::Testnet => "wss://n3testnet.metabit.exchange",
            Self::Mainnet => "wss://mui.metablockchain.id",
        }
    }

    /// Base URL of the off-chain content service.
    pub fn content_base_url(&self) -> &'static str {
        match self {
            Self::Local | Self::Dev | Self::Testnet => "https://ssid.metabit.exchange/dev",
            Self::Mainnet => "https://ssid.metabit.exchange/prod",
        }
    }

    /// Lowercase name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Dev => "dev",
            Self::Testnet => "testnet",
            Self::Mainnet => "mainnet",
        }
    }
}

impl std::fmt::Display for Network {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Network {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|n| n.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::UnknownNetwork(s.to_string()))
    }
}
