//! Content service configuration.
//!
//! The base URL depends on the deployment network. Override it via
//! environment variables or explicit construction for staging and tests.

use std::time::Duration;

use ssid_core::{Network, ValidationError};
use url::Url;

/// Configuration for the off-chain content service.
#[derive(Debug, Clone)]
pub struct ContentServiceConfig {
    /// Base URL; endpoints are appended as path segments.
    pub base_url: Url,
    /// Per-request timeout. `None` leaves deadlines to the caller.
    pub timeout: Option<Duration>,
}

impl ContentServiceConfig {
    /// Configuration for a known network.
    pub fn for_network(network: Network) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("network", network.content_base_url())?,
            timeout: None,
        })
    }

    /// Configuration pointing at an explicit base URL.
    pub fn with_base_url(base_url: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: parse_url("base_url", base_url)?,
            timeout: None,
        })
    }

    /// Load configuration from environment variables.
    ///
    /// Variables:
    /// - `SSID_CONTENT_URL` (takes precedence when set)
    /// - `SSID_NETWORK` (default: `local`), used to derive the URL otherwise
    /// - `SSID_CONTENT_TIMEOUT_SECS` (optional)
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = match std::env::var("SSID_CONTENT_URL") {
            Ok(raw) => Self {
                base_url: parse_url("SSID_CONTENT_URL", &raw)?,
                timeout: None,
            },
            Err(_) => {
                let network = std::env::var("SSID_NETWORK")
                    .unwrap_or_else(|_| Network::Local.as_str().to_string())
                    .parse::<Network>()?;
                Self::for_network(network)?
            }
        };
        config.timeout = std::env::var("SSID_CONTENT_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs);
        Ok(config)
    }

    /// Join an endpoint name onto the base URL.
    pub(crate) fn endpoint(&self, name: &str) -> String {
        format!("{}/{name}", self.base_url.as_str().trim_end_matches('/'))
    }
}

fn parse_url(source: &str, raw: &str) -> Result<Url, ConfigError> {
    Url::parse(raw).map_err(|e| ConfigError::InvalidUrl(source.to_string(), e.to_string()))
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid URL for {0}: {1}")]
    InvalidUrl(String, String),
    #[error(transparent)]
    InvalidNetwork(#[from] ValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_urls() {
        let cfg = ContentServiceConfig::for_network(Network::Mainnet).unwrap();
        assert_eq!(
            cfg.endpoint("handleGenericVC"),
            "https://ssid.metabit.exchange/prod/handleGenericVC"
        );
        assert!(cfg.timeout.is_none());
    }

    #[test]
    fn trailing_slash_is_not_doubled() {
        let cfg = ContentServiceConfig::with_base_url("http://127.0.0.1:9000/").unwrap();
        assert_eq!(cfg.endpoint("handleGenericVC"), "http://127.0.0.1:9000/handleGenericVC");
    }

    #[test]
    fn rejects_invalid_url() {
        assert!(matches!(
            ContentServiceConfig::with_base_url("not a url"),
            Err(ConfigError::InvalidUrl(..))
        ));
    }
}
