//! Client configuration.
//!
//! Each [`DcrtimeClient`](crate::DcrtimeClient) is built from a
//! [`ClientConfig`]; there is no process-wide network setting.

use crate::error::ClientError;
use crate::network::{Network, ProtocolVersion};

/// Environment variable holding `v1` or `v2`.
pub const ENV_API_VERSION: &str = "DCRTIME_API_VERSION";
/// Environment variable holding `mainnet`, `testnet` or a server base URL.
pub const ENV_NETWORK: &str = "DCRTIME_NETWORK";

/// Network and protocol version for one client.
///
/// The fields are public on purpose. [`ClientConfig::with_network`] and
/// `DcrtimeClient::set_network` resolve selector strings with the version's
/// rules, under which v1 never picks a custom URL. Setting `network` to
/// [`Network::Custom`] directly, or calling [`ClientConfig::with_base_url`],
/// is the supported way to point a v1 client at a private or test server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClientConfig {
    pub network: Network,
    pub version: ProtocolVersion,
}

impl ClientConfig {
    /// Mainnet configuration for the given protocol version.
    pub fn new(version: ProtocolVersion) -> Self {
        Self {
            network: Network::Mainnet,
            version,
        }
    }

    /// Select the network from a selector string, resolved with the
    /// configured version's rules (see [`Network::select`]).
    pub fn with_network(mut self, selector: &str) -> Self {
        self.network = Network::select(selector, self.version);
        self
    }

    /// Use `base_url` verbatim on either protocol version.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.network = Network::Custom(base_url.into());
        self
    }

    pub fn base_url(&self) -> &str {
        self.network.base_url()
    }

    /// Build a configuration from `DCRTIME_API_VERSION` and `DCRTIME_NETWORK`.
    /// Unset variables keep the defaults (v2, mainnet).
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ClientError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let version = match lookup(ENV_API_VERSION) {
            Some(raw) => raw.parse()?,
            None => ProtocolVersion::default(),
        };
        let config = Self::new(version);
        Ok(match lookup(ENV_NETWORK) {
            Some(selector) => config.with_network(&selector),
            None => config,
        })
    }
}
