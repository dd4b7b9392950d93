//! Network selection and per-version endpoint routing.
//!
//! v1 and v2 servers are mutually incompatible: they live under different
//! route prefixes, use different paths for the batch operations, and assign
//! different meanings to the same result codes. [`ProtocolVersion`] carries
//! all of that so a single client can target either.

use std::fmt;
use std::str::FromStr;

use crate::error::ClientError;

pub const MAINNET_URL: &str = "https://time.decred.org:49152";
pub const TESTNET_URL: &str = "https://time-testnet.decred.org:59152";

// ==============================================================================
// Network
// ==============================================================================

/// A dcrtime deployment: one of the public networks or a custom server.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Network {
    #[default]
    Mainnet,
    Testnet,
    /// Base URL used verbatim, without validation.
    Custom(String),
}

impl Network {
    /// Resolve a network selector the way each protocol generation does.
    ///
    /// v2 recognizes `"testnet"` and `"mainnet"` and treats any other string
    /// as a custom base URL. v1 only recognizes `"testnet"`; everything else,
    /// URLs included, selects mainnet.
    pub fn select(selector: &str, version: ProtocolVersion) -> Self {
        match (version, selector) {
            (_, "testnet") => Self::Testnet,
            (ProtocolVersion::V1, _) | (ProtocolVersion::V2, "mainnet") => Self::Mainnet,
            (ProtocolVersion::V2, custom) => Self::Custom(custom.to_owned()),
        }
    }

    pub fn base_url(&self) -> &str {
        match self {
            Self::Mainnet => MAINNET_URL,
            Self::Testnet => TESTNET_URL,
            Self::Custom(url) => url,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mainnet => write!(f, "mainnet"),
            Self::Testnet => write!(f, "testnet"),
            Self::Custom(url) => write!(f, "custom ({url})"),
        }
    }
}

// ==============================================================================
// Protocol Version
// ==============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ProtocolVersion {
    V1,
    #[default]
    V2,
}

impl ProtocolVersion {
    pub fn route_prefix(self) -> &'static str {
        match self {
            Self::V1 => "v1",
            Self::V2 => "v2",
        }
    }

    pub fn timestamp_path(self) -> &'static str {
        match self {
            Self::V1 => "v1/timestamp/",
            Self::V2 => "v2/timestamp/batch",
        }
    }

    pub fn verify_path(self) -> &'static str {
        match self {
            Self::V1 => "v1/verify/",
            Self::V2 => "v2/verify/batch",
        }
    }

    pub fn status_path(self) -> &'static str {
        match self {
            Self::V1 => "v1/status/",
            Self::V2 => "v2/status",
        }
    }

    /// Unversioned; served identically by both generations.
    pub fn versions_path(self) -> &'static str {
        "version"
    }

    /// `None` where the server generation has no such route.
    pub fn last_anchor_path(self) -> Option<&'static str> {
        match self {
            Self::V1 => None,
            Self::V2 => Some("v2/last"),
        }
    }

    pub fn last_digests_path(self) -> Option<&'static str> {
        match self {
            Self::V1 => None,
            Self::V2 => Some("v2/last-digests"),
        }
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.route_prefix())
    }
}

impl FromStr for ProtocolVersion {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "v1" | "1" => Ok(Self::V1),
            "v2" | "2" => Ok(Self::V2),
            other => Err(ClientError::InvalidArgument(format!(
                "unknown protocol version `{other}`; expected v1 or v2"
            ))),
        }
    }
}

/// Join a base URL and an endpoint path. The base is used as given.
pub(crate) fn endpoint_url(base_url: &str, path: &str) -> String {
    format!("{base_url}/{path}")
}
