//! Request and response model for the dcrtime wire protocol.
//!
//! Response types mirror the server's field names (`servertimestamp`,
//! `chaininformation`, ...) so they deserialize straight from normalized
//! replies. Top-level fields the client does not model are kept in `extra`.

use serde::{Deserialize, Serialize};

use crate::digest::Digest;
use crate::network::ProtocolVersion;

// ==============================================================================
// Result Codes
// ==============================================================================

/// Per-digest outcome code returned by timestamp and verify calls.
///
/// The client never validates the value; its meaning depends on the protocol
/// version and operation, see [`ResultCode::outcome`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ResultCode(pub i64);

impl From<i64> for ResultCode {
    fn from(code: i64) -> Self {
        Self(code)
    }
}

impl From<ResultCode> for i64 {
    fn from(code: ResultCode) -> Self {
        code.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Timestamp,
    Verify,
}

/// Interpreted meaning of a [`ResultCode`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// Rejected as malformed (v2 only).
    Invalid,
    /// Digest was new to the server and has been accepted for anchoring.
    Submitted,
    /// Digest was already known; the timestamp request had no effect.
    AlreadyExists,
    /// Digest was found on the server.
    Verified,
    /// Digest is unknown to the server and therefore not anchored.
    NotAnchored,
    /// Code outside the table for this version and operation.
    Unknown(i64),
}

impl ResultCode {
    pub fn outcome(self, version: ProtocolVersion, operation: Operation) -> Outcome {
        use Operation::{Timestamp, Verify};
        use ProtocolVersion::{V1, V2};

        match (version, operation, self.0) {
            (V1, Timestamp, 0) => Outcome::Submitted,
            (V1, Timestamp, 1) => Outcome::AlreadyExists,
            (V1, Verify, 0) => Outcome::Verified,
            (V1, Verify, 2) => Outcome::NotAnchored,
            (V2, _, 0) => Outcome::Invalid,
            (V2, Timestamp, 1) => Outcome::Submitted,
            (V2, Timestamp, 2) => Outcome::AlreadyExists,
            (V2, Verify, 1) => Outcome::Verified,
            (V2, Verify, 3) => Outcome::NotAnchored,
            (_, _, code) => Outcome::Unknown(code),
        }
    }

    /// Whether the code belongs to the table for this version and operation.
    pub fn is_known(self, version: ProtocolVersion, operation: Operation) -> bool {
        !matches!(self.outcome(version, operation), Outcome::Unknown(_))
    }
}

// ==============================================================================
// Requests
// ==============================================================================

/// Body of timestamp and verify calls. `id` is omitted when absent.
#[derive(Debug, Clone, Serialize)]
pub struct DigestsRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
    pub digests: &'a [Digest],
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<&'a str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LastDigestsRequest {
    pub number: u32,
}

// ==============================================================================
// Responses
// ==============================================================================

/// Anchoring proof attached to verified digests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainInformation {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaintimestamp: Option<i64>,
    #[serde(default)]
    pub transaction: String,
    #[serde(default)]
    pub merkleroot: String,
    /// Kept opaque; the client does not walk merkle paths.
    #[serde(default)]
    pub merklepath: serde_json::Value,
}

/// One digest and its outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DigestEntry {
    pub digest: String,
    pub result: ResultCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servertimestamp: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaininformation: Option<ChainInformation>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimestampResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Top-level on v2 replies; v1 replies carry it on each entry instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servertimestamp: Option<i64>,
    #[serde(default)]
    pub digests: Vec<DigestEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerifyResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub digests: Vec<DigestEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionsResponse {
    #[serde(default)]
    pub versions: Vec<u32>,
    #[serde(default)]
    pub routeprefixes: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Most recent anchor the server broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastAnchorResponse {
    /// Set once the anchoring block has more than six confirmations.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chaintimestamp: Option<i64>,
    pub transaction: String,
    pub blockhash: String,
    pub blockheight: u64,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastDigestsResponse {
    #[serde(default)]
    pub digests: Vec<DigestEntry>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
