//! dcrtime API abstraction layer.
//!
//! Defines the [`TimestampApi`] trait and provides an HTTP implementation
//! ([`DcrtimeClient`]) plus a test mock (`mock::MockTimestampApi`).

mod http_client;
#[cfg(test)]
pub mod mock;

pub use http_client::DcrtimeClient;

use async_trait::async_trait;

use crate::digest::{base64_payloads_to_digests, Digest};
use crate::error::ClientError;
use crate::types::{
    LastAnchorResponse, LastDigestsResponse, StatusResponse, TimestampResponse, VerifyResponse,
    VersionsResponse,
};

/// Number of digests `last_digests` asks for when the caller has no
/// preference.
pub const DEFAULT_LAST_DIGESTS: u32 = 10;

/// Operations a dcrtime server offers.
///
/// `id` is an optional caller-chosen correlation string echoed back by the
/// server. Every operation issues at most one request.
#[async_trait]
pub trait TimestampApi: Send + Sync {
    /// Submit digests for anchoring.
    async fn timestamp(
        &self,
        digests: &[Digest],
        id: Option<&str>,
    ) -> Result<TimestampResponse, ClientError>;

    /// Hash base64 payloads locally, then submit their digests.
    async fn timestamp_from_base64(
        &self,
        payloads: &[String],
        id: Option<&str>,
    ) -> Result<TimestampResponse, ClientError> {
        let digests = base64_payloads_to_digests(payloads)?;
        self.timestamp(&digests, id).await
    }

    /// Ask whether digests are known and anchored.
    async fn verify(
        &self,
        digests: &[Digest],
        id: Option<&str>,
    ) -> Result<VerifyResponse, ClientError>;

    async fn verify_from_base64(
        &self,
        payloads: &[String],
        id: Option<&str>,
    ) -> Result<VerifyResponse, ClientError> {
        let digests = base64_payloads_to_digests(payloads)?;
        self.verify(&digests, id).await
    }

    /// Liveness check; the server echoes `id`.
    async fn status(&self, id: Option<&str>) -> Result<StatusResponse, ClientError>;

    /// Protocol versions and route prefixes the server supports.
    async fn versions(&self) -> Result<VersionsResponse, ClientError>;

    async fn last_anchor(&self) -> Result<LastAnchorResponse, ClientError>;

    /// The `n` most recently submitted digests.
    async fn last_digests(&self, n: u32) -> Result<LastDigestsResponse, ClientError>;
}
