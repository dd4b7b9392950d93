use async_trait::async_trait;
use reqwest::header;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ClientConfig;
use crate::digest::{base64_to_digest, Digest};
use crate::error::{ClientError, ProtocolError};
use crate::network::{endpoint_url, Network, ProtocolVersion};
use crate::normalize::{is_error_reply, merge_results_and_digests, strip_timestamps_field};
use crate::types::{
    DigestsRequest, LastAnchorResponse, LastDigestsRequest, LastDigestsResponse, StatusRequest,
    StatusResponse, TimestampResponse, VerifyResponse, VersionsResponse,
};

use super::TimestampApi;

// ==============================================================================
// DcrtimeClient — JSON-over-HTTPS client for dcrtime servers
// ==============================================================================

/// dcrtime client bound to one network and one protocol version.
///
/// The base URL is read when each request is built. Switching networks needs
/// `&mut self`, so it cannot interleave with requests in flight on the same
/// client; use one client per network for concurrent work.
///
/// No timeout or retry policy is applied here. Pass a configured
/// `reqwest::Client` to [`DcrtimeClient::with_http_client`] for that.
#[derive(Debug, Clone)]
pub struct DcrtimeClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl DcrtimeClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;
        Ok(Self::with_http_client(config, client))
    }

    pub fn with_http_client(config: ClientConfig, client: reqwest::Client) -> Self {
        Self { client, config }
    }

    /// Point the client at another network, using this client's protocol
    /// version to interpret `selector` (see [`Network::select`]).
    pub fn set_network(&mut self, selector: &str) {
        self.config.network = Network::select(selector, self.config.version);
        debug!(
            dcrtime.version = %self.config.version,
            network = %self.config.network,
            "network selected"
        );
    }

    pub fn network(&self) -> &Network {
        &self.config.network
    }

    pub fn version(&self) -> ProtocolVersion {
        self.config.version
    }

    pub fn base_url(&self) -> &str {
        self.config.base_url()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// SHA-256 of a base64 payload, as the server expects it.
    pub fn sha256_from_base64(payload: &str) -> Result<Digest, ClientError> {
        base64_to_digest(payload)
    }

    fn url(&self, path: &str) -> String {
        endpoint_url(self.config.base_url(), path)
    }

    async fn post_json<B>(&self, path: &str, body: &B) -> Result<serde_json::Value, ClientError>
    where
        B: Serialize + Sync + ?Sized,
    {
        let url = self.url(path);
        debug!(dcrtime.version = %self.config.version, dcrtime.path = path, "POST request");
        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .json(body)
            .send()
            .await?;
        read_reply(path, response).await
    }

    async fn get_json(&self, path: &str) -> Result<serde_json::Value, ClientError> {
        let url = self.url(path);
        debug!(dcrtime.version = %self.config.version, dcrtime.path = path, "GET request");
        let response = self
            .client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;
        read_reply(path, response).await
    }
}

#[async_trait]
impl TimestampApi for DcrtimeClient {
    async fn timestamp(
        &self,
        digests: &[Digest],
        id: Option<&str>,
    ) -> Result<TimestampResponse, ClientError> {
        debug!(dcrtime.digests = digests.len(), "timestamp");
        let version = self.config.version;
        let raw = self
            .post_json(version.timestamp_path(), &DigestsRequest { id, digests })
            .await?;
        into_typed(merge_results_and_digests(raw, version), "timestamp")
    }

    async fn verify(
        &self,
        digests: &[Digest],
        id: Option<&str>,
    ) -> Result<VerifyResponse, ClientError> {
        debug!(dcrtime.digests = digests.len(), "verify");
        let raw = self
            .post_json(
                self.config.version.verify_path(),
                &DigestsRequest { id, digests },
            )
            .await?;
        into_typed(strip_timestamps_field(raw), "verify")
    }

    async fn status(&self, id: Option<&str>) -> Result<StatusResponse, ClientError> {
        let raw = self
            .post_json(self.config.version.status_path(), &StatusRequest { id })
            .await?;
        into_typed(raw, "status")
    }

    async fn versions(&self) -> Result<VersionsResponse, ClientError> {
        let raw = self.get_json(self.config.version.versions_path()).await?;
        into_typed(raw, "version")
    }

    async fn last_anchor(&self) -> Result<LastAnchorResponse, ClientError> {
        let version = self.config.version;
        let path = version.last_anchor_path().ok_or(ClientError::Unsupported {
            operation: "last anchor",
            version,
        })?;
        let raw = self.get_json(path).await?;
        into_typed(raw, "last anchor")
    }

    async fn last_digests(&self, n: u32) -> Result<LastDigestsResponse, ClientError> {
        let version = self.config.version;
        let path = version.last_digests_path().ok_or(ClientError::Unsupported {
            operation: "last digests",
            version,
        })?;
        let raw = self
            .post_json(path, &LastDigestsRequest { number: n })
            .await?;
        into_typed(raw, "last digests")
    }
}

// ==============================================================================
// Reply Decoding
// ==============================================================================

/// Read a reply body as JSON. The HTTP status is not checked: the server
/// reports failures in-band as `{"error": ...}`.
async fn read_reply(
    path: &str,
    response: reqwest::Response,
) -> Result<serde_json::Value, ClientError> {
    let status = response.status();
    let body = response.text().await?;
    debug!(dcrtime.path = path, %status, body_len = body.len(), "response");
    trace!(dcrtime.path = path, body = %body, "response body");

    serde_json::from_str(&body).map_err(|e| {
        ProtocolError::InvalidResponse(format!("{path} returned non-JSON body ({status}): {e}"))
            .into()
    })
}

/// Surface in-band server errors, then decode the expected reply shape.
fn into_typed<T: DeserializeOwned>(
    reply: serde_json::Value,
    what: &str,
) -> Result<T, ClientError> {
    if is_error_reply(&reply) {
        warn!(operation = what, error = %reply["error"], "server returned an error");
        return Err(ClientError::Server(reply));
    }
    serde_json::from_value(reply).map_err(|e| {
        ProtocolError::InvalidResponse(format!("unexpected {what} reply shape: {e}")).into()
    })
}
