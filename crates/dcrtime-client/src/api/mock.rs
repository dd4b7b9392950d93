use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::digest::Digest;
use crate::error::ClientError;
use crate::network::ProtocolVersion;
use crate::types::{
    DigestEntry, LastAnchorResponse, LastDigestsResponse, ResultCode, StatusResponse,
    TimestampResponse, VerifyResponse, VersionsResponse,
};

use super::TimestampApi;

/// An in-memory dcrtime server for testing. Digests timestamped through it
/// are remembered, so a later `verify` finds them. Result codes follow the
/// configured protocol version.
pub struct MockTimestampApi {
    version: ProtocolVersion,
    servertimestamp: i64,
    anchored: Mutex<HashMap<String, i64>>,
    submitted: Mutex<Vec<String>>,
}

impl MockTimestampApi {
    pub fn builder() -> MockTimestampApiBuilder {
        MockTimestampApiBuilder {
            version: ProtocolVersion::V2,
            servertimestamp: 1_600_000_000,
            anchored: HashMap::new(),
        }
    }

    /// Digests received by `timestamp`, oldest first.
    pub fn submitted(&self) -> Vec<String> {
        self.submitted.lock().expect("mock lock poisoned").clone()
    }

    fn codes(&self) -> Codes {
        match self.version {
            ProtocolVersion::V1 => Codes {
                submitted: 0,
                exists: 1,
                verified: 0,
                not_anchored: 2,
            },
            ProtocolVersion::V2 => Codes {
                submitted: 1,
                exists: 2,
                verified: 1,
                not_anchored: 3,
            },
        }
    }
}

struct Codes {
    submitted: i64,
    exists: i64,
    verified: i64,
    not_anchored: i64,
}

pub struct MockTimestampApiBuilder {
    version: ProtocolVersion,
    servertimestamp: i64,
    anchored: HashMap<String, i64>,
}

impl MockTimestampApiBuilder {
    pub fn with_version(mut self, version: ProtocolVersion) -> Self {
        self.version = version;
        self
    }

    pub fn with_anchored(mut self, digest: &Digest, servertimestamp: i64) -> Self {
        self.anchored.insert(digest.to_string(), servertimestamp);
        self
    }

    pub fn build(self) -> MockTimestampApi {
        MockTimestampApi {
            version: self.version,
            servertimestamp: self.servertimestamp,
            anchored: Mutex::new(self.anchored),
            submitted: Mutex::new(Vec::new()),
        }
    }
}

#[async_trait]
impl TimestampApi for MockTimestampApi {
    async fn timestamp(
        &self,
        digests: &[Digest],
        id: Option<&str>,
    ) -> Result<TimestampResponse, ClientError> {
        let codes = self.codes();
        let mut anchored = self.anchored.lock().expect("mock lock poisoned");
        let mut submitted = self.submitted.lock().expect("mock lock poisoned");

        let entries = digests
            .iter()
            .map(|digest| {
                let key = digest.to_string();
                submitted.push(key.clone());
                let result = if anchored.contains_key(&key) {
                    codes.exists
                } else {
                    anchored.insert(key.clone(), self.servertimestamp);
                    codes.submitted
                };
                DigestEntry {
                    digest: key,
                    result: ResultCode(result),
                    servertimestamp: None,
                    chaininformation: None,
                }
            })
            .collect();

        Ok(TimestampResponse {
            id: id.map(str::to_owned),
            servertimestamp: Some(self.servertimestamp),
            digests: entries,
            extra: serde_json::Map::new(),
        })
    }

    async fn verify(
        &self,
        digests: &[Digest],
        id: Option<&str>,
    ) -> Result<VerifyResponse, ClientError> {
        let codes = self.codes();
        let anchored = self.anchored.lock().expect("mock lock poisoned");
        let entries = digests
            .iter()
            .map(|digest| {
                let key = digest.to_string();
                let ts = anchored.get(&key).copied();
                DigestEntry {
                    digest: key,
                    result: ResultCode(if ts.is_some() {
                        codes.verified
                    } else {
                        codes.not_anchored
                    }),
                    servertimestamp: ts,
                    chaininformation: None,
                }
            })
            .collect();

        Ok(VerifyResponse {
            id: id.map(str::to_owned),
            digests: entries,
            extra: serde_json::Map::new(),
        })
    }

    async fn status(&self, id: Option<&str>) -> Result<StatusResponse, ClientError> {
        Ok(StatusResponse {
            id: id.map(str::to_owned),
            extra: serde_json::Map::new(),
        })
    }

    async fn versions(&self) -> Result<VersionsResponse, ClientError> {
        Ok(VersionsResponse {
            versions: vec![1, 2],
            routeprefixes: vec!["/v1".to_owned(), "/v2".to_owned()],
            extra: serde_json::Map::new(),
        })
    }

    async fn last_anchor(&self) -> Result<LastAnchorResponse, ClientError> {
        Ok(LastAnchorResponse {
            chaintimestamp: None,
            transaction: String::new(),
            blockhash: String::new(),
            blockheight: 0,
            extra: serde_json::Map::new(),
        })
    }

    async fn last_digests(&self, n: u32) -> Result<LastDigestsResponse, ClientError> {
        let submitted = self.submitted();
        let digests = submitted
            .iter()
            .rev()
            .take(n as usize)
            .map(|digest| DigestEntry {
                digest: digest.clone(),
                result: ResultCode(self.codes().verified),
                servertimestamp: Some(self.servertimestamp),
                chaininformation: None,
            })
            .collect();
        Ok(LastDigestsResponse {
            digests,
            extra: serde_json::Map::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digest::base64_to_digest;
    use crate::types::{Operation, Outcome};

    fn payloads(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| (*s).to_owned()).collect()
    }

    #[tokio::test]
    async fn timestamp_from_base64_submits_payload_digests() {
        let api = MockTimestampApi::builder().build();
        let resp = api
            .timestamp_from_base64(&payloads(&["dGVzdA==", ""]), Some("batch-1"))
            .await
            .expect("timestamp must succeed");

        assert_eq!(resp.id.as_deref(), Some("batch-1"));
        let expected = vec![
            base64_to_digest("dGVzdA==").expect("must hash").to_string(),
            base64_to_digest("").expect("must hash").to_string(),
        ];
        assert_eq!(api.submitted(), expected);
        for entry in &resp.digests {
            assert_eq!(
                entry.result.outcome(ProtocolVersion::V2, Operation::Timestamp),
                Outcome::Submitted
            );
        }
    }

    #[tokio::test]
    async fn wrapped_and_url_safe_payloads_hash_like_canonical_ones() {
        let api = MockTimestampApi::builder().build();
        api.timestamp_from_base64(&payloads(&["dGVz\ndA==", "-_-_"]), None)
            .await
            .expect("lenient payloads must be accepted");

        let expected = vec![
            Digest::of(b"test").to_string(),
            Digest::of(&[0xfb, 0xff, 0xbf]).to_string(),
        ];
        assert_eq!(api.submitted(), expected);
    }

    #[tokio::test]
    async fn verify_from_base64_reflects_prior_timestamp() {
        let api = MockTimestampApi::builder()
            .with_version(ProtocolVersion::V1)
            .build();
        let known = payloads(&["dGVzdA=="]);
        api.timestamp_from_base64(&known, None)
            .await
            .expect("timestamp must succeed");

        let resp = api
            .verify_from_base64(&payloads(&["dGVzdA==", "dW5rbm93bg=="]), None)
            .await
            .expect("verify must succeed");
        let outcomes: Vec<_> = resp
            .digests
            .iter()
            .map(|e| e.result.outcome(ProtocolVersion::V1, Operation::Verify))
            .collect();
        assert_eq!(outcomes, vec![Outcome::Verified, Outcome::NotAnchored]);
    }

    #[tokio::test]
    async fn repeated_timestamp_reports_existing_digest() {
        let digest = Digest::of(b"already there");
        let api = MockTimestampApi::builder()
            .with_anchored(&digest, 1)
            .build();
        let resp = api
            .timestamp(std::slice::from_ref(&digest), None)
            .await
            .expect("timestamp must succeed");
        assert_eq!(
            resp.digests[0]
                .result
                .outcome(ProtocolVersion::V2, Operation::Timestamp),
            Outcome::AlreadyExists
        );
    }

    #[tokio::test]
    async fn last_digests_returns_newest_first() {
        let api = MockTimestampApi::builder().build();
        let a = Digest::of(b"a");
        let b = Digest::of(b"b");
        api.timestamp(&[a.clone(), b.clone()], None)
            .await
            .expect("timestamp must succeed");

        let last = api.last_digests(1).await.expect("query must succeed");
        assert_eq!(last.digests.len(), 1);
        assert_eq!(last.digests[0].digest, b.to_string());
    }
}
