//! Digest derivation: base64 payload → raw bytes → SHA-256 → lowercase hex.
//!
//! The server only ever sees hex digests; payload contents never leave the
//! caller's process.

use std::fmt;
use std::str::FromStr;

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine;
use serde::Serialize;
use sha2::{Digest as _, Sha256};

use crate::error::ClientError;

/// Length of a hex-encoded SHA-256 digest.
pub const DIGEST_HEX_LEN: usize = 64;

/// Standard alphabet, padding optional, non-canonical trailing bits allowed.
/// Input reaches it only after [`clean_payload`].
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::Indifferent)
        .with_decode_allow_trailing_bits(true),
);

// ==============================================================================
// Digest
// ==============================================================================

/// A SHA-256 digest as a 64-character lowercase hex string.
///
/// Serializes as a bare JSON string, which is the form the timestamp and
/// verify endpoints expect.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Digest(String);

impl Digest {
    /// Hash `bytes` with SHA-256.
    pub fn of(bytes: &[u8]) -> Self {
        Self(hex::encode(Sha256::digest(bytes)))
    }

    /// Parse an existing hex digest. Uppercase hex is accepted and lowercased.
    pub fn from_hex(hex_digest: &str) -> Result<Self, ClientError> {
        if hex_digest.len() != DIGEST_HEX_LEN {
            return Err(ClientError::InvalidArgument(format!(
                "digest must be {DIGEST_HEX_LEN} hex characters, got {}",
                hex_digest.len()
            )));
        }
        if !hex_digest.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ClientError::InvalidArgument(format!(
                "digest `{hex_digest}` contains non-hex characters"
            )));
        }
        Ok(Self(hex_digest.to_ascii_lowercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Digest {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl AsRef<str> for Digest {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Digest> for String {
    fn from(digest: Digest) -> Self {
        digest.0
    }
}

// ==============================================================================
// Codec
// ==============================================================================

/// Reduce a payload to canonical standard-alphabet base64, decoding the way
/// Node's `Buffer.from(payload, "base64")` does: the URL-safe `-`/`_` map to
/// `+`/`/`, anything outside the alphabet (whitespace, line breaks) is
/// skipped, input stops at the first `=`, and a lone trailing symbol that
/// cannot form a byte is dropped.
fn clean_payload(input: &str) -> String {
    let mut cleaned = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '=' => break,
            '-' => cleaned.push('+'),
            '_' => cleaned.push('/'),
            c if c.is_ascii_alphanumeric() || c == '+' || c == '/' => cleaned.push(c),
            _ => {}
        }
    }
    if cleaned.len() % 4 == 1 {
        cleaned.pop();
    }
    cleaned
}

/// Decode a base64 payload leniently; every string decodes to some byte
/// sequence. An empty payload decodes to an empty byte vector.
pub fn decode_base64_to_bytes(input: &str) -> Result<Vec<u8>, ClientError> {
    PAYLOAD_ENGINE
        .decode(clean_payload(input))
        .map_err(|e| ClientError::InvalidArgument(format!("invalid base64 payload: {e}")))
}

pub fn bytes_to_digest(bytes: &[u8]) -> Digest {
    Digest::of(bytes)
}

/// SHA-256 of the bytes a base64 payload decodes to.
pub fn base64_to_digest(payload: &str) -> Result<Digest, ClientError> {
    let bytes = decode_base64_to_bytes(payload)?;
    Ok(bytes_to_digest(&bytes))
}

pub fn base64_payloads_to_digests<S: AsRef<str>>(
    payloads: &[S],
) -> Result<Vec<Digest>, ClientError> {
    payloads
        .iter()
        .map(|payload| base64_to_digest(payload.as_ref()))
        .collect()
}
