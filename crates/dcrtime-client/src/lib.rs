//! Client library for the dcrtime timestamping service.
//!
//! Submits SHA-256 digests to a dcrtime server for anchoring into the Decred
//! blockchain and verifies previously submitted digests. Both the v1 and v2
//! server protocols are supported through a single client parameterized by
//! [`ProtocolVersion`].

pub mod api;
pub mod config;
pub mod digest;
pub mod error;
pub mod network;
pub mod normalize;
pub mod types;

pub use api::{DcrtimeClient, TimestampApi, DEFAULT_LAST_DIGESTS};
pub use config::ClientConfig;
pub use digest::Digest;
pub use error::{ClientError, ProtocolError};
pub use network::{Network, ProtocolVersion};
pub use types::{DigestEntry, Operation, Outcome, ResultCode};
