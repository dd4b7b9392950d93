use crate::network::ProtocolVersion;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// The server answered with a well-formed `{"error": ...}` reply. The
    /// reply is kept verbatim.
    #[error("server error: {0}")]
    Server(serde_json::Value),

    #[error("{operation} is not available on the {version} protocol")]
    Unsupported {
        operation: &'static str,
        version: ProtocolVersion,
    },
}

/// Failures talking to the server, as opposed to errors it reports in-band.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid server response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ClientError {
    fn from(err: reqwest::Error) -> Self {
        Self::Protocol(ProtocolError::Transport(err))
    }
}
