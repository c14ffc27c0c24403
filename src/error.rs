//! Error handling for Resonance
//!
//! Load-pipeline failures (network, decode) are caught at the `load` boundary
//! and surface as `PreloadState::Error`; only the pipeline stages themselves
//! return these errors. Invalid transport transitions are warnings, not
//! errors (see [`crate::sound::Warning`]).

use thiserror::Error;

/// Result type alias for Resonance operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for Resonance operations
#[derive(Error, Debug)]
pub enum Error {
    /// Non-success HTTP status or a transport-level failure
    #[error("network request failed: {reason}")]
    Network {
        reason: String,
        /// HTTP status, when the server answered at all
        status: Option<u16>,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// Bytes were fetched but are not a supported audio format
    #[error("failed to decode audio: {reason}")]
    Decode { reason: String },

    /// Base or relative path did not resolve to an absolute URL
    #[error("invalid URL: {input}")]
    InvalidUrl {
        input: String,
        #[source]
        source: Option<url::ParseError>,
    },

    /// A playback graph was started a second time; source nodes are single-use
    #[error("playback graph already consumed")]
    GraphConsumed,

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Build a `Network` error from an HTTP status line
    pub fn http_status(status: u16) -> Self {
        Error::Network {
            reason: format!("request failed with status: {}", status),
            status: Some(status),
            source: None,
        }
    }

    /// Build a `Network` error from a transport failure
    pub fn transport(source: reqwest::Error) -> Self {
        Error::Network {
            reason: source.to_string(),
            status: None,
            source: Some(source),
        }
    }

    /// Get the error code for this error type
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Network { .. } => "NETWORK_ERROR",
            Error::Decode { .. } => "DECODE_ERROR",
            Error::InvalidUrl { .. } => "INVALID_URL",
            Error::GraphConsumed => "GRAPH_CONSUMED",
            Error::Io(_) => "IO_ERROR",
        }
    }

    /// Check if this error is recoverable by retrying the operation
    ///
    /// There is no automatic retry; callers observe `PreloadState::Error` and
    /// re-invoke `load` themselves.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Error::Network { .. } => true,
            Error::Decode { .. } => false,
            Error::InvalidUrl { .. } => false,
            Error::GraphConsumed => false,
            Error::Io(_) => true,
        }
    }
}
