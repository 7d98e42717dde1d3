//! Error type shared by every client in this crate.

use thiserror::Error;

/// Result type for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;

/// Failures talking to the WhatsFlow server or its upstreams.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request never completed (connect, timeout, body read).
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// A path could not be resolved against the base URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A body failed to encode or decode.
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// An upstream service (planner or Graph API) answered non-2xx.
    #[error("{service} returned HTTP {status}: {body}")]
    UpstreamStatus {
        service: String,
        status: u16,
        /// Raw response body, or the extracted message when one parses.
        body: String,
    },

    /// The WhatsFlow server itself reported a failure.
    #[error("server error ({status}): {message}")]
    Api {
        status: u16,
        message: String,
        /// Underlying cause, when the server included one.
        details: Option<String>,
    },

    /// The client was built with unusable settings.
    #[error("client misconfigured: {0}")]
    Config(String),
}

impl ClientError {
    /// True when the remote side said 404.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            ClientError::Api { status: 404, .. } | ClientError::UpstreamStatus { status: 404, .. }
        )
    }

    /// True when the failure sits on the remote side (5xx), as opposed to
    /// a bad request from here.
    pub fn is_server_error(&self) -> bool {
        matches!(self, ClientError::Api { status, .. } if *status >= 500)
            || matches!(self, ClientError::UpstreamStatus { status, .. } if *status >= 500)
    }
}

/// Error body produced by the WhatsFlow server.
#[derive(Debug, serde::Deserialize)]
pub(crate) struct ErrorResponse {
    pub error: String,
    pub details: Option<String>,
}
