//! Error types for the server.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use whatsflow_client::ClientError;

/// Server error type.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Bad request.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Proxying a chat turn to the planner failed.
    #[error("Chat failed: {0}")]
    ChatProxy(#[source] ClientError),

    /// A stage of the flow generation chain failed.
    #[error("Flow generation failed at {stage}: {source}")]
    FlowGeneration {
        /// Which call failed (plan, get_flows, create_flow, preview).
        stage: &'static str,
        #[source]
        source: ClientError,
    },

    /// Publishing a flow failed.
    #[error("Publish failed: {0}")]
    Publish(#[source] ClientError),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, ServerError>;

/// Error response body.
///
/// The wire contract for every failure: a summary under `error`, the
/// underlying cause under `details` when one exists.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Human-readable error summary.
    pub error: String,
    /// Underlying cause.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, error, details) = match &self {
            ServerError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, message.clone(), None)
            }
            // Chat proxying reports the upstream message directly, the way
            // the upstream handed it over.
            ServerError::ChatProxy(source) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                source.to_string(),
                None,
            ),
            ServerError::FlowGeneration { stage, source } => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to generate flow".to_string(),
                Some(format!("{}: {}", stage, source)),
            ),
            ServerError::Publish(source) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to publish flow".to_string(),
                Some(source.to_string()),
            ),
            ServerError::Internal(message) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
                Some(message.clone()),
            ),
        };

        match &self {
            ServerError::BadRequest(_) => {
                tracing::warn!(status = %status, error = %error, "Client error");
            }
            ServerError::FlowGeneration { stage, source } => {
                tracing::error!(status = %status, stage, error = %source, "Flow generation failed");
            }
            _ => {
                tracing::error!(status = %status, error = %self, "Server error");
            }
        }

        let body = ErrorResponse { error, details };

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn body_of(error: ServerError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_bad_request_body_has_no_details() {
        let (status, body) =
            body_of(ServerError::BadRequest("Thread ID is required".into())).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Thread ID is required");
        assert!(body.get("details").is_none());
    }

    #[tokio::test]
    async fn test_flow_generation_body_names_the_stage() {
        let source = ClientError::UpstreamStatus {
            service: "planner".into(),
            status: 502,
            body: "worker crashed".into(),
        };
        let (status, body) = body_of(ServerError::FlowGeneration {
            stage: "get_flows",
            source,
        })
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate flow");
        let details = body["details"].as_str().unwrap();
        assert!(details.starts_with("get_flows:"));
        assert!(details.contains("502"));
    }

    #[tokio::test]
    async fn test_chat_proxy_reports_upstream_message() {
        let source = ClientError::UpstreamStatus {
            service: "planner".into(),
            status: 500,
            body: "model overloaded".into(),
        };
        let (status, body) = body_of(ServerError::ChatProxy(source)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().contains("model overloaded"));
    }
}
