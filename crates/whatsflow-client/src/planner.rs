//! Planner backend client.
//!
//! The planner is the external AI service that turns a chat conversation into
//! a drafted flow. It exposes three JSON-over-POST endpoints: `/chat`,
//! `/plan`, and `/get_flows`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::{Value, json};

use crate::error::{ClientError, Result};
use crate::types::{FlowBundle, PlanResponse};
use whatsflow_types::ThreadId;

/// Default planner base URL (matches a locally-run backend).
const DEFAULT_BASE_URL: &str = "http://0.0.0.0:5000";

/// Default timeout for planner requests. Flow drafting is slow.
const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Query string sent with plan and flow-fetch requests.
pub const MAKE_FLOW_QUERY: &str = "make flow";

/// Abstraction over the planner backend.
///
/// The server depends on this trait so tests can substitute a scripted
/// planner without a network.
#[async_trait]
pub trait Planner: Send + Sync {
    /// Send one conversational turn. The upstream JSON is returned unchanged.
    async fn chat(&self, thread_id: &ThreadId, user_input: &str) -> Result<Value>;

    /// Ask the planner for the current flow plan of a thread.
    async fn plan(&self, thread_id: &ThreadId, query: &str) -> Result<PlanResponse>;

    /// Fetch the drafted flow documents for a thread.
    async fn get_flows(&self, thread_id: &ThreadId, query: &str) -> Result<FlowBundle>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Configuration for the planner client.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Base URL of the planner backend.
    pub base_url: String,

    /// Request timeout.
    pub timeout: Duration,
}

impl PlannerConfig {
    /// Create a config pointing at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Planner Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the planner backend.
///
/// Requests are simple request/response with no retry; a failed call
/// surfaces immediately as an error.
#[derive(Debug, Clone)]
pub struct PlannerClient {
    client: Client,
    config: PlannerConfig,
}

impl PlannerClient {
    /// Create a new planner client.
    pub fn new(config: PlannerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build an endpoint URL.
    fn endpoint_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    /// POST a JSON body and decode the JSON response.
    async fn post_json<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        body: &Value,
    ) -> Result<T> {
        let response = self
            .client
            .post(self.endpoint_url(endpoint))
            .json(body)
            .send()
            .await?;
        Self::handle_response(response).await
    }

    /// Handle a planner response.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Turn a failed response into an error.
    async fn handle_error_response(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        ClientError::UpstreamStatus {
            service: "planner".to_string(),
            status,
            body,
        }
    }
}

#[async_trait]
impl Planner for PlannerClient {
    async fn chat(&self, thread_id: &ThreadId, user_input: &str) -> Result<Value> {
        tracing::debug!(thread_id = %thread_id, "Sending chat turn to planner");
        self.post_json(
            "chat",
            &json!({ "thread_id": thread_id, "user_input": user_input }),
        )
        .await
    }

    async fn plan(&self, thread_id: &ThreadId, query: &str) -> Result<PlanResponse> {
        tracing::debug!(thread_id = %thread_id, "Requesting flow plan");
        self.post_json("plan", &json!({ "thread_id": thread_id, "query": query }))
            .await
    }

    async fn get_flows(&self, thread_id: &ThreadId, query: &str) -> Result<FlowBundle> {
        tracing::debug!(thread_id = %thread_id, "Fetching drafted flows");
        self.post_json(
            "get_flows",
            &json!({ "thread_id": thread_id, "query": query }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_url_handles_trailing_slash() {
        let client = PlannerClient::new(PlannerConfig::new("http://localhost:5000/")).unwrap();
        assert_eq!(client.endpoint_url("chat"), "http://localhost:5000/chat");

        let client = PlannerClient::new(PlannerConfig::new("http://localhost:5000")).unwrap();
        assert_eq!(
            client.endpoint_url("get_flows"),
            "http://localhost:5000/get_flows"
        );
    }

    #[test]
    fn test_default_config() {
        let config = PlannerConfig::default();
        assert_eq!(config.base_url, "http://0.0.0.0:5000");
        assert_eq!(config.timeout, Duration::from_secs(120));
    }
}
