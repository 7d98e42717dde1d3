//! Client SDK for the WhatsFlow server.

use std::time::Duration;

use serde_json::{Value, json};
use url::Url;

use crate::error::{ClientError, ErrorResponse, Result};
use crate::types::{FlowGeneration, FlowPublished, HealthResponse};
use whatsflow_types::{FlowId, ThreadId};

/// Default request timeout. Flow generation chains several upstream calls,
/// so this is generous.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// WhatsFlow API client.
///
/// Typed access to the server endpoints, used by the CLI and the playground.
/// Cloning is cheap; the underlying connection pool is shared.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> whatsflow_client::Result<()> {
/// let client = whatsflow_client::WhatsflowClient::new("http://localhost:8686")?;
/// let health = client.health().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct WhatsflowClient {
    http: reqwest::Client,
    base_url: Url,
    timeout: Duration,
}

impl WhatsflowClient {
    /// Build a client for the given server.
    ///
    /// Fails when `base_url` does not parse. The URL path is normalized to
    /// end with a slash so endpoint joins keep every segment.
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        let mut base_url = Url::parse(base_url.as_ref())?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        Ok(Self {
            http: reqwest::Client::builder().build()?,
            base_url,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Replace the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// A client pointed at the default local server.
    pub fn localhost() -> Result<Self> {
        Self::new("http://127.0.0.1:8686")
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Endpoints
    // ─────────────────────────────────────────────────────────────────────────

    /// Check server health.
    pub async fn health(&self) -> Result<HealthResponse> {
        let url = self.endpoint("health")?;
        self.send(self.http.get(url)).await
    }

    /// Simple connectivity check. Returns true if the server is reachable.
    pub async fn is_healthy(&self) -> bool {
        self.health().await.is_ok()
    }

    /// Send a chat turn. The planner's JSON reply is returned unchanged.
    pub async fn chat(&self, thread_id: &ThreadId, user_input: &str) -> Result<Value> {
        let url = self.endpoint("api/chat")?;
        let body = json!({ "thread_id": thread_id, "user_input": user_input });
        self.send(self.http.post(url).json(&body)).await
    }

    /// Generate a flow from the thread's conversation.
    pub async fn generate_flow(&self, thread_id: &ThreadId) -> Result<FlowGeneration> {
        let url = self.endpoint("api/flow")?;
        let body = json!({ "thread_id": thread_id });
        self.send(self.http.post(url).json(&body)).await
    }

    /// Publish a previously generated flow.
    pub async fn publish_flow(&self, flow_id: &FlowId) -> Result<FlowPublished> {
        let url = self.endpoint(&format!("api/flow/{}/publish", flow_id))?;
        self.send(self.http.post(url).json(&json!({}))).await
    }

    /// Resolve a path against the base URL.
    fn endpoint(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.base_url.join(path).map_err(ClientError::from)
    }

    /// Fire one request and decode the body, mapping non-2xx responses to
    /// [`ClientError::Api`].
    async fn send<T>(&self, request: reqwest::RequestBuilder) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        let response = request.timeout(self.timeout).send().await?;
        let status = response.status();

        if status.is_success() {
            return Ok(response.json().await?);
        }

        let code = status.as_u16();
        Err(match response.json::<ErrorResponse>().await {
            Ok(body) => ClientError::Api {
                status: code,
                message: body.error,
                details: body.details,
            },
            Err(_) => ClientError::Api {
                status: code,
                message: format!("HTTP {}", code),
                details: None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unparseable_base_url() {
        assert!(WhatsflowClient::new("not a url").is_err());
    }

    #[test]
    fn test_normalizes_trailing_slash() {
        let client = WhatsflowClient::new("http://localhost:8686").unwrap();
        assert_eq!(client.base_url().as_str(), "http://localhost:8686/");
    }

    #[test]
    fn test_endpoints_resolve_against_base() {
        let client = WhatsflowClient::new("http://localhost:8686").unwrap();

        let url = client.endpoint("api/chat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8686/api/chat");

        let url = client.endpoint("/api/flow").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8686/api/flow");
    }

    #[test]
    fn test_base_url_path_prefix_survives_joins() {
        let client = WhatsflowClient::new("http://localhost:8686/whatsflow").unwrap();
        let url = client.endpoint("api/chat").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8686/whatsflow/api/chat");
    }
}
