//! Meta Graph API client for WhatsApp Flows.
//!
//! Covers the three calls the playground makes: create a flow under a
//! WhatsApp Business Account, fetch its preview URL, and publish it.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response, header};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::error::{ClientError, Result};
use whatsflow_types::FlowId;

/// Default Graph API base URL.
const DEFAULT_BASE_URL: &str = "https://graph.facebook.com/v18.0";

/// Default timeout for Graph API requests.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Abstraction over the flow-publishing side of the Graph API.
#[async_trait]
pub trait FlowPublisher: Send + Sync {
    /// Create a draft flow and return its assigned id.
    async fn create_flow(&self, name: &str, flow_json: &Value) -> Result<FlowId>;

    /// Fetch the interactive preview URL for a flow, when one exists.
    async fn preview_url(&self, flow_id: &FlowId) -> Result<Option<String>>;

    /// Publish a previously created flow.
    async fn publish(&self, flow_id: &FlowId) -> Result<()>;
}

// ─────────────────────────────────────────────────────────────────────────────
// Config
// ─────────────────────────────────────────────────────────────────────────────

/// Settings for the Graph API client.
#[derive(Debug, Clone)]
pub struct GraphApiConfig {
    /// Graph origin plus version prefix.
    pub base_url: String,

    /// WhatsApp Business Account id flows are created under.
    pub waba_id: String,

    /// Bearer token carried on every call.
    pub access_token: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl GraphApiConfig {
    /// Create a config with the given account id and token.
    pub fn new(waba_id: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            waba_id: waba_id.into(),
            access_token: access_token.into(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Graph API Client
// ─────────────────────────────────────────────────────────────────────────────

/// HTTP client for the Graph API.
///
/// Every call carries the bearer token. Construction fails when the token or
/// account id is missing; credentials never have baked-in defaults.
#[derive(Debug, Clone)]
pub struct GraphApiClient {
    client: Client,
    config: GraphApiConfig,
}

impl GraphApiClient {
    /// Create a new Graph API client.
    pub fn new(config: GraphApiConfig) -> Result<Self> {
        if config.access_token.trim().is_empty() {
            return Err(ClientError::Config(
                "Graph API access token is required (set FB_ACCESS_TOKEN)".to_string(),
            ));
        }
        if config.waba_id.trim().is_empty() {
            return Err(ClientError::Config(
                "WhatsApp Business Account id is required (set WABA_ID)".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self { client, config })
    }

    /// The configured base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Build a node URL under the API base.
    fn node_url(&self, node: &str) -> String {
        format!("{}/{}", self.config.base_url.trim_end_matches('/'), node)
    }

    /// Add authentication headers to a request.
    fn add_headers(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        builder
            .bearer_auth(&self.config.access_token)
            .header(header::CONTENT_TYPE, "application/json")
    }

    /// Handle a Graph API response.
    async fn handle_response<T: serde::de::DeserializeOwned>(response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(Self::handle_error_response(response).await);
        }
        Ok(response.json().await?)
    }

    /// Turn a failed response into an error, extracting the Graph error
    /// message when the body carries one.
    async fn handle_error_response(response: Response) -> ClientError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();

        let body = match serde_json::from_str::<GraphErrorBody>(&body) {
            Ok(parsed) => parsed.error.message,
            Err(_) => body,
        };

        ClientError::UpstreamStatus {
            service: "graph".to_string(),
            status,
            body,
        }
    }
}

#[async_trait]
impl FlowPublisher for GraphApiClient {
    async fn create_flow(&self, name: &str, flow_json: &Value) -> Result<FlowId> {
        tracing::debug!(name, waba_id = %self.config.waba_id, "Creating flow");

        let body = json!({
            "name": name,
            "categories": ["OTHER"],
            "flow_json": flow_json,
            "publish": false,
        });

        let response = self
            .add_headers(
                self.client
                    .post(self.node_url(&format!("{}/flows", self.config.waba_id))),
            )
            .json(&body)
            .send()
            .await?;

        let created: CreatedFlow = Self::handle_response(response).await?;
        Ok(FlowId::from(created.id))
    }

    async fn preview_url(&self, flow_id: &FlowId) -> Result<Option<String>> {
        tracing::debug!(flow_id = %flow_id, "Fetching flow preview URL");

        let response = self
            .add_headers(
                self.client
                    .get(self.node_url(flow_id.as_str()))
                    .query(&[("fields", "preview.invalidate(false)")]),
            )
            .send()
            .await?;

        let preview: PreviewResponse = Self::handle_response(response).await?;
        Ok(preview.preview.map(|p| p.preview_url))
    }

    async fn publish(&self, flow_id: &FlowId) -> Result<()> {
        tracing::debug!(flow_id = %flow_id, "Publishing flow");

        let response = self
            .add_headers(
                self.client
                    .post(self.node_url(&format!("{}/publish", flow_id))),
            )
            .send()
            .await?;

        let _: Value = Self::handle_response(response).await?;
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Wire types
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct CreatedFlow {
    id: String,
}

#[derive(Debug, Deserialize)]
struct PreviewResponse {
    #[serde(default)]
    preview: Option<PreviewInfo>,
}

#[derive(Debug, Deserialize)]
struct PreviewInfo {
    preview_url: String,
}

#[derive(Debug, Deserialize)]
struct GraphErrorBody {
    error: GraphErrorDetail,
}

#[derive(Debug, Deserialize)]
struct GraphErrorDetail {
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_construction_rejects_missing_token() {
        let result = GraphApiClient::new(GraphApiConfig::new("12345", ""));
        assert!(matches!(result, Err(ClientError::Config(_))));

        let result = GraphApiClient::new(GraphApiConfig::new("", "token"));
        assert!(matches!(result, Err(ClientError::Config(_))));
    }

    #[test]
    fn test_node_url_building() {
        let client = GraphApiClient::new(
            GraphApiConfig::new("12345", "token").with_base_url("https://graph.test/v18.0/"),
        )
        .unwrap();
        assert_eq!(
            client.node_url("12345/flows"),
            "https://graph.test/v18.0/12345/flows"
        );
    }

    #[test]
    fn test_preview_response_tolerates_missing_preview() {
        let parsed: PreviewResponse = serde_json::from_str(r#"{"id": "987"}"#).unwrap();
        assert!(parsed.preview.is_none());

        let parsed: PreviewResponse = serde_json::from_str(
            r#"{"preview": {"preview_url": "https://business.facebook.com/wa/preview?x=1"}}"#,
        )
        .unwrap();
        assert_eq!(
            parsed.preview.unwrap().preview_url,
            "https://business.facebook.com/wa/preview?x=1"
        );
    }
}
