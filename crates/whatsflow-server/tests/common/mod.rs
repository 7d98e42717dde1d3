//! Harness for the HTTP integration tests.
//!
//! Each test spawns its own server on an ephemeral port, with scripted
//! planner and publisher mocks behind it, and talks to it through a small
//! JSON-speaking client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Result, bail};
use reqwest::{Client, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use whatsflow_client::{MockPlanner, MockPublisher};
use whatsflow_config::WhatsflowConfig;
use whatsflow_server::{AppState, Server};

/// A live server plus a client pointed at it.
pub struct TestServer {
    pub addr: SocketAddr,
    http: Client,
    _task: JoinHandle<()>,
}

impl TestServer {
    /// Spawn a server whose planner drafts one canned demo flow.
    pub async fn start() -> Result<Self> {
        let planner = MockPlanner::new()
            .with_chat_reply(json!({"reply": "Sketching your flow now"}))
            .with_plan(json!({"screens": ["FIRST_SCREEN", "QUOTE_SCREEN"]}))
            .with_bundle(
                json!({"version": "5.0", "screens": [{"id": "FIRST_SCREEN"}]}),
                json!({"nodes": [{"id": "FIRST_SCREEN"}], "edges": []}),
            );
        let publisher = MockPublisher::new().with_preview_url("https://preview.test/demo");
        Self::start_with(planner, publisher).await
    }

    /// Spawn a server around explicit mocks.
    pub async fn start_with(planner: MockPlanner, publisher: MockPublisher) -> Result<Self> {
        // Claim an ephemeral port, then hand its address to the server.
        let probe = TcpListener::bind("127.0.0.1:0").await?;
        let addr = probe.local_addr()?;
        drop(probe);

        let state = AppState::new(
            WhatsflowConfig::new(),
            Arc::new(planner),
            Arc::new(publisher),
        );
        let task = tokio::spawn(async move {
            let _ = Server::new(state).run_on(addr).await;
        });

        let server = Self {
            addr,
            http: Client::new(),
            _task: task,
        };
        server.wait_ready().await?;
        Ok(server)
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// POST a JSON body, returning the status and the decoded response.
    pub async fn post_json(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        let resp = self
            .http
            .post(format!("{}{}", self.base_url(), path))
            .json(&body)
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }

    /// GET a path, returning the status and the decoded response.
    pub async fn get_json(&self, path: &str) -> Result<(StatusCode, Value)> {
        let resp = self
            .http
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?;
        let status = resp.status();
        Ok((status, resp.json().await?))
    }

    /// Poll the health endpoint until the listener answers.
    async fn wait_ready(&self) -> Result<()> {
        let url = format!("{}/health", self.base_url());
        let deadline = Instant::now() + Duration::from_secs(5);

        while Instant::now() < deadline {
            if let Ok(resp) = self.http.get(&url).send().await {
                if resp.status().is_success() {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        bail!("server at {} never became healthy", self.addr)
    }
}
