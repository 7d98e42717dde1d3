//! HTTP API server for WhatsFlow.
//!
//! Exposes the flow-generation surface over JSON:
//!
//! - `GET /health` — liveness probe
//! - `POST /api/chat` — proxy one conversational turn to the planner
//! - `POST /api/flow` — draft, create, and preview a flow for a thread
//! - `POST /api/flow/{id}/publish` — publish a created flow
//!
//! The surface is browser-faced and unauthenticated; the only credential in
//! the system is the outbound Graph API bearer token held by the publisher.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use whatsflow_client::{GraphApiClient, GraphApiConfig, PlannerClient, PlannerConfig};
//! use whatsflow_server::{AppState, Server};
//!
//! let planner = PlannerClient::new(PlannerConfig::default())?;
//! let publisher = GraphApiClient::new(GraphApiConfig::new(waba_id, token))?;
//! let state = AppState::new(config, Arc::new(planner), Arc::new(publisher));
//!
//! Server::new(state).run().await?;
//! ```

pub mod error;
pub mod routes;
pub mod state;

pub use error::{ErrorResponse, Result, ServerError};
pub use routes::{ChatRequest, FlowRequest};
pub use state::AppState;

use std::net::SocketAddr;

use axum::Router;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

/// The WhatsFlow HTTP server: state plus the axum plumbing around it.
pub struct Server {
    state: AppState,
}

impl Server {
    pub fn new(state: AppState) -> Self {
        Self { state }
    }

    /// Every route plus middleware, ready to serve or to drive in tests.
    pub fn router(&self) -> Router {
        let api = Router::new()
            .route("/chat", post(routes::chat_handler))
            .route("/flow", post(routes::flow_handler))
            .route("/flow/{flow_id}/publish", post(routes::publish_handler));

        Router::new()
            .route("/health", get(routes::health_handler))
            .nest("/api", api)
            // Browser editors call this API cross-origin
            .layer(CorsLayer::permissive())
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    /// Serve on the configured bind address until shutdown.
    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.server().socket_addr();
        self.run_on(addr).await
    }

    /// Serve on a specific address, bypassing the config. Tests bind to
    /// port 0 through this.
    pub async fn run_on(self, addr: SocketAddr) -> Result<()> {
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|error| ServerError::Internal(format!("binding {}: {}", addr, error)))?;

        info!(%addr, "WhatsFlow server listening");

        axum::serve(listener, self.router())
            .await
            .map_err(|error| ServerError::Internal(format!("serving: {}", error)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use whatsflow_client::{MockPlanner, MockPublisher};
    use whatsflow_config::WhatsflowConfig;

    fn app(planner: MockPlanner, publisher: MockPublisher) -> Router {
        let state = AppState::new(WhatsflowConfig::new(), Arc::new(planner), Arc::new(publisher));
        Server::new(state).router()
    }

    /// Drive one POST through the router and decode whatever comes back.
    async fn post_json(router: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = router.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_health_reports_ok() {
        let router = app(MockPlanner::new(), MockPublisher::new());
        let response = router
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let report: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(report["status"], "ok");
        assert!(!report["version"].as_str().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_chat_passes_upstream_json_through() {
        let planner = MockPlanner::new().with_chat_reply(json!({
            "reply": "Here is a draft",
            "screens": ["FIRST_SCREEN"]
        }));
        let router = app(planner, MockPublisher::new());

        let (status, body) = post_json(
            router,
            "/api/chat",
            json!({"thread_id": "t-1", "user_input": "book appointments"}),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["reply"], "Here is a draft");
        assert_eq!(body["screens"][0], "FIRST_SCREEN");
    }

    #[tokio::test]
    async fn test_chat_rejects_blank_thread_id() {
        let router = app(MockPlanner::new(), MockPublisher::new());

        let (status, body) = post_json(
            router,
            "/api/chat",
            json!({"thread_id": "  ", "user_input": "hello"}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Thread ID is required");
    }

    #[tokio::test]
    async fn test_flow_generation_chains_and_reports_camel_case() {
        let planner = MockPlanner::new()
            .with_plan(json!({"screens": ["A", "B"]}))
            .with_bundle(
                json!({"version": "5.0", "screens": []}),
                json!({"nodes": [], "edges": []}),
            );
        let publisher = MockPublisher::new().with_preview_url("https://preview.test/1");
        let router = app(planner, publisher);

        let (status, body) = post_json(router, "/api/flow", json!({"thread_id": "t-7"})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["threadId"], "t-7");
        assert_eq!(body["flowId"], "flow_1");
        assert_eq!(body["previewUrl"], "https://preview.test/1");
        assert_eq!(body["flowPlan"]["screens"][1], "B");
        assert!(body["reactJson"]["nodes"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_flow_failure_maps_to_generation_error_body() {
        let planner = MockPlanner::failing("planner offline");
        let router = app(planner, MockPublisher::new());

        let (status, body) = post_json(router, "/api/flow", json!({"thread_id": "t-7"})).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "Failed to generate flow");
        assert!(body["details"].as_str().unwrap().starts_with("plan:"));
    }

    #[tokio::test]
    async fn test_publish_route_publishes() {
        let router = app(MockPlanner::new(), MockPublisher::new());

        let (status, body) =
            post_json(router, "/api/flow/1443958546/publish", json!({})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["flowId"], "1443958546");
    }
}
