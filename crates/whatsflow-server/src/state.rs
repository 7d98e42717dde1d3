//! Application state shared across handlers.

use std::sync::Arc;

use serde_json::Value;

use whatsflow_client::{FlowPublisher, Planner};
use whatsflow_config::WhatsflowConfig;
use whatsflow_store::{CacheConfig, SessionCache, ThreadState};
use whatsflow_types::{FlowId, ThreadId};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Service configuration.
    pub config: Arc<WhatsflowConfig>,

    /// Planner backend used for chat and flow drafting.
    pub planner: Arc<dyn Planner>,

    /// Graph API flow publisher.
    pub publisher: Arc<dyn FlowPublisher>,

    /// Recently active drafting threads.
    pub sessions: Arc<SessionCache<ThreadState>>,
}

impl AppState {
    /// Create a new application state.
    pub fn new(
        config: WhatsflowConfig,
        planner: Arc<dyn Planner>,
        publisher: Arc<dyn FlowPublisher>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            planner,
            publisher,
            sessions: Arc::new(SessionCache::new(CacheConfig::default())),
        }
    }

    /// Replace the session cache configuration.
    pub fn with_session_cache(mut self, config: CacheConfig) -> Self {
        self.sessions = Arc::new(SessionCache::new(config));
        self
    }

    /// Record a generated flow against its thread.
    pub fn record_flow(
        &self,
        thread_id: &ThreadId,
        flow_id: &FlowId,
        preview_url: Option<String>,
        flow_plan: Value,
    ) {
        let mut state = self
            .sessions
            .get(thread_id.as_str())
            .unwrap_or_else(|| ThreadState::new(thread_id.clone()));
        state.flow_id = Some(flow_id.clone());
        state.preview_url = preview_url;
        state.flow_plan = Some(flow_plan);
        state.touch();
        self.sessions.insert(thread_id.as_str(), state);
    }

    /// Look up cached state for a thread.
    pub fn thread_state(&self, thread_id: &ThreadId) -> Option<ThreadState> {
        self.sessions.get(thread_id.as_str())
    }
}
