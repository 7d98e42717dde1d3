//! Mock planner and publisher for testing purposes.
//!
//! Both return pre-configured responses and log the calls made to them,
//! useful for deterministic testing of the server and the playground.

use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{ClientError, Result};
use crate::graph_api::FlowPublisher;
use crate::planner::Planner;
use crate::types::{FlowBundle, PlanResponse};
use whatsflow_types::{FlowId, ThreadId};

/// A call made to a [`MockPlanner`].
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerCall {
    Chat { thread_id: String, user_input: String },
    Plan { thread_id: String, query: String },
    GetFlows { thread_id: String, query: String },
}

/// A mock planner backend.
///
/// Chat replies are returned in order; plan and flow bundle are fixed values.
#[derive(Debug, Default)]
pub struct MockPlanner {
    chat_replies: Mutex<Vec<Value>>,
    plan: Mutex<Option<Value>>,
    bundle: Mutex<Option<FlowBundle>>,
    failure: Mutex<Option<String>>,
    call_log: Mutex<Vec<PlannerCall>>,
}

impl MockPlanner {
    /// Create a mock planner with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a chat reply. Replies are returned in order.
    pub fn with_chat_reply(self, reply: Value) -> Self {
        self.chat_replies.lock().unwrap().push(reply);
        self
    }

    /// Set the plan returned by `plan`.
    pub fn with_plan(self, plan: Value) -> Self {
        *self.plan.lock().unwrap() = Some(plan);
        self
    }

    /// Set the flow bundle returned by `get_flows`.
    pub fn with_bundle(self, wap_json: Value, react_json: Value) -> Self {
        *self.bundle.lock().unwrap() = Some(FlowBundle {
            wap_json,
            react_json,
        });
        self
    }

    /// Make every call fail with the given message (HTTP 500).
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::default();
        *mock.failure.lock().unwrap() = Some(message.into());
        mock
    }

    /// Get all calls that were made to this planner.
    pub fn calls(&self) -> Vec<PlannerCall> {
        self.call_log.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ClientError::UpstreamStatus {
                service: "planner".to_string(),
                status: 500,
                body: message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Planner for MockPlanner {
    async fn chat(&self, thread_id: &ThreadId, user_input: &str) -> Result<Value> {
        self.call_log.lock().unwrap().push(PlannerCall::Chat {
            thread_id: thread_id.to_string(),
            user_input: user_input.to_string(),
        });
        self.check_failure()?;

        let mut replies = self.chat_replies.lock().unwrap();
        if replies.is_empty() {
            return Err(ClientError::UpstreamStatus {
                service: "planner".to_string(),
                status: 500,
                body: "MockPlanner: no more chat replies available".to_string(),
            });
        }
        Ok(replies.remove(0))
    }

    async fn plan(&self, thread_id: &ThreadId, query: &str) -> Result<PlanResponse> {
        self.call_log.lock().unwrap().push(PlannerCall::Plan {
            thread_id: thread_id.to_string(),
            query: query.to_string(),
        });
        self.check_failure()?;

        let plan = self.plan.lock().unwrap().clone().unwrap_or(Value::Null);
        Ok(PlanResponse { plan })
    }

    async fn get_flows(&self, thread_id: &ThreadId, query: &str) -> Result<FlowBundle> {
        self.call_log.lock().unwrap().push(PlannerCall::GetFlows {
            thread_id: thread_id.to_string(),
            query: query.to_string(),
        });
        self.check_failure()?;

        self.bundle
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ClientError::UpstreamStatus {
                service: "planner".to_string(),
                status: 500,
                body: "MockPlanner: no flow bundle configured".to_string(),
            })
    }
}

/// A mock flow publisher.
///
/// Assigns sequential flow ids and records created and published flows.
#[derive(Debug, Default)]
pub struct MockPublisher {
    created: Mutex<Vec<(String, Value)>>,
    published: Mutex<Vec<FlowId>>,
    preview: Mutex<Option<String>>,
    failure: Mutex<Option<String>>,
}

impl MockPublisher {
    /// Create a mock publisher with no preview URL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the preview URL returned for every flow.
    pub fn with_preview_url(self, url: impl Into<String>) -> Self {
        *self.preview.lock().unwrap() = Some(url.into());
        self
    }

    /// Make every call fail with the given message (HTTP 500).
    pub fn failing(message: impl Into<String>) -> Self {
        let mock = Self::default();
        *mock.failure.lock().unwrap() = Some(message.into());
        mock
    }

    /// Get the (name, flow_json) pairs passed to `create_flow`.
    pub fn created(&self) -> Vec<(String, Value)> {
        self.created.lock().unwrap().clone()
    }

    /// Get the flow ids passed to `publish`.
    pub fn published(&self) -> Vec<FlowId> {
        self.published.lock().unwrap().clone()
    }

    fn check_failure(&self) -> Result<()> {
        if let Some(message) = self.failure.lock().unwrap().clone() {
            return Err(ClientError::UpstreamStatus {
                service: "graph".to_string(),
                status: 500,
                body: message,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl FlowPublisher for MockPublisher {
    async fn create_flow(&self, name: &str, flow_json: &Value) -> Result<FlowId> {
        self.check_failure()?;
        let mut created = self.created.lock().unwrap();
        created.push((name.to_string(), flow_json.clone()));
        Ok(FlowId::from(format!("flow_{}", created.len())))
    }

    async fn preview_url(&self, _flow_id: &FlowId) -> Result<Option<String>> {
        self.check_failure()?;
        Ok(self.preview.lock().unwrap().clone())
    }

    async fn publish(&self, flow_id: &FlowId) -> Result<()> {
        self.check_failure()?;
        self.published.lock().unwrap().push(flow_id.clone());
        Ok(())
    }
}
