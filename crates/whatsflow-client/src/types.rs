//! Wire types shared by the clients and the server.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use whatsflow_types::{FlowId, ThreadId};

/// Planner response to a `/plan` request.
///
/// Only `plan` is read; planner backends are free to attach extra fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanResponse {
    /// The drafted flow plan, forwarded verbatim to callers.
    #[serde(default)]
    pub plan: Value,
}

/// Planner response to a `/get_flows` request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlowBundle {
    /// The flow document to send to the Graph API.
    #[serde(default)]
    pub wap_json: Value,
    /// The editor-graph rendition of the same flow.
    #[serde(default)]
    pub react_json: Value,
}

/// Result of a full flow generation (`POST /api/flow`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowGeneration {
    pub success: bool,
    pub thread_id: ThreadId,
    pub flow_id: FlowId,
    pub react_json: Value,
    /// Absent when the Graph API has not produced a preview yet.
    pub preview_url: Option<String>,
    #[serde(default)]
    pub flow_plan: Value,
}

/// Result of publishing a flow (`POST /api/flow/{id}/publish`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowPublished {
    pub success: bool,
    pub flow_id: FlowId,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status (ok, degraded, unhealthy).
    pub status: String,
    /// Server version.
    #[serde(default)]
    pub version: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flow_generation_uses_camel_case_wire_names() {
        let json = json!({
            "success": true,
            "threadId": "t-1",
            "flowId": "987",
            "reactJson": {"nodes": []},
            "previewUrl": null,
            "flowPlan": {"screens": 2}
        });
        let generation: FlowGeneration = serde_json::from_value(json).unwrap();
        assert!(generation.success);
        assert_eq!(generation.thread_id.as_str(), "t-1");
        assert_eq!(generation.flow_id.as_str(), "987");
        assert_eq!(generation.preview_url, None);
        assert_eq!(generation.flow_plan["screens"], 2);

        let back = serde_json::to_value(&generation).unwrap();
        assert_eq!(back["threadId"], "t-1");
        assert_eq!(back["previewUrl"], Value::Null);
    }

    #[test]
    fn test_plan_response_tolerates_extra_fields() {
        let response: PlanResponse =
            serde_json::from_value(json!({"plan": {"steps": 3}, "model": "gpt"})).unwrap();
        assert_eq!(response.plan["steps"], 3);
    }

    #[test]
    fn test_flow_bundle_defaults_missing_parts_to_null() {
        let bundle: FlowBundle = serde_json::from_value(json!({"wap_json": {"v": 1}})).unwrap();
        assert_eq!(bundle.wap_json["v"], 1);
        assert!(bundle.react_json.is_null());
    }
}
