//! Flow generation and publishing endpoints.
//!
//! Generation chains four upstream calls: plan the flow, fetch the drafted
//! documents, create the flow at the Graph API, and look up its preview URL.
//! Each stage failing maps to the same 500 body with the stage in `details`.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Deserialize;
use tracing::info;

use whatsflow_client::{FlowGeneration, FlowPublished, MAKE_FLOW_QUERY};
use whatsflow_types::{FlowId, ThreadId};

use crate::error::ServerError;
use crate::state::AppState;

/// Request body for the flow generation endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FlowRequest {
    /// Thread whose conversation the flow is drafted from.
    pub thread_id: String,
}

/// POST /api/flow - generate a flow from a thread's conversation.
pub async fn flow_handler(
    State(state): State<AppState>,
    Json(request): Json<FlowRequest>,
) -> Result<Json<FlowGeneration>, ServerError> {
    if request.thread_id.trim().is_empty() {
        return Err(ServerError::BadRequest("Thread ID is required".to_string()));
    }

    let thread_id = ThreadId::from(request.thread_id);
    info!(thread_id = %thread_id, "Generating flow");

    let plan = state
        .planner
        .plan(&thread_id, MAKE_FLOW_QUERY)
        .await
        .map_err(|source| ServerError::FlowGeneration {
            stage: "plan",
            source,
        })?;

    let bundle = state
        .planner
        .get_flows(&thread_id, MAKE_FLOW_QUERY)
        .await
        .map_err(|source| ServerError::FlowGeneration {
            stage: "get_flows",
            source,
        })?;

    // The thread id doubles as the flow name, the way the editor created them.
    let flow_id = state
        .publisher
        .create_flow(thread_id.as_str(), &bundle.wap_json)
        .await
        .map_err(|source| ServerError::FlowGeneration {
            stage: "create_flow",
            source,
        })?;

    // A flow without a rendered preview yet is not an error.
    let preview_url = state
        .publisher
        .preview_url(&flow_id)
        .await
        .map_err(|source| ServerError::FlowGeneration {
            stage: "preview",
            source,
        })?;

    info!(
        thread_id = %thread_id,
        flow_id = %flow_id,
        has_preview = preview_url.is_some(),
        "Flow created"
    );

    state.record_flow(&thread_id, &flow_id, preview_url.clone(), plan.plan.clone());

    Ok(Json(FlowGeneration {
        success: true,
        thread_id,
        flow_id,
        react_json: bundle.react_json,
        preview_url,
        flow_plan: plan.plan,
    }))
}

/// POST /api/flow/{flow_id}/publish - publish a previously created flow.
pub async fn publish_handler(
    State(state): State<AppState>,
    Path(flow_id): Path<String>,
) -> Result<Json<FlowPublished>, ServerError> {
    if flow_id.trim().is_empty() {
        return Err(ServerError::BadRequest("Flow ID is required".to_string()));
    }

    let flow_id = FlowId::from(flow_id);
    info!(flow_id = %flow_id, "Publishing flow");

    state
        .publisher
        .publish(&flow_id)
        .await
        .map_err(ServerError::Publish)?;

    Ok(Json(FlowPublished {
        success: true,
        flow_id,
    }))
}
