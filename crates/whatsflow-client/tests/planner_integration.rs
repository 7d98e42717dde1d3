//! Integration tests for the planner client against a mocked backend.

use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whatsflow_client::{ClientError, Planner, PlannerClient, PlannerConfig};
use whatsflow_types::ThreadId;

fn client_for(server: &MockServer) -> PlannerClient {
    PlannerClient::new(PlannerConfig::new(server.uri())).unwrap()
}

#[tokio::test]
async fn test_chat_posts_thread_and_input_and_passes_reply_through() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "thread_id": "t-1",
            "user_input": "an insurance flow"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "reply": "Drafting it now",
            "turns": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let reply = client
        .chat(&ThreadId::from("t-1"), "an insurance flow")
        .await
        .unwrap();

    assert_eq!(reply["reply"], "Drafting it now");
    assert_eq!(reply["turns"], 1);
}

#[tokio::test]
async fn test_plan_decodes_plan_field() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/plan"))
        .and(body_json(json!({
            "thread_id": "t-1",
            "query": "make flow"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "plan": { "screens": ["FIRST_SCREEN", "QUOTE_SCREEN"] },
            "elapsed_ms": 412
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let response = client
        .plan(&ThreadId::from("t-1"), "make flow")
        .await
        .unwrap();

    assert_eq!(response.plan["screens"][0], "FIRST_SCREEN");
}

#[tokio::test]
async fn test_get_flows_decodes_bundle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/get_flows"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "wap_json": { "version": "5.0", "screens": [] },
            "react_json": { "nodes": [], "edges": [] }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let bundle = client
        .get_flows(&ThreadId::from("t-1"), "make flow")
        .await
        .unwrap();

    assert_eq!(bundle.wap_json["version"], "5.0");
    assert!(bundle.react_json["nodes"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_non_success_surfaces_status_and_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("upstream worker crashed"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let error = client
        .chat(&ThreadId::from("t-1"), "hello")
        .await
        .unwrap_err();

    match error {
        ClientError::UpstreamStatus {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "planner");
            assert_eq!(status, 502);
            assert_eq!(body, "upstream worker crashed");
        }
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}
