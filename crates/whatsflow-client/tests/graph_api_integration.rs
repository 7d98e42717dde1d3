//! Integration tests for the Graph API client against a mocked endpoint.

use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use whatsflow_client::{ClientError, FlowPublisher, GraphApiClient, GraphApiConfig};
use whatsflow_types::FlowId;

#[tokio::test]
async fn test_create_flow_sends_draft_payload_with_bearer_auth() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/10001/flows"))
        .and(header("authorization", "Bearer secret-token"))
        .and(body_json(json!({
            "name": "thread-1",
            "categories": ["OTHER"],
            "flow_json": { "version": "5.0", "screens": [] },
            "publish": false
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1443958546" })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphApiClient::new(
        GraphApiConfig::new("10001", "secret-token").with_base_url(server.uri()),
    )
    .unwrap();
    let flow_id = client
        .create_flow("thread-1", &json!({ "version": "5.0", "screens": [] }))
        .await
        .unwrap();

    assert_eq!(flow_id.as_str(), "1443958546");
}

#[tokio::test]
async fn test_preview_url_requests_uninvalidated_preview() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1443958546"))
        .and(query_param("fields", "preview.invalidate(false)"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "1443958546",
            "preview": { "preview_url": "https://business.facebook.com/wa/preview?id=1" }
        })))
        .mount(&server)
        .await;

    let client = GraphApiClient::new(
        GraphApiConfig::new("10001", "secret-token").with_base_url(server.uri()),
    )
    .unwrap();
    let url = client
        .preview_url(&FlowId::from("1443958546"))
        .await
        .unwrap();

    assert_eq!(
        url.as_deref(),
        Some("https://business.facebook.com/wa/preview?id=1")
    );
}

#[tokio::test]
async fn test_missing_preview_is_none_not_an_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/1443958546"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": "1443958546" })))
        .mount(&server)
        .await;

    let client = GraphApiClient::new(
        GraphApiConfig::new("10001", "secret-token").with_base_url(server.uri()),
    )
    .unwrap();
    let url = client
        .preview_url(&FlowId::from("1443958546"))
        .await
        .unwrap();

    assert!(url.is_none());
}

#[tokio::test]
async fn test_publish_posts_to_publish_edge() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/1443958546/publish"))
        .and(header("authorization", "Bearer secret-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .expect(1)
        .mount(&server)
        .await;

    let client = GraphApiClient::new(
        GraphApiConfig::new("10001", "secret-token").with_base_url(server.uri()),
    )
    .unwrap();
    client.publish(&FlowId::from("1443958546")).await.unwrap();
}

#[tokio::test]
async fn test_graph_error_message_is_extracted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/10001/flows"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {
                "message": "Invalid flow JSON",
                "type": "OAuthException",
                "code": 100
            }
        })))
        .mount(&server)
        .await;

    let client = GraphApiClient::new(
        GraphApiConfig::new("10001", "secret-token").with_base_url(server.uri()),
    )
    .unwrap();
    let error = client.create_flow("thread-1", &json!({})).await.unwrap_err();

    match error {
        ClientError::UpstreamStatus {
            service,
            status,
            body,
        } => {
            assert_eq!(service, "graph");
            assert_eq!(status, 400);
            assert_eq!(body, "Invalid flow JSON");
        }
        other => panic!("expected UpstreamStatus, got {other:?}"),
    }
}
