//! Integration tests for the request client

mod common;

use common::{client, fresh_token, session_with};
use nauan_client::{ApiClient, ClientError, Envelope, RequestDescriptor, Session};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_client_builder() {
    let client = ApiClient::builder()
        .base_url("http://localhost:8080/api/")
        .session(Arc::new(Session::in_memory()))
        .build()
        .unwrap();
    assert_eq!(client.base_url(), "http://localhost:8080/api");
}

#[tokio::test]
async fn test_client_builder_requires_base_url_and_session() {
    let result = ApiClient::builder()
        .session(Arc::new(Session::in_memory()))
        .build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));

    let result = ApiClient::builder().base_url("http://localhost").build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_client_builder_rejects_invalid_cors_origin() {
    let result = ApiClient::builder()
        .base_url("http://localhost")
        .cors_origin("http://admin.test\r\n")
        .session(Arc::new(Session::in_memory()))
        .build();
    assert!(matches!(result, Err(ClientError::Configuration(_))));
}

#[tokio::test]
async fn test_zero_timeout_fails_without_network_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(Some(&fresh_token())));

    for descriptor in [
        RequestDescriptor::get("admin/submissions").with_timeout(Duration::ZERO),
        RequestDescriptor::get("admin/submissions")
            .with_timeout(Duration::ZERO)
            .authorized(),
    ] {
        let result = client.send(&descriptor).await;
        assert!(matches!(result, Err(ClientError::Configuration(_))));
    }
}

#[tokio::test]
async fn test_missing_token_fails_without_network_call() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(None));
    let result = client
        .send(&RequestDescriptor::get("content/reported").authorized())
        .await;
    assert!(matches!(result, Err(ClientError::Unauthenticated(_))));
}

#[tokio::test]
async fn test_json_body_round_trip() {
    let mock_server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/content/reported"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"a": 1})))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(None));
    let envelope = client
        .send(&RequestDescriptor::get("content/reported"))
        .await
        .unwrap();
    assert_eq!(envelope.into_value(), json!({"a": 1}));
}

#[tokio::test]
async fn test_empty_body_is_success() {
    let mock_server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/admin/report/r1"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(None));
    let envelope = client
        .send(&RequestDescriptor::delete("admin/report/r1"))
        .await
        .unwrap();
    assert_eq!(envelope, Envelope::Empty);
    assert_eq!(envelope.into_value(), json!({"success": true}));
}

#[tokio::test]
async fn test_error_handling() {
    let mock_server = MockServer::start().await;

    for (status, route) in [(401, "/unauthorized"), (403, "/forbidden")] {
        Mock::given(path(route))
            .respond_with(ResponseTemplate::new(status).set_body_json(json!({"success": true})))
            .mount(&mock_server)
            .await;
    }
    Mock::given(path("/bad"))
        .respond_with(ResponseTemplate::new(400).set_body_string("email is required"))
        .mount(&mock_server)
        .await;
    Mock::given(path("/broken"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(None));
    let send = |route: &'static str| {
        let client = client.clone();
        async move { client.send(&RequestDescriptor::get(route)).await }
    };

    assert!(matches!(
        send("unauthorized").await,
        Err(ClientError::Unauthenticated(_))
    ));
    assert!(matches!(
        send("forbidden").await,
        Err(ClientError::Unauthenticated(_))
    ));
    assert!(matches!(
        send("bad").await,
        Err(ClientError::BadRequest(message)) if message == "email is required"
    ));
    assert!(matches!(
        send("broken").await,
        Err(ClientError::UnknownServerError { status: 500, .. })
    ));
}

#[tokio::test]
async fn test_headers_and_bearer_token() {
    let mock_server = MockServer::start().await;
    let token = fresh_token();

    Mock::given(method("PUT"))
        .and(path("/admin/status/Recipe"))
        .and(header("content-type", "application/json"))
        .and(header("accept", "application/json"))
        .and(header("access-control-allow-origin", "http://admin.test"))
        .and(header("authorization", format!("Bearer {token}").as_str()))
        .and(body_json(json!({"postId": "r1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(Some(&token)));
    let envelope = client
        .send(&RequestDescriptor::put("admin/status/Recipe", json!({"postId": "r1"})).authorized())
        .await
        .unwrap();
    assert!(!envelope.is_failure_marker());
}

#[tokio::test]
async fn test_repeated_query_parameters() {
    let mock_server = MockServer::start().await;
    Mock::given(path("/admin/submissions"))
        .and(query_param("status", "approved"))
        .and(query_param("status", "rejected"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(None));
    client
        .send(
            &RequestDescriptor::get("admin/submissions")
                .query("status", "approved")
                .query("status", "rejected"),
        )
        .await
        .unwrap();
}

#[tokio::test]
async fn test_timeout_aborts_only_the_slow_request() {
    let mock_server = MockServer::start().await;
    Mock::given(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(30)))
        .mount(&mock_server)
        .await;
    Mock::given(path("/fast"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": true}))
                .set_delay(Duration::from_millis(300)),
        )
        .mount(&mock_server)
        .await;

    let client = client(&mock_server, session_with(None));
    let slow = RequestDescriptor::get("slow").with_timeout(Duration::from_millis(100));
    let fast = RequestDescriptor::get("fast").with_timeout(Duration::from_secs(5));

    let (slow, fast) = tokio::join!(client.send(&slow), client.send(&fast));

    assert!(matches!(slow, Err(ClientError::Timeout(d)) if d == Duration::from_millis(100)));
    assert_eq!(fast.unwrap().into_value(), json!({"ok": true}));
}
