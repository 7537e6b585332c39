//! HTTP API integration tests.
//!
//! Tests for the operational endpoints (health check, room listing).

mod fixtures;
use fixtures::TestServer;

#[tokio::test]
async fn test_health_endpoint() {
    // given:
    let server = TestServer::start(29180);
    server.wait_ready().await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .get(format!("{}/api/health", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then:
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_rooms_list_starts_empty() {
    // given: a fresh server with no joins yet
    let server = TestServer::start(29181);
    server.wait_ready().await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .get(format!("{}/api/rooms", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then:
    assert_eq!(response.status(), 200);

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert!(body.is_array(), "Response should be an array");
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    // given:
    let server = TestServer::start(29182);
    server.wait_ready().await;
    let client = reqwest::Client::new();

    // when:
    let response = client
        .get(format!("{}/api/appointments", server.base_url()))
        .send()
        .await
        .expect("Failed to send request");

    // then: the messaging core serves no CRUD surface
    assert_eq!(response.status(), 404);
}
