//! Health check integration tests for fitness-service.

mod common;

use common::TestApp;

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn health_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/health"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    let body: serde_json::Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(body["status"], "ok");
    assert_eq!(body["service"], "fitness-service-test");
    assert_eq!(body["checks"]["postgres"], "up");

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn readiness_check_works() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .get(app.url("/ready"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn metrics_endpoint_works() {
    let app = TestApp::spawn().await;

    // Generate at least one labelled sample
    app.client.get(app.url("/api")).send().await.unwrap();

    let response = app
        .client
        .get(app.url("/metrics"))
        .send()
        .await
        .expect("Failed to execute request");

    assert!(response.status().is_success());
    let text = response.text().await.unwrap();
    assert!(text.contains("fitness_http_requests_total"));

    app.cleanup().await;
}
