//! Registration, login, profile and vitals tests.

mod common;

use common::{TestApp, TEST_PASSWORD};
use serde_json::{json, Value};

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn register_login_logout_flow() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let response = app
        .client
        .post(app.url("/api/users/login"))
        .json(&json!({ "email": user.email.to_uppercase(), "password": TEST_PASSWORD }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["user_id"], user.user_id.to_string());
    let second_token = body["token"].as_str().unwrap().to_string();
    assert_ne!(second_token, user.token);

    let response = app.post(&user, "/api/users/logout", json!({})).await;
    assert_eq!(response.status(), 200);

    // The logged-out token is gone; the other session still works
    let response = app.get(&user, "/api/users/profile").await;
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid token");

    let response = app
        .client
        .get(app.url("/api/users/profile"))
        .bearer_auth(&second_token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn duplicate_email_is_rejected() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let response = app
        .client
        .post(app.url("/api/users/register"))
        .json(&json!({
            "email": user.email,
            "username": "someone-else",
            "password": TEST_PASSWORD,
            "password_confirm": TEST_PASSWORD
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn wrong_password_is_401() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let response = app
        .client
        .post(app.url("/api/users/login"))
        .json(&json!({ "email": user.email, "password": "not-the-password" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 401);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Invalid email or password");

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn profile_update_derives_bmi() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let response = app
        .patch(
            &user,
            "/api/users/profile",
            json!({ "height_cm": 180.0, "weight_kg": 81.0, "fitness_level": "advanced" }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["bmi"], 25.0);
    assert_eq!(body["fitness_level"], "advanced");

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn vitals_drive_health_tips() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let response = app
        .post(
            &user,
            "/api/users/medical",
            json!({
                "recorded_date": "2024-03-01",
                "sleep_hours": 5.5,
                "stress_level": 9,
                "energy_level": 6
            }),
        )
        .await;
    assert_eq!(response.status(), 201);

    let response = app.get(&user, "/api/users/health-insights").await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    let types: Vec<&str> = body["insights"]
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["type"].as_str().unwrap())
        .collect();
    assert_eq!(types, vec!["stress", "sleep"]);
    assert_eq!(body["total_insights"], 2);

    let response = app.get(&user, "/api/users/stats").await;
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["medical_records"], 1);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn goals_are_scoped_to_owner() {
    let app = TestApp::spawn().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;

    let response = app
        .post(
            &owner,
            "/api/users/goals",
            json!({
                "goal_type": "weight_loss",
                "description": "Lose 5 kg",
                "target_value": 5.0,
                "unit": "kg"
            }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let goal: Value = response.json().await.unwrap();
    let path = format!("/api/users/goals/{}", goal["goal_id"].as_str().unwrap());

    assert_eq!(app.get(&other, &path).await.status(), 404);
    assert_eq!(app.delete(&other, &path).await.status(), 404);
    assert_eq!(app.get(&owner, &path).await.status(), 200);
    assert_eq!(app.delete(&owner, &path).await.status(), 204);

    app.cleanup().await;
}
