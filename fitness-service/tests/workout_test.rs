//! Workout scheduling, lifecycle, stats and template ownership tests.

mod common;

use chrono::Utc;
use common::{TestApp, TestUser};
use serde_json::{json, Value};

const BEGINNER_FULL_BODY: &str = "7a2d3b20-0000-4000-8000-000000000001";

async fn schedule_today(app: &TestApp, user: &TestUser, body: Value) -> Value {
    let mut body = body;
    body["scheduled_date"] = json!(Utc::now().date_naive().to_string());
    let response = app.post(user, "/api/workouts", body).await;
    assert_eq!(response.status(), 201);
    response.json().await.unwrap()
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn workout_lifecycle_updates_streak_and_stats() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let workout = schedule_today(&app, &user, json!({ "template_id": BEGINNER_FULL_BODY })).await;
    assert_eq!(workout["name"], "Beginner Full Body");
    assert_eq!(workout["workout_type"], "strength");
    assert_eq!(workout["status"], "scheduled");
    let id = workout["workout_id"].as_str().unwrap().to_string();

    // Completing before starting is rejected
    let response = app
        .post(&user, &format!("/api/workouts/{}/complete", id), json!({}))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Workout is not in progress");

    let response = app
        .post(&user, &format!("/api/workouts/{}/start", id), json!({}))
        .await;
    assert_eq!(response.status(), 200);
    let started: Value = response.json().await.unwrap();
    assert_eq!(started["status"], "in_progress");
    assert!(started["started_at"].is_string());

    let response = app
        .post(&user, &format!("/api/workouts/{}/start", id), json!({}))
        .await;
    assert_eq!(response.status(), 400);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Workout already in progress");

    let response = app
        .post(
            &user,
            &format!("/api/workouts/{}/complete", id),
            json!({ "calories_burned": 320, "actual_duration": 35, "user_rating": 4 }),
        )
        .await;
    assert_eq!(response.status(), 200);
    let completed: Value = response.json().await.unwrap();
    assert_eq!(completed["status"], "completed");
    assert_eq!(completed["calories_burned"], 320);

    let response = app
        .post(&user, &format!("/api/workouts/{}/start", id), json!({}))
        .await;
    assert_eq!(response.status(), 400);

    let stats: Value = app.get(&user, "/api/workouts/stats").await.json().await.unwrap();
    assert_eq!(stats["total_workouts"], 1);
    assert_eq!(stats["workouts_this_week"], 1);
    assert_eq!(stats["total_calories_burned"], 320);
    assert_eq!(stats["favorite_workout_type"], "strength");
    assert_eq!(stats["completion_rate"], 100.0);
    assert_eq!(stats["current_streak"], 1);
    assert_eq!(stats["longest_streak"], 1);

    let history: Value = app
        .get(&user, "/api/workouts/history?days=7")
        .await
        .json()
        .await
        .unwrap();
    assert_eq!(history["period_days"], 7);
    assert_eq!(history["summary"]["total_workouts"], 1);
    assert_eq!(history["summary"]["total_calories"], 320);
    assert_eq!(history["summary"]["total_minutes"], 35);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn complete_accepts_empty_body() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let workout = schedule_today(&app, &user, json!({ "workout_type": "cardio" })).await;
    let id = workout["workout_id"].as_str().unwrap().to_string();
    assert!(workout["name"].as_str().unwrap().starts_with("Cardio Workout - "));

    app.post(&user, &format!("/api/workouts/{}/start", id), json!({}))
        .await;

    let response = app
        .client
        .post(app.url(&format!("/api/workouts/{}/complete", id)))
        .bearer_auth(&user.token)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "completed");
    assert!(body["completed_at"].is_string());

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn status_changes_through_patch_are_limited() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let workout = schedule_today(&app, &user, json!({ "name": "Evening run" })).await;
    let path = format!("/api/workouts/{}", workout["workout_id"].as_str().unwrap());

    let response = app.patch(&user, &path, json!({ "status": "completed" })).await;
    assert_eq!(response.status(), 400);

    let response = app.patch(&user, &path, json!({ "status": "skipped" })).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["status"], "skipped");

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn today_suggests_beginner_templates_without_history() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let today: Value = app.get(&user, "/api/workouts/today").await.json().await.unwrap();
    assert_eq!(today["has_workout"], false);
    let suggestions = today["suggested_templates"].as_array().unwrap();
    assert!(!suggestions.is_empty() && suggestions.len() <= 5);
    assert!(suggestions.iter().all(|t| t["difficulty"] == "beginner"));

    schedule_today(&app, &user, json!({ "name": "Leg day" })).await;

    let today: Value = app.get(&user, "/api/workouts/today").await.json().await.unwrap();
    assert_eq!(today["has_workout"], true);
    assert_eq!(today["workout"]["name"], "Leg day");
    assert!(today["suggested_templates"].as_array().unwrap().is_empty());

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn templates_are_mutable_only_by_owner() {
    let app = TestApp::spawn().await;
    let owner = app.register_user().await;
    let other = app.register_user().await;

    let response = app
        .post(
            &owner,
            "/api/workouts/templates",
            json!({
                "name": "Private kettlebell flow",
                "workout_type": "strength",
                "difficulty": "advanced",
                "estimated_duration": 40,
                "is_public": false
            }),
        )
        .await;
    assert_eq!(response.status(), 201);
    let template: Value = response.json().await.unwrap();
    let path = format!(
        "/api/workouts/templates/{}",
        template["template_id"].as_str().unwrap()
    );

    // Private templates are invisible to others
    assert_eq!(app.get(&other, &path).await.status(), 404);

    let response = app.patch(&owner, &path, json!({ "is_public": true })).await;
    assert_eq!(response.status(), 200);

    assert_eq!(app.get(&other, &path).await.status(), 200);
    let response = app.patch(&other, &path, json!({ "name": "Mine now" })).await;
    assert_eq!(response.status(), 403);
    assert_eq!(app.delete(&other, &path).await.status(), 403);

    // Seeded catalogue templates have no owner
    let seeded = format!("/api/workouts/templates/{}", BEGINNER_FULL_BODY);
    assert_eq!(app.delete(&owner, &seeded).await.status(), 403);

    assert_eq!(app.delete(&owner, &path).await.status(), 204);

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn exercise_catalogue_filters() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;

    let all: Value = app.get(&user, "/api/workouts/exercises").await.json().await.unwrap();
    assert!(!all.as_array().unwrap().is_empty());

    let beginner: Value = app
        .get(&user, "/api/workouts/exercises?difficulty=beginner")
        .await
        .json()
        .await
        .unwrap();
    assert!(beginner
        .as_array()
        .unwrap()
        .iter()
        .all(|e| e["difficulty"] == "beginner"));

    app.cleanup().await;
}
