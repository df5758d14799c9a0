//! Usage aggregator tests against PostgreSQL.

mod common;

use chrono::Utc;
use common::TestApp;
use fitness_service::models::ContentType;
use fitness_service::services::UsageAggregator;
use futures::future::join_all;

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn concurrent_records_lose_no_updates() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;
    let usage = UsageAggregator::new(app.db.clone());

    let calls = (0..24).map(|i| {
        let usage = usage.clone();
        let user_id = user.user_id;
        async move {
            let category = match i % 3 {
                0 => ContentType::Workout,
                1 => ContentType::Nutrition,
                _ => ContentType::HealthAnalysis,
            };
            let succeeded = i % 4 != 0;
            let tokens = if succeeded { 10 } else { 0 };
            usage.record(user_id, category, succeeded, tokens, 1.0).await
        }
    });

    for result in join_all(calls).await {
        result.expect("record failed");
    }

    let rows = usage.daily(user.user_id, 1).await.unwrap();
    assert_eq!(rows.len(), 1, "exactly one row per user and day");

    let row = &rows[0];
    assert_eq!(row.stat_date, Utc::now().date_naive());
    assert_eq!(row.total_requests, 24);
    assert_eq!(row.successful_requests, 18);
    assert_eq!(row.failed_requests, 6);
    assert_eq!(row.workout_requests, 8);
    assert_eq!(row.nutrition_requests, 8);
    assert_eq!(row.health_analysis_requests, 8);
    assert_eq!(row.total_tokens_used, 180);
    assert_eq!(row.avg_response_time, Some(1.0));

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn response_time_uses_pairwise_smoothing() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;
    let usage = UsageAggregator::new(app.db.clone());

    usage
        .record(user.user_id, ContentType::Workout, true, 100, 2.0)
        .await
        .unwrap();
    let row = usage
        .record(user.user_id, ContentType::Workout, true, 100, 4.0)
        .await
        .unwrap();
    assert_eq!(row.avg_response_time, Some(3.0));

    let row = usage
        .record(user.user_id, ContentType::Nutrition, false, 0, 1.0)
        .await
        .unwrap();
    assert_eq!(row.avg_response_time, Some(2.0));
    assert_eq!(row.total_requests, 3);
    assert_eq!(row.failed_requests, 1);

    let summary = usage.summary(user.user_id, 30).await.unwrap();
    assert_eq!(summary.total_requests, 3);
    assert_eq!(summary.total_tokens_used, 200);
    assert!(summary.average_rating.is_none());

    app.cleanup().await;
}

#[tokio::test]
#[ignore] // Requires PostgreSQL
async fn rating_for_a_day_without_usage_is_ignored() {
    let app = TestApp::spawn().await;
    let user = app.register_user().await;
    let usage = UsageAggregator::new(app.db.clone());

    let folded = usage
        .record_rating(user.user_id, Utc::now().date_naive(), 5)
        .await
        .unwrap();
    assert!(!folded);
    assert!(usage.daily(user.user_id, 7).await.unwrap().is_empty());

    app.cleanup().await;
}
