//! Integration tests for the calorie summary engine and manual logs

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

const DATE: &str = "2024-03-15";

#[tokio::test]
async fn summary_uses_profile_bmr_and_five_tier_factor() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, body) = app
        .get(&format!("/api/v1/logs/{}/summary?date={}", user_id, DATE))
        .await;

    assert_eq!(status, StatusCode::OK);
    // 10*70 + 6.25*175 - 5*30 + 5 = 1648.75 (male, age 30)
    assert_eq!(body["bmr"], json!(1648.75));
    // activity_level 'low' is not a five-tier key, so sedentary 1.2 applies
    assert_eq!(body["tdee"], json!(1978.5));
    assert_eq!(body["intake"], json!(0.0));
    assert_eq!(body["exercise"], json!(0.0));
    // deficit 1978.5 / 7700, rounded to 4 decimals at persistence
    assert_eq!(body["est_weight_change_kg"], json!(0.2569));
}

#[tokio::test]
async fn summary_without_body_metrics_still_counts_calories() {
    let app = TestApp::new().await;
    let user_id = app.seed_bare_user().await;

    app.post(
        &format!("/api/v1/logs/{}/meals", user_id),
        json!({"date": DATE, "meal_type": "lunch", "food_name": "비빔밥", "calories": 600}),
    )
    .await;

    let (status, body) = app
        .get(&format!("/api/v1/logs/{}/summary?date={}", user_id, DATE))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["bmr"], json!(0.0));
    assert_eq!(body["tdee"], json!(0.0));
    assert_eq!(body["intake"], json!(600.0));
    assert_eq!(body["deficit"], json!(-600.0));
}

#[tokio::test]
async fn summary_is_idempotent() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.post(
        &format!("/api/v1/logs/{}/meals", user_id),
        json!({"date": DATE, "meal_type": "dinner", "food_name": "김치찌개", "calories": 450, "protein": 15}),
    )
    .await;

    let path = format!("/api/v1/logs/{}/summary?date={}", user_id, DATE);
    let (_, first) = app.get(&path).await;
    let (_, second) = app.get(&path).await;

    for field in ["bmr", "tdee", "intake", "exercise", "deficit", "est_weight_change_kg"] {
        assert_eq!(first[field], second[field], "field {} changed", field);
    }
}

#[tokio::test]
async fn unconfirmed_recommendations_count_toward_intake() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    // Single known candidate keeps the expected calories deterministic
    app.seed_food("비빔밥", "lunch", 600, None).await;
    app.seed_schedule(user_id, DATE, "점심").await;

    app.post(
        &format!("/api/v1/plan/{}/generate", user_id),
        json!({"date": DATE}),
    )
    .await;

    let (_, body) = app
        .get(&format!("/api/v1/logs/{}/summary?date={}", user_id, DATE))
        .await;
    assert_eq!(body["intake"], json!(600.0));
}

#[tokio::test]
async fn apply_does_not_double_count_intake() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_food("비빔밥", "lunch", 600, None).await;
    app.seed_schedule(user_id, DATE, "점심").await;

    app.post(
        &format!("/api/v1/plan/{}/generate", user_id),
        json!({"date": DATE}),
    )
    .await;
    let summary_path = format!("/api/v1/logs/{}/summary?date={}", user_id, DATE);
    let (_, before) = app.get(&summary_path).await;

    app.post(
        &format!("/api/v1/plan/{}/apply", user_id),
        json!({"date": DATE}),
    )
    .await;
    let (_, after) = app.get(&summary_path).await;

    // Once applied the calories live in the logs and the confirmed
    // recommendation is excluded, so intake is unchanged
    assert_eq!(before["intake"], after["intake"]);
    assert_eq!(after["intake"], json!(600.0));
}

#[tokio::test]
async fn manual_logs_move_the_balance() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, meal) = app
        .post(
            &format!("/api/v1/logs/{}/meals", user_id),
            json!({"date": DATE, "meal_type": "lunch", "food_name": "돈까스", "calories": 800, "protein": 30}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meal["calorie_summary"]["intake"], json!(800.0));

    let (status, activity) = app
        .post(
            &format!("/api/v1/logs/{}/activities", user_id),
            json!({"date": DATE, "workout": "러닝", "duration": 30, "calories": 300}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(activity["calorie_summary"]["exercise"], json!(300.0));

    let (status, listed) = app
        .get(&format!("/api/v1/logs/{}/activities?date={}", user_id, DATE))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["workout"], json!("러닝"));
    assert_eq!(listed[0]["intensity"], json!("medium"));
    assert_eq!(listed[0]["source"], json!("manual"));

    // Deleting the meal restores the balance
    let item_id = meal["item"]["id"].as_i64().unwrap();
    let (status, deleted) = app
        .delete(&format!("/api/v1/logs/{}/meals/{}", user_id, item_id))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["calorie_summary"]["intake"], json!(0.0));
}

#[tokio::test]
async fn deleting_missing_log_is_not_found() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, body) = app
        .delete(&format!("/api/v1/logs/{}/meals/999", user_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], json!("NOT_FOUND"));

    let (status, _) = app
        .delete(&format!("/api/v1/logs/{}/activities/999", user_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn negative_calories_are_rejected() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/logs/{}/meals", user_id),
            json!({"date": DATE, "meal_type": "lunch", "food_name": "물", "calories": -10}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}
