//! Integration tests for schedule CRUD and free slots

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

const DATE: &str = "2024-03-15";

#[tokio::test]
async fn schedule_round_trip() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, created) = app
        .post(
            &format!("/api/v1/schedules/{}", user_id),
            json!({"date": DATE, "start_time": "09:00", "end_time": "10:30", "title": "팀 회의"}),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let schedule_id = created["id"].as_i64().unwrap();

    let (status, listed) = app
        .get(&format!("/api/v1/schedules/{}?date={}", user_id, DATE))
        .await;
    assert_eq!(status, StatusCode::OK);
    let entries = listed.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["title"], json!("팀 회의"));

    let (status, _) = app
        .delete(&format!("/api/v1/schedules/{}/{}", user_id, schedule_id))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, listed) = app
        .get(&format!("/api/v1/schedules/{}?date={}", user_id, DATE))
        .await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn inverted_time_range_is_rejected() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/schedules/{}", user_id),
            json!({"date": DATE, "start_time": "14:00", "end_time": "13:00", "title": "x"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("VALIDATION_ERROR"));
}

#[tokio::test]
async fn free_slots_reflect_the_day() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    app.post(
        &format!("/api/v1/schedules/{}", user_id),
        json!({"date": DATE, "start_time": "09:00", "end_time": "18:00", "title": "업무"}),
    )
    .await;

    let (status, slots) = app
        .get(&format!("/api/v1/schedules/{}/free?date={}", user_id, DATE))
        .await;

    assert_eq!(status, StatusCode::OK);
    let slots = slots.as_array().unwrap();
    assert_eq!(slots.len(), 2);
    assert_eq!(slots[0]["start"], json!("06:00"));
    assert_eq!(slots[0]["end"], json!("09:00"));
    assert_eq!(slots[1]["start"], json!("18:00"));
    assert_eq!(slots[1]["duration_minutes"], json!(300));
}

#[tokio::test]
async fn deleting_missing_schedule_is_not_found() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, _) = app
        .delete(&format!("/api/v1/schedules/{}/42", user_id))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
