//! Integration tests for plan generation, regeneration and apply

mod common;

use axum::http::StatusCode;
use common::TestApp;
use serde_json::json;

const DATE: &str = "2024-03-15";

fn diets(body: &serde_json::Value) -> &Vec<serde_json::Value> {
    body["recommendations"]["diets"].as_array().unwrap()
}

fn workouts(body: &serde_json::Value) -> &Vec<serde_json::Value> {
    body["recommendations"]["workouts"].as_array().unwrap()
}

#[tokio::test]
async fn generate_without_schedule_defaults_to_three_meals() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/generate", user_id),
            json!({"date": DATE}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(diets(&body).len(), 3);
    assert_eq!(workouts(&body).len(), 0);

    let meal_types: Vec<&str> = diets(&body)
        .iter()
        .map(|d| d["meal_type"].as_str().unwrap())
        .collect();
    assert_eq!(meal_types, vec!["breakfast", "lunch", "dinner"]);
    assert!(diets(&body).iter().all(|d| d["confirmed"] == json!(false)));
}

#[tokio::test]
async fn workout_slot_comes_from_schedule_keywords() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;
    app.seed_workout("걷기", "medium", 120).await;
    app.seed_workout("자전거", "medium", 250).await;
    app.seed_schedule(user_id, DATE, "저녁 헬스").await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/generate", user_id),
            json!({"date": DATE, "progress": 70}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(workouts(&body).len(), 1);
    // Dinner slot inferred from the same title
    assert!(diets(&body)
        .iter()
        .any(|d| d["meal_type"] == json!("dinner")));
}

#[tokio::test]
async fn empty_catalog_falls_back_to_fixed_menu() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/generate", user_id),
            json!({"date": DATE}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(diets(&body).len(), 3);
    for diet in diets(&body) {
        assert_eq!(diet["menu"], json!("닭가슴살 샐러드"));
        assert_eq!(diet["calories"], json!(450));
        assert_eq!(diet["protein"], json!(30));
    }
}

#[tokio::test]
async fn regeneration_avoids_previous_combination() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;

    let path = format!("/api/v1/plan/{}/generate", user_id);
    let (_, first) = app.post(&path, json!({"date": DATE, "nonce": "a"})).await;
    let (status, second) = app.post(&path, json!({"date": DATE, "nonce": "b"})).await;

    assert_eq!(status, StatusCode::OK);
    let sig = |body: &serde_json::Value| -> Vec<(String, String)> {
        diets(body)
            .iter()
            .map(|d| {
                (
                    d["meal_type"].as_str().unwrap().to_string(),
                    d["menu"].as_str().unwrap().to_string(),
                )
            })
            .collect()
    };
    // Three slots with three candidates each: the retry loop must find a
    // different combination within its budget
    assert_ne!(sig(&first), sig(&second));
}

#[tokio::test]
async fn single_candidate_regeneration_still_succeeds() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_food("비빔밥", "lunch", 600, None).await;
    app.seed_schedule(user_id, DATE, "점심").await;

    let path = format!("/api/v1/plan/{}/generate", user_id);
    let (_, first) = app.post(&path, json!({"date": DATE})).await;
    let (status, second) = app.post(&path, json!({"date": DATE})).await;

    // Pool of one: same menu twice, but never an error
    assert_eq!(status, StatusCode::OK);
    assert_eq!(diets(&first).len(), 1);
    assert_eq!(diets(&second).len(), 1);
    assert_eq!(diets(&second)[0]["menu"], json!("비빔밥"));
}

#[tokio::test]
async fn dislikes_and_allergies_filter_candidates() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_food("새우 볶음밥", "lunch", 550, Some("갑각류")).await;
    app.seed_food("김치찌개", "lunch", 450, None).await;
    app.seed_food("두부 샐러드", "lunch", 300, None).await;
    app.seed_preferences(user_id, "", "김치", "갑각류").await;
    app.seed_schedule(user_id, DATE, "점심").await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/generate", user_id),
            json!({"date": DATE}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(diets(&body)[0]["menu"], json!("두부 샐러드"));
}

#[tokio::test]
async fn apply_copies_into_logs_and_confirms() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;
    app.seed_workout("걷기", "medium", 120).await;
    app.seed_schedule(user_id, DATE, "아침 운동").await;

    app.post(
        &format!("/api/v1/plan/{}/generate", user_id),
        json!({"date": DATE}),
    )
    .await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/apply", user_id),
            json!({"date": DATE}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"]["diet_logs"], json!(1));
    assert_eq!(body["applied"]["activity_logs"], json!(1));
    assert!(diets(&body).iter().all(|d| d["confirmed"] == json!(true)));
    assert!(workouts(&body).iter().all(|w| w["confirmed"] == json!(true)));

    let (_, meals) = app
        .get(&format!("/api/v1/logs/{}/meals?date={}", user_id, DATE))
        .await;
    let items = meals.as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["source"], json!("recommendation"));
}

#[tokio::test]
async fn reapply_is_a_no_op() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;

    let generate = format!("/api/v1/plan/{}/generate", user_id);
    let apply = format!("/api/v1/plan/{}/apply", user_id);
    app.post(&generate, json!({"date": DATE})).await;
    app.post(&apply, json!({"date": DATE})).await;

    let (status, body) = app.post(&apply, json!({"date": DATE})).await;

    // Confirmation is monotonic; nothing pending means zero counts
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied"]["diet_logs"], json!(0));
    assert_eq!(body["applied"]["activity_logs"], json!(0));

    let (_, meals) = app
        .get(&format!("/api/v1/logs/{}/meals?date={}", user_id, DATE))
        .await;
    assert_eq!(meals.as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn partial_apply_confirms_only_named_slots() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;

    app.post(
        &format!("/api/v1/plan/{}/generate", user_id),
        json!({"date": DATE}),
    )
    .await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/apply/partial", user_id),
            json!({"date": DATE, "meal_types": ["lunch"]}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["applied_count"], json!(1));

    let (_, plan) = app
        .get(&format!("/api/v1/plan/{}?date={}", user_id, DATE))
        .await;
    for diet in diets(&plan) {
        let expected = diet["meal_type"] == json!("lunch");
        assert_eq!(diet["confirmed"], json!(expected));
    }
}

#[tokio::test]
async fn invalid_date_is_rejected_with_code() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/generate", user_id),
            json!({"date": "15.03.2024"}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], json!("INVALID_DATE_FORMAT"));
}

#[tokio::test]
async fn alternate_date_formats_normalize() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;

    let (status, body) = app
        .post(
            &format!("/api/v1/plan/{}/generate", user_id),
            json!({"date": "15/03/2024"}),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], json!("2024-03-15"));
}

#[tokio::test]
async fn week_plan_is_monday_aligned_and_reuses_days() {
    let app = TestApp::new().await;
    let user_id = app.seed_user().await;
    app.seed_catalog().await;

    // 2024-03-15 is a Friday; prime that day with a plan first
    app.post(
        &format!("/api/v1/plan/{}/generate", user_id),
        json!({"date": DATE}),
    )
    .await;
    let (_, friday) = app
        .get(&format!("/api/v1/plan/{}?date={}", user_id, DATE))
        .await;

    let (status, week) = app
        .get(&format!("/api/v1/plan/{}/week?start={}", user_id, DATE))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(week["start"], json!("2024-03-11"));
    let days = week["days"].as_array().unwrap();
    assert_eq!(days.len(), 7);
    for day in days {
        assert!(!day["recommendations"]["diets"].as_array().unwrap().is_empty());
    }

    // The primed Friday was reused, not regenerated
    let friday_in_week = &days[4];
    assert_eq!(friday_in_week["date"], json!(DATE));
    assert_eq!(
        friday_in_week["recommendations"]["diets"],
        friday["recommendations"]["diets"]
    );
}
