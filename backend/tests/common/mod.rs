//! Common test utilities for integration tests
//!
//! Tests run against an in-memory SQLite database; one connection keeps
//! the database alive for the lifetime of the pool.

use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use fitplan_backend::{config::AppConfig, routes, state::AppState};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tower::ServiceExt;

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub pool: SqlitePool,
}

impl TestApp {
    /// Create a new test application over a fresh in-memory database
    pub async fn new() -> Self {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to open in-memory database");

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .expect("Failed to run migrations");

        let state = AppState::new(pool.clone(), AppConfig::default());
        let app = routes::create_router(state);

        Self { app, pool }
    }

    async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            serde_json::Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
        };

        (status, json)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Make a POST request with JSON body
    pub async fn post(&self, path: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(path)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("DELETE")
            .uri(path)
            .body(Body::empty())
            .unwrap();
        self.send(request).await
    }

    /// Insert a user with full body metrics, returning its id
    pub async fn seed_user(&self) -> i64 {
        sqlx::query(
            r#"
            INSERT INTO users (email, name, height, weight, age, sex, activity_level, goal)
            VALUES ('tester@example.com', '테스터', 175.0, 70.0, 30, 'male', 'low', 'loss')
            "#,
        )
        .execute(&self.pool)
        .await
        .unwrap()
        .last_insert_rowid()
    }

    /// Insert a user with no body metrics, returning its id
    pub async fn seed_bare_user(&self) -> i64 {
        sqlx::query("INSERT INTO users (email) VALUES ('bare@example.com')")
            .execute(&self.pool)
            .await
            .unwrap()
            .last_insert_rowid()
    }

    /// Insert a food candidate
    pub async fn seed_food(&self, name: &str, meal_type: &str, calories: i64, allergy: Option<&str>) {
        sqlx::query(
            "INSERT INTO foods (name, meal_type, calories, protein, allergy) VALUES (?, ?, ?, 20, ?)",
        )
        .bind(name)
        .bind(meal_type)
        .bind(calories)
        .bind(allergy)
        .execute(&self.pool)
        .await
        .unwrap();
    }

    /// Seed a small catalog covering breakfast/lunch/dinner
    pub async fn seed_catalog(&self) {
        for meal in ["breakfast", "lunch", "dinner"] {
            self.seed_food(&format!("{}-오트밀", meal), meal, 400, None).await;
            self.seed_food(&format!("{}-샐러드", meal), meal, 350, None).await;
            self.seed_food(&format!("{}-볶음밥", meal), meal, 600, None).await;
        }
    }

    /// Insert a workout candidate
    pub async fn seed_workout(&self, name: &str, intensity: &str, calories: i64) {
        sqlx::query(
            "INSERT INTO workouts (name, duration, calories, intensity) VALUES (?, 30, ?, ?)",
        )
        .bind(name)
        .bind(calories)
        .bind(intensity)
        .execute(&self.pool)
        .await
        .unwrap();
    }

    /// Insert food preferences for a user
    pub async fn seed_preferences(
        &self,
        user_id: i64,
        likes: &str,
        dislikes: &str,
        allergies: &str,
    ) {
        sqlx::query(
            "INSERT INTO food_preferences (user_id, likes, dislikes, allergies) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(likes)
        .bind(dislikes)
        .bind(allergies)
        .execute(&self.pool)
        .await
        .unwrap();
    }

    /// Insert a schedule entry directly
    pub async fn seed_schedule(&self, user_id: i64, date: &str, title: &str) {
        sqlx::query(
            r#"
            INSERT INTO schedules (user_id, date, start_time, end_time, title, memo, created_at)
            VALUES (?, ?, '09:00', '10:00', ?, '', ?)
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(title)
        .bind(chrono::Utc::now())
        .execute(&self.pool)
        .await
        .unwrap();
    }
}
