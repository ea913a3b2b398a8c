//! Calorie summary storage
//!
//! One summary row per user/date, overwritten on every recompute. The
//! UNIQUE(user_id, date) constraint backs the upsert.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

/// A stored daily calorie summary.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct CalorieSummaryRow {
    pub user_id: i64,
    pub date: NaiveDate,
    pub bmr: f64,
    pub tdee: f64,
    pub intake: f64,
    pub exercise: f64,
    pub deficit: f64,
    pub est_weight_change_kg: f64,
    pub updated_at: DateTime<Utc>,
}

/// Computed values to persist, already rounded for storage.
#[derive(Debug, Clone)]
pub struct NewCalorieSummary {
    pub bmr: f64,
    pub tdee: f64,
    pub intake: f64,
    pub exercise: f64,
    pub deficit: f64,
    pub est_weight_change_kg: f64,
}

/// Repository for calorie summaries
pub struct SummaryRepository;

impl SummaryRepository {
    /// Insert or overwrite the summary for a user/date.
    pub async fn upsert(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
        summary: &NewCalorieSummary,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO calorie_summaries
                (user_id, date, bmr, tdee, intake, exercise, deficit, est_weight_change_kg, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id, date) DO UPDATE SET
                bmr = excluded.bmr,
                tdee = excluded.tdee,
                intake = excluded.intake,
                exercise = excluded.exercise,
                deficit = excluded.deficit,
                est_weight_change_kg = excluded.est_weight_change_kg,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(summary.bmr)
        .bind(summary.tdee)
        .bind(summary.intake)
        .bind(summary.exercise)
        .bind(summary.deficit)
        .bind(summary.est_weight_change_kg)
        .bind(Utc::now())
        .execute(db)
        .await?;

        Ok(())
    }

    /// Load the stored summary for a user/date, if any.
    pub async fn find(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Option<CalorieSummaryRow>> {
        let row = sqlx::query_as::<_, CalorieSummaryRow>(
            r#"
            SELECT user_id, date, bmr, tdee, intake, exercise, deficit,
                   est_weight_change_kg, updated_at
            FROM calorie_summaries
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }
}
