//! Schedule storage

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::SqlitePool;

/// A stored schedule entry.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ScheduleRow {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    pub memo: String,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a schedule entry.
#[derive(Debug, Clone)]
pub struct NewSchedule {
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub title: String,
    pub memo: String,
}

/// Repository for schedule operations
pub struct ScheduleRepository;

impl ScheduleRepository {
    /// Insert a schedule entry, returning its id.
    pub async fn create(db: &SqlitePool, user_id: i64, schedule: &NewSchedule) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO schedules (user_id, date, start_time, end_time, title, memo, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(schedule.date)
        .bind(&schedule.start_time)
        .bind(&schedule.end_time)
        .bind(&schedule.title)
        .bind(&schedule.memo)
        .bind(Utc::now())
        .execute(db)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// A day's schedule entries ordered by start time.
    pub async fn list_by_date(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ScheduleRow>> {
        let rows = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT id, user_id, date, start_time, end_time, title, memo, created_at
            FROM schedules
            WHERE user_id = ? AND date = ?
            ORDER BY start_time ASC, id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Look up a schedule entry owned by the user.
    pub async fn find(
        db: &SqlitePool,
        user_id: i64,
        schedule_id: i64,
    ) -> Result<Option<ScheduleRow>> {
        let row = sqlx::query_as::<_, ScheduleRow>(
            r#"
            SELECT id, user_id, date, start_time, end_time, title, memo, created_at
            FROM schedules
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(schedule_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Delete a schedule entry owned by the user. Returns false when no
    /// such entry exists.
    pub async fn delete(db: &SqlitePool, user_id: i64, schedule_id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM schedules WHERE id = ? AND user_id = ?")
            .bind(schedule_id)
            .bind(user_id)
            .execute(db)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }
}
