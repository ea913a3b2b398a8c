//! Meal and activity log storage
//!
//! Meal items hang off a per-day `today_meals` container row; activities
//! are standalone rows keyed by their `completed_at` timestamp. Insert
//! operations take `&mut SqliteConnection` so plan application can write
//! logs and flip confirmations in one transaction.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

/// A logged meal item.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct MealItemRow {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub meal_type: String,
    pub food_name: String,
    pub calories: i64,
    pub protein: i64,
    pub source: String,
    pub created_at: DateTime<Utc>,
}

/// A logged activity.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ActivityRow {
    pub id: i64,
    pub user_id: i64,
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
    pub intensity: String,
    pub source: String,
    pub completed_at: String,
}

/// Input for inserting a meal item.
#[derive(Debug, Clone)]
pub struct NewMealItem {
    pub meal_type: String,
    pub food_name: String,
    pub calories: i64,
    pub protein: i64,
    pub source: String,
}

/// Input for inserting an activity.
#[derive(Debug, Clone)]
pub struct NewActivity {
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
    pub intensity: String,
    pub source: String,
    pub completed_at: String,
}

/// Repository for meal logging
pub struct MealLogRepository;

impl MealLogRepository {
    /// Find or create the day's meal container, returning its id.
    pub async fn ensure_container(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<i64> {
        let existing: Option<(i64,)> =
            sqlx::query_as("SELECT id FROM today_meals WHERE user_id = ? AND date = ?")
                .bind(user_id)
                .bind(date)
                .fetch_optional(&mut *conn)
                .await?;

        if let Some((id,)) = existing {
            return Ok(id);
        }

        let result = sqlx::query(
            "INSERT INTO today_meals (user_id, date, created_at) VALUES (?, ?, ?)",
        )
        .bind(user_id)
        .bind(date)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert a meal item under the given container, returning its id.
    pub async fn insert_item(
        conn: &mut SqliteConnection,
        container_id: i64,
        user_id: i64,
        date: NaiveDate,
        item: &NewMealItem,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO today_meal_items
                (today_meal_id, user_id, date, meal_type, food_name, calories, protein, source, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(container_id)
        .bind(user_id)
        .bind(date)
        .bind(&item.meal_type)
        .bind(&item.food_name)
        .bind(item.calories)
        .bind(item.protein)
        .bind(&item.source)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Look up a meal item owned by the user.
    pub async fn find_item(
        db: &SqlitePool,
        user_id: i64,
        item_id: i64,
    ) -> Result<Option<MealItemRow>> {
        let row = sqlx::query_as::<_, MealItemRow>(
            r#"
            SELECT id, user_id, date, meal_type, food_name, calories, protein, source, created_at
            FROM today_meal_items
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(item_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Delete a meal item owned by the user. Returns false when no such
    /// item exists.
    pub async fn delete_item(db: &SqlitePool, user_id: i64, item_id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM today_meal_items WHERE id = ? AND user_id = ?")
            .bind(item_id)
            .bind(user_id)
            .execute(db)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    /// List the day's meal items in insertion order.
    pub async fn list_by_date(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<MealItemRow>> {
        let rows = sqlx::query_as::<_, MealItemRow>(
            r#"
            SELECT id, user_id, date, meal_type, food_name, calories, protein, source, created_at
            FROM today_meal_items
            WHERE user_id = ? AND date = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Sum of logged meal calories for the day.
    pub async fn calories_on(db: &SqlitePool, user_id: i64, date: NaiveDate) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(calories), 0)
            FROM today_meal_items
            WHERE user_id = ? AND date = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;

        Ok(total)
    }
}

/// Repository for activity logging
pub struct ActivityRepository;

impl ActivityRepository {
    /// Insert an activity row, returning its id.
    pub async fn insert(
        conn: &mut SqliteConnection,
        user_id: i64,
        activity: &NewActivity,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO activities
                (user_id, workout, duration, calories, intensity, source, completed_at, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(user_id)
        .bind(&activity.workout)
        .bind(activity.duration)
        .bind(activity.calories)
        .bind(&activity.intensity)
        .bind(&activity.source)
        .bind(&activity.completed_at)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Look up an activity owned by the user.
    pub async fn find(
        db: &SqlitePool,
        user_id: i64,
        activity_id: i64,
    ) -> Result<Option<ActivityRow>> {
        let row = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, user_id, workout, duration, calories, intensity, source, completed_at
            FROM activities
            WHERE id = ? AND user_id = ?
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }

    /// Delete an activity owned by the user. Returns false when no such
    /// activity exists.
    pub async fn delete(db: &SqlitePool, user_id: i64, activity_id: i64) -> Result<bool> {
        let affected = sqlx::query("DELETE FROM activities WHERE id = ? AND user_id = ?")
            .bind(activity_id)
            .bind(user_id)
            .execute(db)
            .await?
            .rows_affected();

        Ok(affected > 0)
    }

    /// List activities completed on the given calendar day.
    pub async fn list_on(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ActivityRow>> {
        let rows = sqlx::query_as::<_, ActivityRow>(
            r#"
            SELECT id, user_id, workout, duration, calories, intensity, source, completed_at
            FROM activities
            WHERE user_id = ? AND DATE(completed_at) = ?
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(db)
        .await?;

        Ok(rows)
    }

    /// Sum of activity calories completed on the given calendar day.
    pub async fn calories_on(db: &SqlitePool, user_id: i64, date: NaiveDate) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(calories), 0)
            FROM activities
            WHERE user_id = ? AND DATE(completed_at) = ?
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;

        Ok(total)
    }
}
