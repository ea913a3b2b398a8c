//! Recommendation row storage
//!
//! Diet and workout recommendations are written with `confirmed = 0`
//! and flipped to `confirmed = 1` exactly once, when the plan (or a
//! slice of it) is applied into the logs. Write operations take a
//! `&mut SqliteConnection` so the plan service can keep replace-set
//! and apply flows inside a single transaction.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};

/// A stored diet recommendation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DietRecommendation {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub meal_type: String,
    pub menu: String,
    pub calories: i64,
    pub protein: i64,
    pub created_at: DateTime<Utc>,
    pub confirmed: bool,
}

/// A stored workout recommendation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutRecommendation {
    pub id: i64,
    pub user_id: i64,
    pub date: NaiveDate,
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
    pub created_at: DateTime<Utc>,
    pub confirmed: bool,
}

/// Input for inserting a diet recommendation.
#[derive(Debug, Clone)]
pub struct NewDietRecommendation {
    pub meal_type: String,
    pub menu: String,
    pub calories: i64,
    pub protein: i64,
}

/// Input for inserting a workout recommendation.
#[derive(Debug, Clone)]
pub struct NewWorkoutRecommendation {
    pub workout: String,
    pub duration: i64,
    pub calories: i64,
}

/// Repository for recommendation rows
pub struct RecommendationRepository;

impl RecommendationRepository {
    /// Delete every recommendation (diet and workout, confirmed or not)
    /// for a user/date. Part of the replace-set transaction.
    pub async fn delete_for_date(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<()> {
        sqlx::query("DELETE FROM diet_recommendations WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date)
            .execute(&mut *conn)
            .await?;

        sqlx::query("DELETE FROM workout_recommendations WHERE user_id = ? AND date = ?")
            .bind(user_id)
            .bind(date)
            .execute(&mut *conn)
            .await?;

        Ok(())
    }

    /// Insert an unconfirmed diet recommendation, returning its id.
    pub async fn insert_diet(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
        rec: &NewDietRecommendation,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO diet_recommendations
                (user_id, date, meal_type, menu, calories, protein, created_at, confirmed)
            VALUES (?, ?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(&rec.meal_type)
        .bind(&rec.menu)
        .bind(rec.calories)
        .bind(rec.protein)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// Insert an unconfirmed workout recommendation, returning its id.
    pub async fn insert_workout(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
        rec: &NewWorkoutRecommendation,
    ) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO workout_recommendations
                (user_id, date, workout, duration, calories, created_at, confirmed)
            VALUES (?, ?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(user_id)
        .bind(date)
        .bind(&rec.workout)
        .bind(rec.duration)
        .bind(rec.calories)
        .bind(Utc::now())
        .execute(conn)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List diet recommendations for a user/date in insertion order.
    pub async fn list_diets(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
        include_confirmed: bool,
    ) -> Result<Vec<DietRecommendation>> {
        let sql = if include_confirmed {
            r#"
            SELECT id, user_id, date, meal_type, menu, calories, protein, created_at, confirmed
            FROM diet_recommendations
            WHERE user_id = ? AND date = ?
            ORDER BY id ASC
            "#
        } else {
            r#"
            SELECT id, user_id, date, meal_type, menu, calories, protein, created_at, confirmed
            FROM diet_recommendations
            WHERE user_id = ? AND date = ? AND confirmed = 0
            ORDER BY id ASC
            "#
        };

        let rows = sqlx::query_as::<_, DietRecommendation>(sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(db)
            .await?;

        Ok(rows)
    }

    /// List workout recommendations for a user/date in insertion order.
    pub async fn list_workouts(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
        include_confirmed: bool,
    ) -> Result<Vec<WorkoutRecommendation>> {
        let sql = if include_confirmed {
            r#"
            SELECT id, user_id, date, workout, duration, calories, created_at, confirmed
            FROM workout_recommendations
            WHERE user_id = ? AND date = ?
            ORDER BY id ASC
            "#
        } else {
            r#"
            SELECT id, user_id, date, workout, duration, calories, created_at, confirmed
            FROM workout_recommendations
            WHERE user_id = ? AND date = ? AND confirmed = 0
            ORDER BY id ASC
            "#
        };

        let rows = sqlx::query_as::<_, WorkoutRecommendation>(sql)
            .bind(user_id)
            .bind(date)
            .fetch_all(db)
            .await?;

        Ok(rows)
    }

    /// List unconfirmed diet recommendations inside a transaction.
    pub async fn list_unconfirmed_diets(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<DietRecommendation>> {
        let rows = sqlx::query_as::<_, DietRecommendation>(
            r#"
            SELECT id, user_id, date, meal_type, menu, calories, protein, created_at, confirmed
            FROM diet_recommendations
            WHERE user_id = ? AND date = ? AND confirmed = 0
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(rows)
    }

    /// List unconfirmed workout recommendations inside a transaction.
    pub async fn list_unconfirmed_workouts(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<WorkoutRecommendation>> {
        let rows = sqlx::query_as::<_, WorkoutRecommendation>(
            r#"
            SELECT id, user_id, date, workout, duration, calories, created_at, confirmed
            FROM workout_recommendations
            WHERE user_id = ? AND date = ? AND confirmed = 0
            ORDER BY id ASC
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_all(conn)
        .await?;

        Ok(rows)
    }

    /// Mark every unconfirmed recommendation for a user/date as
    /// confirmed. Returns the number of rows flipped.
    pub async fn confirm_unconfirmed(
        conn: &mut SqliteConnection,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<u64> {
        let diets = sqlx::query(
            "UPDATE diet_recommendations SET confirmed = 1 WHERE user_id = ? AND date = ? AND confirmed = 0",
        )
        .bind(user_id)
        .bind(date)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        let workouts = sqlx::query(
            "UPDATE workout_recommendations SET confirmed = 1 WHERE user_id = ? AND date = ? AND confirmed = 0",
        )
        .bind(user_id)
        .bind(date)
        .execute(&mut *conn)
        .await?
        .rows_affected();

        Ok(diets + workouts)
    }

    /// Confirm a specific set of diet recommendation rows.
    pub async fn confirm_diets_by_ids(
        conn: &mut SqliteConnection,
        user_id: i64,
        ids: &[i64],
    ) -> Result<u64> {
        let mut flipped = 0;
        for id in ids {
            flipped += sqlx::query(
                "UPDATE diet_recommendations SET confirmed = 1 WHERE id = ? AND user_id = ? AND confirmed = 0",
            )
            .bind(id)
            .bind(user_id)
            .execute(&mut *conn)
            .await?
            .rows_affected();
        }

        Ok(flipped)
    }

    /// Sum of calories across unconfirmed diet recommendations.
    pub async fn unconfirmed_diet_calories(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(calories), 0)
            FROM diet_recommendations
            WHERE user_id = ? AND date = ? AND confirmed = 0
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;

        Ok(total)
    }

    /// Sum of calories across unconfirmed workout recommendations.
    pub async fn unconfirmed_workout_calories(
        db: &SqlitePool,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<i64> {
        let (total,): (i64,) = sqlx::query_as(
            r#"
            SELECT COALESCE(SUM(calories), 0)
            FROM workout_recommendations
            WHERE user_id = ? AND date = ? AND confirmed = 0
            "#,
        )
        .bind(user_id)
        .bind(date)
        .fetch_one(db)
        .await?;

        Ok(total)
    }
}
