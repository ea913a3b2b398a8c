//! Nutrition goal storage
//!
//! Two tables back the effective-goal resolution: `diet_goals` holds
//! per-field overrides the user entered by hand, `user_nutrition_goal`
//! holds the last computed targets. Resolution happens in the goals
//! service, field by field.

use anyhow::Result;
use chrono::Utc;
use sqlx::SqlitePool;

/// Manual per-field overrides from `diet_goals`. Zero means "no
/// override" for the numeric fields.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct DietGoalOverrides {
    pub goal_type: Option<String>,
    pub target_calories: Option<i64>,
    pub target_protein: Option<i64>,
    pub target_activity_kcal: Option<i64>,
}

/// Last computed nutrition targets.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NutritionGoalRow {
    pub goal_type: String,
    pub calories: i64,
    pub protein: i64,
    pub activity_kcal: i64,
    pub updated_at: chrono::DateTime<Utc>,
}

/// Repository for goal rows
pub struct GoalRepository;

impl GoalRepository {
    /// The user's manual goal overrides, if any.
    pub async fn find_overrides(db: &SqlitePool, user_id: i64) -> Result<DietGoalOverrides> {
        let row = sqlx::query_as::<_, DietGoalOverrides>(
            r#"
            SELECT goal_type, target_calories, target_protein, target_activity_kcal
            FROM diet_goals
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row.unwrap_or_default())
    }

    /// Insert or overwrite the user's manual goal overrides.
    pub async fn upsert_overrides(
        db: &SqlitePool,
        user_id: i64,
        overrides: &DietGoalOverrides,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO diet_goals
                (user_id, goal_type, target_calories, target_protein,
                 target_activity_kcal, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                goal_type = excluded.goal_type,
                target_calories = excluded.target_calories,
                target_protein = excluded.target_protein,
                target_activity_kcal = excluded.target_activity_kcal,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(&overrides.goal_type)
        .bind(overrides.target_calories)
        .bind(overrides.target_protein)
        .bind(overrides.target_activity_kcal)
        .bind(Utc::now())
        .execute(db)
        .await?;

        Ok(())
    }

    /// Insert or overwrite the computed nutrition targets for a user.
    pub async fn upsert_targets(
        db: &SqlitePool,
        user_id: i64,
        goal_type: &str,
        calories: i64,
        protein: i64,
        activity_kcal: i64,
    ) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO user_nutrition_goal
                (user_id, goal_type, calories, protein, activity_kcal, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            ON CONFLICT(user_id) DO UPDATE SET
                goal_type = excluded.goal_type,
                calories = excluded.calories,
                protein = excluded.protein,
                activity_kcal = excluded.activity_kcal,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(user_id)
        .bind(goal_type)
        .bind(calories)
        .bind(protein)
        .bind(activity_kcal)
        .bind(Utc::now())
        .execute(db)
        .await?;

        Ok(())
    }

    /// The user's computed nutrition targets, if they were ever refreshed.
    pub async fn find_targets(db: &SqlitePool, user_id: i64) -> Result<Option<NutritionGoalRow>> {
        let row = sqlx::query_as::<_, NutritionGoalRow>(
            r#"
            SELECT goal_type, calories, protein, activity_kcal, updated_at
            FROM user_nutrition_goal
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }
}
