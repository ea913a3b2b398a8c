//! User profile and food preference queries

use anyhow::Result;
use sqlx::SqlitePool;

/// Body metrics and goal settings stored on the user record.
///
/// Every field except the id is optional: the plan engine and the
/// calorie engine each substitute their own defaults for missing data.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserProfileRow {
    pub id: i64,
    pub name: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub age: Option<i64>,
    pub sex: Option<String>,
    pub activity_level: Option<String>,
    pub goal: Option<String>,
}

/// Comma-separated preference lists, matched as substrings against
/// food names and allergy tags.
#[derive(Debug, Clone, Default, sqlx::FromRow)]
pub struct FoodPreferencesRow {
    pub likes: Option<String>,
    pub dislikes: Option<String>,
    pub allergies: Option<String>,
}

impl FoodPreferencesRow {
    fn split(field: &Option<String>) -> Vec<String> {
        field
            .as_deref()
            .unwrap_or("")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn liked(&self) -> Vec<String> {
        Self::split(&self.likes)
    }

    pub fn disliked(&self) -> Vec<String> {
        Self::split(&self.dislikes)
    }

    pub fn allergens(&self) -> Vec<String> {
        Self::split(&self.allergies)
    }
}

/// Repository for user profile operations
pub struct UserRepository;

impl UserRepository {
    /// Find a user's profile by id
    pub async fn find_profile(db: &SqlitePool, user_id: i64) -> Result<Option<UserProfileRow>> {
        let row = sqlx::query_as::<_, UserProfileRow>(
            r#"
            SELECT id, name, height, weight, age, sex, activity_level, goal
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row)
    }
}

/// Repository for food preference lookups
pub struct PreferenceRepository;

impl PreferenceRepository {
    /// Load a user's food preferences, falling back to empty lists when
    /// no preference row exists.
    pub async fn find(db: &SqlitePool, user_id: i64) -> Result<FoodPreferencesRow> {
        let row = sqlx::query_as::<_, FoodPreferencesRow>(
            r#"
            SELECT likes, dislikes, allergies
            FROM food_preferences
            WHERE user_id = ?
            "#,
        )
        .bind(user_id)
        .fetch_optional(db)
        .await?;

        Ok(row.unwrap_or_default())
    }
}
