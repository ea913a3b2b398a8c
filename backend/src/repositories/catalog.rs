//! Food and workout catalog queries
//!
//! The catalogs are read-only pools the recommendation selectors draw
//! from. Preference filtering happens in the service layer, where the
//! hard and soft filter rules live together.

use anyhow::Result;
use fitplan_shared::types::{Intensity, MealType};
use sqlx::SqlitePool;

/// A food row eligible for recommendation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct FoodCandidate {
    pub id: i64,
    pub name: String,
    pub meal_type: String,
    pub calories: i64,
    pub protein: i64,
    pub allergy: Option<String>,
}

/// A workout row eligible for recommendation.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WorkoutCandidate {
    pub id: i64,
    pub name: String,
    pub duration: i64,
    pub calories: i64,
    pub intensity: String,
}

/// Repository for the food catalog
pub struct FoodCatalogRepository;

impl FoodCatalogRepository {
    /// All foods registered for a meal slot, ordered for deterministic
    /// seeded selection.
    pub async fn by_meal_type(db: &SqlitePool, meal_type: MealType) -> Result<Vec<FoodCandidate>> {
        let rows = sqlx::query_as::<_, FoodCandidate>(
            r#"
            SELECT id, name, meal_type, calories, protein, allergy
            FROM foods
            WHERE meal_type = ?
            ORDER BY id ASC
            "#,
        )
        .bind(meal_type.as_str())
        .fetch_all(db)
        .await?;

        Ok(rows)
    }
}

/// Repository for the workout catalog
pub struct WorkoutCatalogRepository;

impl WorkoutCatalogRepository {
    /// All workouts at the given intensity, ordered for deterministic
    /// seeded selection.
    pub async fn by_intensity(
        db: &SqlitePool,
        intensity: Intensity,
    ) -> Result<Vec<WorkoutCandidate>> {
        let rows = sqlx::query_as::<_, WorkoutCandidate>(
            r#"
            SELECT id, name, duration, calories, intensity
            FROM workouts
            WHERE intensity = ?
            ORDER BY id ASC
            "#,
        )
        .bind(intensity.as_str())
        .fetch_all(db)
        .await?;

        Ok(rows)
    }
}
