//! Meal models for the API service

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// A logged meal, owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    /// Whether the meal was compliant with the diet
    pub permitted: bool,
    /// When the meal was eaten
    pub occurred_at: DateTime<Utc>,
    /// When the meal was recorded
    pub created_at: DateTime<Utc>,
}

/// The mutable fields of a meal, already validated.
///
/// Create and update take the same shape: an update overwrites all four.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealInput {
    pub name: String,
    pub description: String,
    pub permitted: bool,
    pub occurred_at: DateTime<Utc>,
}

/// Meal as rendered to clients
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MealResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub description: String,
    pub permitted: bool,
    pub date_and_hour: DateTime<Utc>,
}

impl From<Meal> for MealResponse {
    fn from(meal: Meal) -> Self {
        Self {
            id: meal.id,
            user_id: meal.user_id,
            name: meal.name,
            description: meal.description,
            permitted: meal.permitted,
            date_and_hour: meal.occurred_at,
        }
    }
}

/// Response for meal listing
#[derive(Debug, Serialize)]
pub struct MealListResponse {
    pub meals: Vec<MealResponse>,
}

/// Response for a single meal
#[derive(Debug, Serialize)]
pub struct MealEnvelope {
    pub meal: MealResponse,
}
