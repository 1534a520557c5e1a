use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

const MAX_AGE: i32 = 130;

/// Questionnaire answers as submitted by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub name: String,
    pub age: i32,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub gender: String,
    #[serde(default)]
    pub improvement_areas: Vec<String>,
    pub budget: String,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub current_health: Vec<String>,
}

impl NewUser {
    /// Rejects submissions that cannot describe a person. Tag values are never checked.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name cannot be empty".to_string()));
        }
        if !(1..=MAX_AGE).contains(&self.age) {
            return Err(AppError::Validation(format!(
                "age must be between 1 and {MAX_AGE}"
            )));
        }
        Ok(())
    }

    pub fn preference_tags(&self) -> PreferenceTags<'_> {
        PreferenceTags {
            improvement_areas: &self.improvement_areas,
            equipment: &self.equipment,
            current_health: &self.current_health,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub weight: Option<i32>,
    pub height: Option<i32>,
    pub gender: String,
    pub improvement_areas: Vec<String>,
    pub budget: String,
    pub equipment: Vec<String>,
    pub current_health: Vec<String>,
    pub created_at: DateTime<Utc>,
}

/// The subset of a user's answers the matcher looks at.
#[derive(Debug, Clone, Copy)]
pub struct PreferenceTags<'a> {
    pub improvement_areas: &'a [String],
    pub equipment: &'a [String],
    pub current_health: &'a [String],
}

#[cfg(test)]
impl PreferenceTags<'static> {
    pub const EMPTY: Self = PreferenceTags {
        improvement_areas: &[],
        equipment: &[],
        current_health: &[],
    };
}
