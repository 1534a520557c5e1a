use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// One titled block of the protocol page, tagged with the categories it covers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSection {
    pub section_id: String,
    pub title: String,
    pub content: String,
    pub categories: Vec<String>,
    pub url: String,
    /// Unset until the section has been persisted.
    pub created_at: Option<DateTime<Utc>>,
}

impl ReferenceSection {
    pub fn has_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }
}
