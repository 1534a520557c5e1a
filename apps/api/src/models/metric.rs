use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A single day's tracking entry. Samples are append-only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MetricSample {
    pub id: Uuid,
    pub user_id: Uuid,
    pub date: DateTime<Utc>,
    pub weight: Option<i32>,
    pub sleep_hours: Option<i32>,
    pub steps: Option<i32>,
    pub supplements: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewMetricSample {
    pub date: Option<DateTime<Utc>>,
    pub weight: Option<i32>,
    pub sleep_hours: Option<i32>,
    pub steps: Option<i32>,
    pub supplements: Option<Vec<String>>,
}
