use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// The five parts of a routine that carry a protocol reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Component {
    Supplements,
    Exercise,
    Diet,
    Sleep,
    Testing,
}

impl Component {
    pub const ALL: [Component; 5] = [
        Component::Supplements,
        Component::Exercise,
        Component::Diet,
        Component::Sleep,
        Component::Testing,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Component::Supplements => "supplements",
            Component::Exercise => "exercise",
            Component::Diet => "diet",
            Component::Sleep => "sleep",
            Component::Testing => "testing",
        }
    }

    /// `<protocol_url>#<component>`, used whenever no section matched.
    pub fn default_anchor(&self, protocol_url: &str) -> String {
        format!("{}#{}", protocol_url.trim_end_matches('/'), self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Supplement {
    pub name: String,
    pub dosage: String,
    pub timing: String,
    pub cost: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub daily: f64,
    pub monthly: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DietPlan {
    pub meals: Vec<String>,
    pub restrictions: Vec<String>,
    pub schedule: Vec<String>,
    pub estimated_cost: CostEstimate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExercisePlan {
    #[serde(rename = "type")]
    pub kind: String,
    pub frequency: String,
    pub duration: String,
    pub required_equipment: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepSchedule {
    pub bedtime: String,
    pub wake_time: String,
    /// Hours per night.
    pub sleep_goal: f64,
    pub required_items: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsConfig {
    pub track_weight: bool,
    pub track_sleep: bool,
    pub track_steps: bool,
    pub track_supplements: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
}

/// One link per component. A struct rather than a map so the key set is fixed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProtocolLinks {
    pub supplements: String,
    pub exercise: String,
    pub diet: String,
    pub sleep: String,
    pub testing: String,
}

#[cfg(test)]
impl ProtocolLinks {
    pub fn get(&self, component: Component) -> &str {
        match component {
            Component::Supplements => &self.supplements,
            Component::Exercise => &self.exercise,
            Component::Diet => &self.diet,
            Component::Sleep => &self.sleep,
            Component::Testing => &self.testing,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbeddedSection {
    pub title: String,
    pub content: String,
    pub url: String,
}

/// A generated routine before it has been assigned an id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineDraft {
    pub supplements: Vec<Supplement>,
    pub diet: DietPlan,
    pub exercise: ExercisePlan,
    pub sleep_schedule: SleepSchedule,
    pub metrics: MetricsConfig,
    pub protocol_links: ProtocolLinks,
    pub embedded_sections: Vec<EmbeddedSection>,
    pub focus_categories: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Routine {
    pub id: Uuid,
    pub user_id: Uuid,
    #[serde(flatten)]
    pub draft: RoutineDraft,
    pub created_at: DateTime<Utc>,
}

/// Storage shape of a routine; JSON parts live in JSONB columns.
#[derive(Debug, Clone, FromRow)]
pub struct RoutineRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub supplements: Json<Vec<Supplement>>,
    pub diet: Json<DietPlan>,
    pub exercise: Json<ExercisePlan>,
    pub sleep_schedule: Json<SleepSchedule>,
    pub metrics: Json<MetricsConfig>,
    pub protocol_links: Json<ProtocolLinks>,
    pub embedded_sections: Json<Vec<EmbeddedSection>>,
    pub focus_categories: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RoutineRow> for Routine {
    fn from(row: RoutineRow) -> Self {
        Routine {
            id: row.id,
            user_id: row.user_id,
            draft: RoutineDraft {
                supplements: row.supplements.0,
                diet: row.diet.0,
                exercise: row.exercise.0,
                sleep_schedule: row.sleep_schedule.0,
                metrics: row.metrics.0,
                protocol_links: row.protocol_links.0,
                embedded_sections: row.embedded_sections.0,
                focus_categories: row.focus_categories,
            },
            created_at: row.created_at,
        }
    }
}
