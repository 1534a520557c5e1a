use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::routine::{
    CostEstimate, DietPlan, ExercisePlan, MetricsConfig, SleepSchedule, Supplement,
};

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Failed to read template {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid template JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Fixed routine content. References are left unset here; the generator
/// fills them from the matched sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutineTemplate {
    pub supplements: Vec<Supplement>,
    pub diet: DietPlan,
    pub exercise: ExercisePlan,
    pub sleep_schedule: SleepSchedule,
    pub metrics: MetricsConfig,
    /// Extra supplements keyed by protocol category, appended when the user's
    /// answers map to that category.
    #[serde(default)]
    pub supplement_addons: BTreeMap<String, Vec<Supplement>>,
}

impl RoutineTemplate {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, TemplateError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(serde_json::from_str(&raw)?)
    }
}

fn supplement(name: &str, dosage: &str, timing: &str, cost: f64) -> Supplement {
    Supplement {
        name: name.to_string(),
        dosage: dosage.to_string(),
        timing: timing.to_string(),
        cost,
        reference: None,
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

impl Default for RoutineTemplate {
    fn default() -> Self {
        Self {
            supplements: vec![
                supplement("Vitamin D3", "2,000 IU", "Morning", 30.0),
                supplement("Omega-3", "2g EPA, 1g DHA", "With meals", 45.0),
            ],
            diet: DietPlan {
                meals: strings(&[
                    "Green Giant (morning smoothie)",
                    "Nutty Pudding breakfast",
                    "Super Veggie lunch",
                ]),
                restrictions: strings(&[
                    "No food 3 hours before bedtime",
                    "Vegan except for specific supplements",
                ]),
                schedule: strings(&["Breakfast 6am", "Lunch 11am", "Dinner 4pm"]),
                estimated_cost: CostEstimate {
                    daily: 50.0,
                    monthly: 1500.0,
                },
                reference: None,
            },
            exercise: ExercisePlan {
                kind: "Zone 2 cardio + strength training".to_string(),
                frequency: "Daily".to_string(),
                duration: "1 hour".to_string(),
                required_equipment: strings(&["Weights", "Heart rate monitor"]),
                reference: None,
            },
            sleep_schedule: SleepSchedule {
                bedtime: "20:30".to_string(),
                wake_time: "05:30".to_string(),
                sleep_goal: 8.0,
                required_items: strings(&["Blackout curtains", "Sleep mask"]),
                reference: None,
            },
            metrics: MetricsConfig {
                track_weight: true,
                track_sleep: true,
                track_steps: true,
                track_supplements: true,
                reference: None,
            },
            supplement_addons: BTreeMap::new(),
        }
    }
}
