use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct PlantRequirements {
    pub scientific_name: String,
    pub family: String,
    pub common_names: Vec<String>,
    pub temperature_range: String,
    pub humidity_level: String,
    pub water_frequency: String,
}

impl PlantRequirements {
    pub fn display_name(&self) -> &str {
        self.common_names
            .first()
            .map(String::as_str)
            .unwrap_or(&self.scientific_name)
    }
}

#[derive(Debug, Clone)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    pub humidity: f64,
    pub conditions: String,
}

#[derive(Debug, Clone)]
pub struct CareHistory {
    pub last_watered: Option<DateTime<Utc>>,
    pub is_in_sun: bool,
}

#[derive(Debug, Clone)]
pub struct GardenEntry {
    pub id: Uuid,
    pub nickname: String,
    pub plant: PlantRequirements,
    pub history: CareHistory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Health {
    Optimal,
    NeedsAttention,
    Thirsty,
    /// No weather reading was available, so nothing was evaluated.
    Unknown,
}

impl std::fmt::Display for Health {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Health::Optimal => "Optimal",
            Health::NeedsAttention => "Needs attention",
            Health::Thirsty => "Thirsty",
            Health::Unknown => "Unknown",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NextActions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub water_in: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CareStatus {
    pub health: Health,
    pub alerts: Vec<String>,
    pub next_actions: NextActions,
}

impl CareStatus {
    /// Status for a garden entry that could not be evaluated.
    pub fn pending() -> Self {
        CareStatus {
            health: Health::Unknown,
            alerts: Vec::new(),
            next_actions: NextActions::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CareAction {
    Water,
    SunStart,
    SunEnd,
}

impl CareAction {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "water" => Some(CareAction::Water),
            "sun-start" | "sun_start" => Some(CareAction::SunStart),
            "sun-end" | "sun_end" => Some(CareAction::SunEnd),
            _ => None,
        }
    }
}
