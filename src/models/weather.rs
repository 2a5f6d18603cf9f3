use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Stage {
    BudBreak,
    Bloom,
    FruitSet,
    FruitGrowth,
    PreHarvest,
}

impl Stage {
    /// Season order
    pub const ALL: [Stage; 5] = [
        Stage::BudBreak,
        Stage::Bloom,
        Stage::FruitSet,
        Stage::FruitGrowth,
        Stage::PreHarvest,
    ];

    /// Label as it appears in season records
    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::BudBreak => "Bud Break",
            Stage::Bloom => "Bloom",
            Stage::FruitSet => "Fruit Set",
            Stage::FruitGrowth => "Fruit Growth",
            Stage::PreHarvest => "Pre-Harvest",
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One day of a growing season.
///
/// `stage` stays a free-form string: records may carry stages the rules
/// never look at, and matching is by exact label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherDay {
    pub day: u32,
    pub stage: String,
    pub temperature_celsius: f64,
    pub rainfall_mm: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frost_occurred: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wind_speed_kmh: Option<f64>,
}

impl WeatherDay {
    pub fn new(day: u32, stage: Stage, temperature_celsius: f64, rainfall_mm: f64) -> Self {
        Self {
            day,
            stage: stage.as_str().to_string(),
            temperature_celsius,
            rainfall_mm,
            frost_occurred: None,
            wind_speed_kmh: None,
        }
    }

    pub fn with_frost(mut self, frost: bool) -> Self {
        self.frost_occurred = Some(frost);
        self
    }

    pub fn with_wind(mut self, wind_speed_kmh: f64) -> Self {
        self.wind_speed_kmh = Some(wind_speed_kmh);
        self
    }

    pub fn is_stage(&self, stage: Stage) -> bool {
        self.stage == stage.as_str()
    }

    pub fn had_frost(&self) -> bool {
        self.frost_occurred.unwrap_or(false)
    }

    /// True only when wind was recorded and exceeds `threshold_kmh`
    pub fn wind_above(&self, threshold_kmh: f64) -> bool {
        self.wind_speed_kmh.is_some_and(|w| w > threshold_kmh)
    }
}

/// Days of one stage, sorted by `day`. The input slice is left untouched.
pub fn days_in_stage(season: &[WeatherDay], stage: Stage) -> Vec<&WeatherDay> {
    let mut days: Vec<&WeatherDay> = season.iter().filter(|d| d.is_stage(stage)).collect();
    days.sort_by_key(|d| d.day);
    days
}
