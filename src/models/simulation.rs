use super::weather::WeatherDay;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Request body for a single season simulation.
///
/// `tree_count` is accepted as a float; the engine treats it as a count
/// but does not reject fractional values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub tree_count: f64,
    pub potential_yield_per_tree: f64,
    #[serde(default)]
    pub growing_season_data: Vec<WeatherDay>,
}

impl SimulationRequest {
    pub fn base_yield(&self) -> f64 {
        self.tree_count * self.potential_yield_per_tree
    }
}

/// A rule that fired, with its percentage impact on the running yield.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReductionEvent {
    pub event: String,
    #[serde(rename = "reductionPercent")]
    pub reduction_percent: f64,
    /// Qualifying days or streaks behind this event
    pub occurrences: u32,
}

impl ReductionEvent {
    pub fn new(event: impl Into<String>, reduction_percent: f64, occurrences: u32) -> Self {
        Self {
            event: event.into(),
            reduction_percent,
            occurrences,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    pub estimated_total_yield: u64,
    pub events: Vec<ReductionEvent>,
}

/// Full record of one run, request included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationReport {
    pub tree_count: f64,
    pub potential_yield_per_tree: f64,
    pub estimated_total_yield: u64,
    pub events: Vec<ReductionEvent>,
    pub growing_season_data: Vec<WeatherDay>,
    pub simulated_at: DateTime<Utc>,
}

impl SimulationReport {
    pub fn new(request: SimulationRequest, outcome: SimulationOutcome) -> Self {
        Self {
            tree_count: request.tree_count,
            potential_yield_per_tree: request.potential_yield_per_tree,
            estimated_total_yield: outcome.estimated_total_yield,
            events: outcome.events,
            growing_season_data: request.growing_season_data,
            simulated_at: Utc::now(),
        }
    }
}
