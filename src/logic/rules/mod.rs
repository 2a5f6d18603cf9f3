pub mod bloom;
pub mod engine;
pub mod fruit_growth;
pub mod fruit_set;
pub mod pre_harvest;

pub use engine::YieldEngine;

use super::calculations::{average, combined_percent, compound_reduction, scale_reduction};
use super::random::RandomSource;
use crate::config::Thresholds;
use crate::models::{ReductionEvent, Stage, WeatherDay};

/// Trait for weather-driven yield reduction rules
pub trait Rule: Send + Sync {
    /// Unique identifier for this rule
    fn id(&self) -> &'static str;

    /// Event label reported when the rule fires
    fn name(&self) -> &'static str;

    /// Growth stage whose days the rule inspects
    fn stage(&self) -> Stage;

    /// Apply the rule to the running yield estimate
    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        rng: &mut dyn RandomSource,
    ) -> RuleOutcome;
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleOutcome {
    pub yield_estimate: f64,
    pub event: Option<ReductionEvent>,
}

impl RuleOutcome {
    pub fn unchanged(yield_estimate: f64) -> Self {
        Self {
            yield_estimate,
            event: None,
        }
    }

    pub fn reduced(yield_estimate: f64, event: ReductionEvent) -> Self {
        Self {
            yield_estimate,
            event: Some(event),
        }
    }
}

/// Compound a flat percent once per qualifying day. The event carries the
/// combined percent removed.
fn flat_daily<F>(
    label: &str,
    yield_estimate: f64,
    days: &[&WeatherDay],
    percent: f64,
    qualifies: F,
) -> RuleOutcome
where
    F: Fn(&WeatherDay) -> bool,
{
    let mut adjusted = yield_estimate;
    let mut hits = 0u32;

    for &day in days {
        if qualifies(day) {
            adjusted = compound_reduction(adjusted, percent);
            hits += 1;
        }
    }

    if hits == 0 {
        return RuleOutcome::unchanged(yield_estimate);
    }

    RuleOutcome::reduced(
        adjusted,
        ReductionEvent::new(label, combined_percent(percent, hits), hits),
    )
}

/// Draw a fresh percent for every qualifying day. The event carries the
/// average draw.
fn random_daily<F>(
    label: &str,
    yield_estimate: f64,
    days: &[&WeatherDay],
    (min, max): (f64, f64),
    rng: &mut dyn RandomSource,
    qualifies: F,
) -> RuleOutcome
where
    F: Fn(&WeatherDay) -> bool,
{
    let mut adjusted = yield_estimate;
    let mut draws = Vec::new();

    for &day in days {
        if qualifies(day) {
            let percent = rng.random_percent(min, max);
            adjusted = compound_reduction(adjusted, percent);
            draws.push(percent);
        }
    }

    match average(&draws) {
        Some(avg) => RuleOutcome::reduced(
            adjusted,
            ReductionEvent::new(label, avg, draws.len() as u32),
        ),
        None => RuleOutcome::unchanged(yield_estimate),
    }
}

/// Scaling parameters for streak-based reductions
#[derive(Debug, Clone, Copy)]
struct StreakScale {
    min_streak: f64,
    max_streak: f64,
    min_percent: f64,
    max_percent: f64,
}

/// Compound one scaled reduction per qualifying streak. The event carries
/// the average streak percent.
fn per_streak(
    label: &str,
    yield_estimate: f64,
    runs: &[usize],
    scale: StreakScale,
) -> RuleOutcome {
    let mut adjusted = yield_estimate;
    let mut applied = Vec::new();

    for &run in runs.iter().filter(|&&r| r as f64 >= scale.min_streak) {
        let percent = scale_reduction(
            scale.min_percent,
            scale.max_percent,
            run as f64,
            scale.max_streak,
        );
        adjusted = compound_reduction(adjusted, percent);
        applied.push(percent);
    }

    match average(&applied) {
        Some(avg) => RuleOutcome::reduced(
            adjusted,
            ReductionEvent::new(label, avg, applied.len() as u32),
        ),
        None => RuleOutcome::unchanged(yield_estimate),
    }
}
