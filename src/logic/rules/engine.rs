use super::{
    bloom::{BloomFrostRule, BloomRainRule, BloomTemperatureRule, BloomWindRule},
    fruit_growth::{DroughtRule, FruitGrowthHeatRule},
    fruit_set::{FruitSetHeatRule, FruitSetHotDryRule},
    pre_harvest::PreHarvestWindRule,
    Rule,
};
use crate::config::Thresholds;
use crate::logic::random::RandomSource;
use crate::models::{SimulationOutcome, SimulationRequest, WeatherDay};

/// Applies every reduction rule, in season order, to a running yield.
pub struct YieldEngine {
    rules: Vec<Box<dyn Rule>>,
}

impl YieldEngine {
    pub fn new() -> Self {
        // Later rules see the yield left by earlier ones; order is fixed.
        let rules: Vec<Box<dyn Rule>> = vec![
            Box::new(BloomFrostRule),
            Box::new(BloomTemperatureRule),
            Box::new(BloomRainRule),
            Box::new(BloomWindRule),
            Box::new(FruitSetHeatRule),
            Box::new(FruitSetHotDryRule),
            Box::new(DroughtRule),
            Box::new(FruitGrowthHeatRule),
            Box::new(PreHarvestWindRule),
        ];

        Self { rules }
    }

    pub fn simulate(
        &self,
        request: &SimulationRequest,
        thresholds: &Thresholds,
        rng: &mut dyn RandomSource,
    ) -> SimulationOutcome {
        self.estimate(
            request.base_yield(),
            &request.growing_season_data,
            thresholds,
            rng,
        )
    }

    /// Run the full pipeline from a base yield. The result is rounded and
    /// floored at zero once, after the last rule.
    pub fn estimate(
        &self,
        base_yield: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        rng: &mut dyn RandomSource,
    ) -> SimulationOutcome {
        let mut yield_estimate = base_yield;
        let mut events = Vec::new();

        for rule in &self.rules {
            let outcome = rule.apply(yield_estimate, season, thresholds, rng);
            if let Some(event) = outcome.event {
                tracing::debug!(
                    "{} fired: {:.2}% over {} occurrence(s), yield {:.1} -> {:.1}",
                    rule.id(),
                    event.reduction_percent,
                    event.occurrences,
                    yield_estimate,
                    outcome.yield_estimate
                );
                events.push(event);
            }
            yield_estimate = outcome.yield_estimate;
        }

        let estimated_total_yield = finalize_yield(yield_estimate);
        tracing::info!(
            "Estimated yield {} from base {:.1} ({} events)",
            estimated_total_yield,
            base_yield,
            events.len()
        );

        SimulationOutcome {
            estimated_total_yield,
            events,
        }
    }

    pub fn list_rules(&self) -> Vec<(&'static str, &'static str)> {
        self.rules.iter().map(|r| (r.id(), r.name())).collect()
    }
}

impl Default for YieldEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Round to the nearest whole unit; anything below zero becomes zero.
fn finalize_yield(yield_estimate: f64) -> u64 {
    let rounded = yield_estimate.round();
    if rounded > 0.0 {
        rounded as u64
    } else {
        0
    }
}
