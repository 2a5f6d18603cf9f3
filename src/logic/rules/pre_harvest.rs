use super::{random_daily, Rule, RuleOutcome};
use crate::config::Thresholds;
use crate::logic::random::RandomSource;
use crate::models::{days_in_stage, Stage, WeatherDay};

/// Wind storms before harvest knock mature fruit off the tree.
///
/// Every pre-harvest day with wind over 40 km/h draws its own 5-20% loss.
/// Days without a wind reading never qualify.
pub struct PreHarvestWindRule;

impl Rule for PreHarvestWindRule {
    fn id(&self) -> &'static str {
        "pre_harvest_wind"
    }

    fn name(&self) -> &'static str {
        "High Wind Pre-Harvest"
    }

    fn stage(&self) -> Stage {
        Stage::PreHarvest
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let threshold = thresholds.pre_harvest_wind_threshold;

        random_daily(
            self.name(),
            yield_estimate,
            &days,
            (
                thresholds.pre_harvest_wind_reduction_min,
                thresholds.pre_harvest_wind_reduction_max,
            ),
            rng,
            |d| d.wind_above(threshold),
        )
    }
}
