use super::{flat_daily, Rule, RuleOutcome};
use crate::config::Thresholds;
use crate::logic::calculations::{combined_percent, compound_reduction};
use crate::logic::random::RandomSource;
use crate::models::{days_in_stage, ReductionEvent, Stage, WeatherDay};

/// Prolonged summer drought limits fruit sizing.
///
/// Walks fruit growth days in order, counting the current run of days with
/// zero rainfall. Every day on which that run is at least
/// `FRUIT_GROWTH_DROUGHT_STREAK` long costs a flat 0.5%.
pub struct DroughtRule;

impl Rule for DroughtRule {
    fn id(&self) -> &'static str {
        "fruit_growth_drought"
    }

    fn name(&self) -> &'static str {
        "Prolonged Summer Drought"
    }

    fn stage(&self) -> Stage {
        Stage::FruitGrowth
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let percent = thresholds.fruit_growth_drought_reduction;

        let mut adjusted = yield_estimate;
        let mut zero_rain_streak = 0u32;
        let mut drought_days = 0u32;

        for day in &days {
            if day.rainfall_mm == 0.0 {
                zero_rain_streak += 1;
            } else {
                zero_rain_streak = 0;
            }

            if f64::from(zero_rain_streak) >= thresholds.fruit_growth_drought_streak {
                adjusted = compound_reduction(adjusted, percent);
                drought_days += 1;
            }
        }

        if drought_days == 0 {
            return RuleOutcome::unchanged(yield_estimate);
        }

        RuleOutcome::reduced(
            adjusted,
            ReductionEvent::new(
                self.name(),
                combined_percent(percent, drought_days),
                drought_days,
            ),
        )
    }
}

/// Heat stress above 35°C during fruit growth. Flat 0.2% per hot day.
pub struct FruitGrowthHeatRule;

impl Rule for FruitGrowthHeatRule {
    fn id(&self) -> &'static str {
        "fruit_growth_heat"
    }

    fn name(&self) -> &'static str {
        "Heat Stress During Fruit Growth"
    }

    fn stage(&self) -> Stage {
        Stage::FruitGrowth
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let threshold = thresholds.fruit_growth_heat_threshold;

        flat_daily(
            self.name(),
            yield_estimate,
            &days,
            thresholds.fruit_growth_heat_reduction,
            |d| d.temperature_celsius > threshold,
        )
    }
}
