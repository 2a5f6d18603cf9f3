use super::{per_streak, Rule, RuleOutcome, StreakScale};
use crate::config::Thresholds;
use crate::logic::calculations::streaks;
use crate::logic::random::RandomSource;
use crate::models::{days_in_stage, Stage, WeatherDay};

/// Heatwaves during fruit set cause young fruit to drop.
///
/// Conditions:
/// - Runs of at least 2 consecutive days above 32°C
///
/// Each qualifying run costs 1-5%, scaled by its length up to 5 days.
pub struct FruitSetHeatRule;

impl Rule for FruitSetHeatRule {
    fn id(&self) -> &'static str {
        "fruit_set_heat"
    }

    fn name(&self) -> &'static str {
        "Heatwaves During Fruit Set"
    }

    fn stage(&self) -> Stage {
        Stage::FruitSet
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let threshold = thresholds.fruit_set_heat_threshold;
        let runs = streaks(&days, |d| d.temperature_celsius > threshold);

        per_streak(
            self.name(),
            yield_estimate,
            &runs,
            StreakScale {
                min_streak: thresholds.fruit_set_heat_min_streak,
                max_streak: thresholds.fruit_set_heat_max_streak,
                min_percent: thresholds.fruit_set_heat_reduction_min,
                max_percent: thresholds.fruit_set_heat_reduction_max,
            },
        )
    }
}

/// Hot and dry spells during fruit set stress the tree into shedding fruit.
///
/// Conditions:
/// - Runs of at least 2 consecutive days at or above 32°C with under 2mm rain
///
/// Scaled like heatwaves, and stacks with them.
pub struct FruitSetHotDryRule;

impl Rule for FruitSetHotDryRule {
    fn id(&self) -> &'static str {
        "fruit_set_hot_dry"
    }

    fn name(&self) -> &'static str {
        "Hot and Dry Conditions During Fruit Set"
    }

    fn stage(&self) -> Stage {
        Stage::FruitSet
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let (temp, rain) = (
            thresholds.fruit_set_hot_dry_temp,
            thresholds.fruit_set_hot_dry_rain,
        );
        let runs = streaks(&days, |d| {
            d.temperature_celsius >= temp && d.rainfall_mm < rain
        });

        per_streak(
            self.name(),
            yield_estimate,
            &runs,
            StreakScale {
                min_streak: thresholds.fruit_set_hot_dry_min_streak,
                max_streak: thresholds.fruit_set_hot_dry_max_streak,
                min_percent: thresholds.fruit_set_hot_dry_reduction_min,
                max_percent: thresholds.fruit_set_hot_dry_reduction_max,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{close, stage_days};
    use super::*;
    use crate::logic::random::FixedPercent;

    fn apply(rule: &dyn Rule, season: &[WeatherDay]) -> RuleOutcome {
        rule.apply(1000.0, season, &Thresholds::default(), &mut FixedPercent(0.0))
    }

    #[test]
    fn heat_streak_of_two_applies_once() {
        let season = stage_days(Stage::FruitSet, &[(33.0, 5.0), (34.0, 3.0)]);
        let outcome = apply(&FruitSetHeatRule, &season);
        // 1 + 4 * 2/5 = 2.6%
        assert!(close(outcome.yield_estimate, 974.0));
        let event = outcome.event.unwrap();
        assert_eq!(event.event, "Heatwaves During Fruit Set");
        assert!(close(event.reduction_percent, 2.6));
        assert_eq!(event.occurrences, 1);
    }

    #[test]
    fn single_hot_day_is_not_a_heatwave() {
        let season = stage_days(Stage::FruitSet, &[(33.0, 5.0), (25.0, 0.0), (35.0, 0.0)]);
        assert!(apply(&FruitSetHeatRule, &season).event.is_none());
    }

    #[test]
    fn threshold_is_strict_for_heat() {
        let season = stage_days(Stage::FruitSet, &[(32.0, 5.0), (32.0, 5.0)]);
        assert!(apply(&FruitSetHeatRule, &season).event.is_none());
    }

    #[test]
    fn each_heatwave_compounds_and_trailing_streak_counts() {
        let season = stage_days(
            Stage::FruitSet,
            &[
                (33.0, 0.0),
                (33.0, 0.0),
                (20.0, 0.0),
                (33.0, 0.0),
                (33.0, 0.0),
                (33.0, 0.0),
                (33.0, 0.0),
                (33.0, 0.0),
                (33.0, 0.0),
            ],
        );
        let outcome = apply(&FruitSetHeatRule, &season);
        // 2-day run: 2.6%, trailing 6-day run capped at 5%
        let expected = 1000.0 * (1.0 - 0.026) * (1.0 - 0.05);
        assert!(close(outcome.yield_estimate, expected));
        let event = outcome.event.unwrap();
        assert!(close(event.reduction_percent, (2.6 + 5.0) / 2.0));
        assert_eq!(event.occurrences, 2);
    }

    #[test]
    fn hot_dry_needs_both_conditions() {
        let season = stage_days(
            Stage::FruitSet,
            &[(33.0, 1.0), (34.0, 0.5), (34.0, 2.0), (32.0, 0.0), (32.0, 1.9)],
        );
        let outcome = apply(&FruitSetHotDryRule, &season);
        let event = outcome.event.unwrap();
        assert_eq!(event.event, "Hot and Dry Conditions During Fruit Set");
        assert_eq!(event.occurrences, 2);
        assert!(close(event.reduction_percent, 2.6));
        let expected = 1000.0 * (1.0 - 0.026) * (1.0 - 0.026);
        assert!(close(outcome.yield_estimate, expected));
    }

    #[test]
    fn hot_dry_temperature_is_inclusive() {
        let season = stage_days(Stage::FruitSet, &[(32.0, 0.0), (32.0, 0.0), (32.0, 0.0)]);
        let outcome = apply(&FruitSetHotDryRule, &season);
        assert!(close(outcome.event.unwrap().reduction_percent, 3.4));
    }

    #[test]
    fn other_stages_are_ignored() {
        let season = stage_days(Stage::FruitGrowth, &[(40.0, 0.0), (40.0, 0.0)]);
        assert!(apply(&FruitSetHeatRule, &season).event.is_none());
        assert!(apply(&FruitSetHotDryRule, &season).event.is_none());
    }
}
