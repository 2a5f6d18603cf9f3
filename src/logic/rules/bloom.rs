use super::{flat_daily, random_daily, Rule, RuleOutcome};
use crate::config::Thresholds;
use crate::logic::calculations::{compound_reduction, longest_streak, scale_reduction};
use crate::logic::random::RandomSource;
use crate::models::{days_in_stage, ReductionEvent, Stage, WeatherDay};

/// Frost during bloom kills open flowers outright.
///
/// Only the longest run of consecutive frost days counts, applied once.
/// The reduction scales from 50% (single night) to 90% (5+ nights).
pub struct BloomFrostRule;

impl Rule for BloomFrostRule {
    fn id(&self) -> &'static str {
        "bloom_frost"
    }

    fn name(&self) -> &'static str {
        "Frost during Bloom"
    }

    fn stage(&self) -> Stage {
        Stage::Bloom
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let streak = longest_streak(&days, |d| d.had_frost());

        if streak == 0 {
            return RuleOutcome::unchanged(yield_estimate);
        }

        let percent = scale_reduction(
            thresholds.bloom_frost_reduction_min,
            thresholds.bloom_frost_reduction_max,
            streak as f64,
            thresholds.bloom_frost_max_streak,
        );

        RuleOutcome::reduced(
            compound_reduction(yield_estimate, percent),
            ReductionEvent::new(self.name(), percent, 1),
        )
    }
}

/// Pollination suffers when bloom days are too cold or too hot.
///
/// Every day below `BLOOM_TEMP_LOW` or above `BLOOM_TEMP_HIGH` draws its own
/// 5-15% reduction.
pub struct BloomTemperatureRule;

impl Rule for BloomTemperatureRule {
    fn id(&self) -> &'static str {
        "bloom_temperature"
    }

    fn name(&self) -> &'static str {
        "Unfavorable Temperature During Bloom"
    }

    fn stage(&self) -> Stage {
        Stage::Bloom
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let (low, high) = (thresholds.bloom_temp_low, thresholds.bloom_temp_high);

        random_daily(
            self.name(),
            yield_estimate,
            &days,
            (
                thresholds.bloom_temp_reduction_min,
                thresholds.bloom_temp_reduction_max,
            ),
            rng,
            |d| d.temperature_celsius < low || d.temperature_celsius > high,
        )
    }
}

/// Heavy rain washes pollen and grounds pollinators. Flat 10% per day over 20mm.
pub struct BloomRainRule;

impl Rule for BloomRainRule {
    fn id(&self) -> &'static str {
        "bloom_rain"
    }

    fn name(&self) -> &'static str {
        "Heavy Rain During Bloom"
    }

    fn stage(&self) -> Stage {
        Stage::Bloom
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let threshold = thresholds.bloom_rain_threshold;

        flat_daily(
            self.name(),
            yield_estimate,
            &days,
            thresholds.bloom_rain_reduction,
            |d| d.rainfall_mm > threshold,
        )
    }
}

/// Strong wind strips blossoms. Flat 5% per day over 30 km/h.
pub struct BloomWindRule;

impl Rule for BloomWindRule {
    fn id(&self) -> &'static str {
        "bloom_wind"
    }

    fn name(&self) -> &'static str {
        "High Wind During Bloom"
    }

    fn stage(&self) -> Stage {
        Stage::Bloom
    }

    fn apply(
        &self,
        yield_estimate: f64,
        season: &[WeatherDay],
        thresholds: &Thresholds,
        _rng: &mut dyn RandomSource,
    ) -> RuleOutcome {
        let days = days_in_stage(season, self.stage());
        let threshold = thresholds.bloom_wind_threshold;

        flat_daily(
            self.name(),
            yield_estimate,
            &days,
            thresholds.bloom_wind_reduction,
            |d| d.wind_above(threshold),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{close, stage_days};
    use super::*;
    use crate::logic::random::FixedPercent;

    fn frost_days(pattern: &[bool]) -> Vec<WeatherDay> {
        pattern
            .iter()
            .enumerate()
            .map(|(i, &frost)| WeatherDay::new(i as u32 + 1, Stage::Bloom, 5.0, 0.0).with_frost(frost))
            .collect()
    }

    fn frost_yield(pattern: &[bool]) -> f64 {
        BloomFrostRule
            .apply(
                1000.0,
                &frost_days(pattern),
                &Thresholds::default(),
                &mut FixedPercent(0.0),
            )
            .yield_estimate
    }

    #[test]
    fn frost_uses_longest_streak_once() {
        let outcome = BloomFrostRule.apply(
            1000.0,
            &frost_days(&[true, false, true, true, false]),
            &Thresholds::default(),
            &mut FixedPercent(0.0),
        );
        // Longest streak of 2 days: 50 + 40 * 2/5 = 66%
        assert!(close(outcome.yield_estimate, 340.0));
        let event = outcome.event.unwrap();
        assert_eq!(event.event, "Frost during Bloom");
        assert!(close(event.reduction_percent, 66.0));
        assert_eq!(event.occurrences, 1);
    }

    #[test]
    fn longer_frost_streaks_hurt_more_until_cap() {
        let one = frost_yield(&[true]);
        let five = frost_yield(&[true; 5]);
        let twenty = frost_yield(&[true; 20]);
        assert!(five < one);
        assert!(close(five, twenty));
        assert!(close(twenty, 100.0));
    }

    #[test]
    fn frost_streak_sorts_by_day() {
        // Days 1,2,3 are frosty but listed out of order, with a thaw on day 4
        let mut season = frost_days(&[true, true, true, false]);
        season.swap(0, 2);
        season.swap(1, 3);
        let outcome = BloomFrostRule.apply(
            1000.0,
            &season,
            &Thresholds::default(),
            &mut FixedPercent(0.0),
        );
        assert!(close(outcome.event.unwrap().reduction_percent, 74.0));
    }

    #[test]
    fn absent_frost_flag_means_no_frost() {
        let season = stage_days(Stage::Bloom, &[(0.0, 0.0), (-1.0, 0.0)]);
        let outcome = BloomFrostRule.apply(
            1000.0,
            &season,
            &Thresholds::default(),
            &mut FixedPercent(0.0),
        );
        assert_eq!(outcome, RuleOutcome::unchanged(1000.0));
    }

    #[test]
    fn frost_outside_bloom_is_ignored() {
        let season = vec![WeatherDay::new(1, Stage::BudBreak, -2.0, 0.0).with_frost(true)];
        let outcome = BloomFrostRule.apply(
            1000.0,
            &season,
            &Thresholds::default(),
            &mut FixedPercent(0.0),
        );
        assert!(outcome.event.is_none());
    }

    #[test]
    fn temperature_outside_band_draws_per_day() {
        // 11°C is too cold, 29°C too hot, 20°C and the band edges are fine
        let season = stage_days(
            Stage::Bloom,
            &[(11.0, 1.0), (29.0, 0.0), (20.0, 0.0), (12.0, 0.0), (28.0, 0.0)],
        );
        let outcome = BloomTemperatureRule.apply(
            1000.0,
            &season,
            &Thresholds::default(),
            &mut FixedPercent(10.0),
        );
        assert!(close(outcome.yield_estimate, 810.0));
        let event = outcome.event.unwrap();
        assert_eq!(event.event, "Unfavorable Temperature During Bloom");
        assert!(close(event.reduction_percent, 10.0));
        assert_eq!(event.occurrences, 2);
    }

    #[test]
    fn temperature_band_comes_from_thresholds() {
        let thresholds = Thresholds {
            bloom_temp_low: 5.0,
            bloom_temp_high: 35.0,
            ..Thresholds::default()
        };
        let season = stage_days(Stage::Bloom, &[(11.0, 0.0), (29.0, 0.0)]);
        let outcome =
            BloomTemperatureRule.apply(1000.0, &season, &thresholds, &mut FixedPercent(10.0));
        assert!(outcome.event.is_none());
    }

    #[test]
    fn heavy_rain_compounds_per_day() {
        let season = stage_days(Stage::Bloom, &[(18.0, 25.0), (19.0, 30.0), (19.0, 20.0)]);
        let outcome = BloomRainRule.apply(
            1000.0,
            &season,
            &Thresholds::default(),
            &mut FixedPercent(0.0),
        );
        assert!(close(outcome.yield_estimate, 810.0));
        let event = outcome.event.unwrap();
        assert_eq!(event.event, "Heavy Rain During Bloom");
        assert!(close(event.reduction_percent, 19.0));
        assert_eq!(event.occurrences, 2);
    }

    #[test]
    fn wind_needs_a_reading() {
        let season = vec![
            WeatherDay::new(1, Stage::Bloom, 20.0, 0.0).with_wind(35.0),
            WeatherDay::new(2, Stage::Bloom, 22.0, 0.0).with_wind(33.0),
            WeatherDay::new(3, Stage::Bloom, 22.0, 0.0),
            WeatherDay::new(4, Stage::Bloom, 22.0, 0.0).with_wind(30.0),
        ];
        let outcome = BloomWindRule.apply(
            1000.0,
            &season,
            &Thresholds::default(),
            &mut FixedPercent(0.0),
        );
        assert!(close(outcome.yield_estimate, 902.5));
        let event = outcome.event.unwrap();
        assert!(close(event.reduction_percent, 9.75));
        assert_eq!(event.occurrences, 2);
    }
}
