use crate::models::{SimulationRequest, Stage, WeatherDay};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Weather ranges used when synthesizing one stage
#[derive(Debug, Clone, Copy)]
struct StageClimate {
    temp_c: (f64, f64),
    rain_mm: (f64, f64),
    frost_chance: Option<f64>,
    wind_kmh: Option<(f64, f64)>,
}

impl StageClimate {
    fn for_stage(stage: Stage) -> Self {
        match stage {
            Stage::BudBreak => Self {
                temp_c: (-2.0, 14.0),
                rain_mm: (0.0, 8.0),
                frost_chance: Some(0.15),
                wind_kmh: None,
            },
            Stage::Bloom => Self {
                temp_c: (-2.0, 18.0),
                rain_mm: (0.0, 30.0),
                frost_chance: Some(0.10),
                wind_kmh: Some((0.0, 40.0)),
            },
            Stage::FruitSet => Self {
                temp_c: (0.0, 30.0),
                rain_mm: (0.0, 5.0),
                frost_chance: Some(0.05),
                wind_kmh: Some((0.0, 20.0)),
            },
            Stage::FruitGrowth => Self {
                temp_c: (12.0, 38.0),
                rain_mm: (0.0, 3.0),
                frost_chance: None,
                wind_kmh: Some((0.0, 50.0)),
            },
            Stage::PreHarvest => Self {
                temp_c: (20.0, 38.0),
                rain_mm: (0.0, 5.0),
                frost_chance: None,
                wind_kmh: Some((0.0, 50.0)),
            },
        }
    }
}

/// Synthesizes plausible growing seasons for demos and smoke runs.
pub struct SeasonGenerator {
    days_per_stage: u32,
    rng: SmallRng,
}

impl SeasonGenerator {
    /// A fixed `seed` makes the output reproducible.
    pub fn new(days_per_stage: u32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };
        Self {
            days_per_stage,
            rng,
        }
    }

    /// Every stage in season order, days numbered from 1.
    pub fn generate_season(&mut self) -> Vec<WeatherDay> {
        let mut season = Vec::with_capacity(self.days_per_stage as usize * Stage::ALL.len());
        let mut day = 1;

        for stage in Stage::ALL {
            let climate = StageClimate::for_stage(stage);
            for _ in 0..self.days_per_stage {
                season.push(self.generate_day(day, stage, climate));
                day += 1;
            }
        }

        season
    }

    pub fn generate_request(
        &mut self,
        tree_count: f64,
        potential_yield_per_tree: f64,
    ) -> SimulationRequest {
        SimulationRequest {
            tree_count,
            potential_yield_per_tree,
            growing_season_data: self.generate_season(),
        }
    }

    fn generate_day(&mut self, day: u32, stage: Stage, climate: StageClimate) -> WeatherDay {
        let temp = self.uniform(climate.temp_c);
        let rain = self.uniform(climate.rain_mm);
        let mut entry = WeatherDay::new(day, stage, temp, rain);

        if let Some(chance) = climate.frost_chance {
            entry = entry.with_frost(self.rng.gen_bool(chance));
        }
        if let Some(range) = climate.wind_kmh {
            entry = entry.with_wind(self.uniform(range));
        }

        entry
    }

    /// Uniform sample rounded to one decimal
    fn uniform(&mut self, (low, high): (f64, f64)) -> f64 {
        let value = self.rng.gen_range(low..=high);
        (value * 10.0).round() / 10.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_covers_every_stage_in_order() {
        let season = SeasonGenerator::new(30, Some(1)).generate_season();
        assert_eq!(season.len(), 150);
        assert_eq!(season[0].day, 1);
        assert_eq!(season[149].day, 150);
        assert!(season[0].is_stage(Stage::BudBreak));
        assert!(season[30].is_stage(Stage::Bloom));
        assert!(season[60].is_stage(Stage::FruitSet));
        assert!(season[90].is_stage(Stage::FruitGrowth));
        assert!(season[149].is_stage(Stage::PreHarvest));
    }

    #[test]
    fn values_stay_within_stage_climate() {
        let season = SeasonGenerator::new(50, Some(9)).generate_season();
        for day in &season {
            let stage = Stage::ALL
                .into_iter()
                .find(|s| day.is_stage(*s))
                .unwrap();
            let climate = StageClimate::for_stage(stage);
            assert!(day.temperature_celsius >= climate.temp_c.0);
            assert!(day.temperature_celsius <= climate.temp_c.1);
            assert!(day.rainfall_mm >= 0.0 && day.rainfall_mm <= climate.rain_mm.1);
            assert_eq!(day.frost_occurred.is_some(), climate.frost_chance.is_some());
            assert_eq!(day.wind_speed_kmh.is_some(), climate.wind_kmh.is_some());
        }
    }

    #[test]
    fn values_are_rounded_to_one_decimal() {
        let season = SeasonGenerator::new(10, Some(3)).generate_season();
        for day in &season {
            let scaled = day.temperature_celsius * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-6);
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = SeasonGenerator::new(30, Some(42)).generate_request(150.0, 500.0);
        let b = SeasonGenerator::new(30, Some(42)).generate_request(150.0, 500.0);
        assert_eq!(a.growing_season_data, b.growing_season_data);
        assert_eq!(a.tree_count, 150.0);
        assert_eq!(a.potential_yield_per_tree, 500.0);
    }

    #[test]
    fn zero_days_per_stage_is_empty() {
        assert!(SeasonGenerator::new(0, Some(1)).generate_season().is_empty());
    }
}
