use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// Source of randomized reduction percentages.
pub trait RandomSource {
    /// Uniform percentage in `[min, max)`. Returns `min` when the range is empty.
    fn random_percent(&mut self, min: f64, max: f64) -> f64;
}

/// Uniform draws from a small, fast `rand` generator.
pub struct UniformPercent {
    rng: SmallRng,
}

impl UniformPercent {
    /// Seeded from OS entropy; not reproducible between runs.
    pub fn from_entropy() -> Self {
        Self {
            rng: SmallRng::from_entropy(),
        }
    }

    #[cfg(test)]
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }
}

impl RandomSource for UniformPercent {
    fn random_percent(&mut self, min: f64, max: f64) -> f64 {
        if max <= min {
            return min;
        }
        min + self.rng.gen::<f64>() * (max - min)
    }
}

/// Always returns the same percentage, whatever range is asked for.
#[derive(Debug, Clone, Copy)]
pub struct FixedPercent(pub f64);

impl RandomSource for FixedPercent {
    fn random_percent(&mut self, _min: f64, _max: f64) -> f64 {
        self.0
    }
}
