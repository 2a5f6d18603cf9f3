pub mod calculations;
pub mod random;
pub mod rules;
pub mod season_generator;

pub use random::UniformPercent;
pub use rules::YieldEngine;
pub use season_generator::SeasonGenerator;
