pub mod simulation;
pub mod weather;

pub use simulation::*;
pub use weather::*;
