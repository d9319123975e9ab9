//! Turn-by-turn drive simulation on top of the predictor.
pub mod drive;
pub mod presets;

pub use drive::{simulate_drive, DriveOutcome, DriveStep, DriveTrace, NoiseConfig, SimulationConfig};
pub use presets::ScenarioPreset;
