pub mod scenario;
pub mod scenario_config;
pub mod simulation;
pub mod data_tracker;
pub mod scenarios;

pub use scenario::{Scenario, ScenarioTrait};
pub use scenario_config::ScenarioConfig;
pub use simulation::Simulation;
pub use data_tracker::DataTracker;