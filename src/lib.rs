// Re-export all public modules
pub mod shared;
pub mod error;
pub mod prefix;
pub mod as_graph;
pub mod simulation_engine;
pub mod route_validator;
pub mod engine;
pub mod data_plane_propagator;
pub mod simulation_framework;
pub mod engine_runner;

// Re-export commonly used types at the crate root
pub use as_graph::{AS, ASGraph, ASN};
pub use engine::SimulationEngine;
pub use error::{SimError, SimResult};
pub use prefix::{covers, covers_addr, IPAddr, Prefix};
pub use shared::{CommonASNs, Outcomes, Relationships, Setting, SettingsSet, Timestamps};
pub use simulation_engine::Announcement;
pub use route_validator::{ROA, RouteValidator};