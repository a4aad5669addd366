use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use log::info;

use crate::as_graph::ASN;
use crate::data_plane_propagator::DataPlanePropagator;
use crate::engine::SimulationEngine;
use crate::prefix::IPAddr;
use crate::shared::Outcomes;
use crate::simulation_framework::scenario::Scenario;
use crate::simulation_framework::scenarios;

use super::engine_run_config::EngineRunConfig;

/// Drives one named engine run end to end: builds the scenario named in its
/// config, seeds and propagates, classifies each AS's outcome, and persists
/// the result under `storage_dir`. The thin outer-driver counterpart to
/// `Simulation`, for a single run rather than a percentage/trial sweep.
pub struct EngineRunner {
    pub config: EngineRunConfig,
    pub base_dir: PathBuf,
    pub overwrite: bool,
    pub compare_against_ground_truth: bool,
    pub write_diagrams: bool,
    pub storage_dir: PathBuf,
}

impl EngineRunner {
    pub fn new(config: EngineRunConfig) -> Self {
        let base_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join("Desktop").join("bgpsimulator_engine_runs");
        let storage_dir = base_dir.join(&config.name);

        EngineRunner { config, base_dir, overwrite: false, compare_against_ground_truth: false, write_diagrams: true, storage_dir }
    }

    pub fn with_base_dir(mut self, dir: PathBuf) -> Self {
        self.base_dir = dir;
        self.storage_dir = self.base_dir.join(&self.config.name);
        self
    }

    pub fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    pub fn with_compare_against_ground_truth(mut self, compare: bool) -> Self {
        self.compare_against_ground_truth = compare;
        self
    }

    pub fn with_write_diagrams(mut self, write: bool) -> Self {
        self.write_diagrams = write;
        self
    }

    /// Run the engine with the configured scenario
    pub fn run(&mut self) -> Result<HashMap<ASN, Outcomes>, Box<dyn std::error::Error>> {
        fs::create_dir_all(&self.storage_dir)?;

        let scenario_name = self.config.scenario_config.scenario_name.clone();
        let scenario_config = self.config.scenario_config.clone();
        let scenario_impl = scenarios::build(&scenario_name, &self.config.as_graph, &scenario_config)?;
        let scenario = Scenario::new(scenario_config, &self.config.as_graph, 0.0, scenario_impl);

        // Fields read out before `engine` borrows `self.config.as_graph`
        // mutably, since the borrow lives as long as `engine` does.
        let storage_dir = self.storage_dir.clone();
        let config_json = self.config.to_json();
        let write_diagrams = self.write_diagrams;

        let mut engine = SimulationEngine::new(&mut self.config.as_graph);
        scenario.setup_engine(&mut engine)?;

        let propagation_rounds = scenario.min_propagation_rounds() * 20;
        for round in 0..propagation_rounds {
            engine.run(1);
            scenario.scenario_impl.post_propagation_hook(&mut engine, round, 0, scenario.percent_ases_randomly_adopting);
        }
        scenario.scenario_impl.pre_aggregation_hook(&engine);

        let dst = IPAddr::new(scenario.dest_ip_addr);
        let outcomes =
            DataPlanePropagator::new(&engine, &scenario.attacker_asns, &scenario.legitimate_origin_asns, dst).run();

        Self::store_data(&storage_dir, &config_json, &engine, &outcomes)?;

        if write_diagrams {
            Self::generate_diagrams(&storage_dir, &scenario)?;
        }

        Ok(outcomes)
    }

    fn store_data(
        storage_dir: &std::path::Path,
        config_json: &serde_json::Value,
        engine: &SimulationEngine,
        outcomes: &HashMap<ASN, Outcomes>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let engine_path = storage_dir.join("engine_guess.json");
        let engine_json = serde_json::json!({
            "as_graph_size": engine.as_graph.len(),
            "policy_count": engine.policy_store.iter().count(),
        });
        fs::write(engine_path, serde_json::to_string_pretty(&engine_json)?)?;

        let outcomes_path = storage_dir.join("outcomes_guess.json");
        fs::write(outcomes_path, serde_json::to_string_pretty(&outcomes)?)?;

        let config_path = storage_dir.join("config.json");
        fs::write(config_path, serde_json::to_string_pretty(config_json)?)?;

        info!("stored engine run results under {:?}", storage_dir);
        Ok(())
    }

    fn generate_diagrams(storage_dir: &std::path::Path, _scenario: &Scenario) -> Result<(), Box<dyn std::error::Error>> {
        let diagram_path = storage_dir.join("diagram.txt");
        fs::write(diagram_path, "Diagram generation not yet implemented")?;
        Ok(())
    }
}
