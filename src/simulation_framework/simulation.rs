use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use crate::as_graph::ASGraph;
use crate::engine::SimulationEngine;
use crate::shared::{Outcomes, Setting};

use super::data_tracker::{DataTracker, SimulationSummary};
use super::scenario::Scenario;
use super::scenario_config::ScenarioConfig;

/// Orchestrates a full experiment: for each scenario configuration, at each
/// adoption percentage, runs `num_trials` independent trials and aggregates
/// outcomes into a `DataTracker`/`SimulationSummary` pair written to disk.
/// The `ASGraph` topology is built once, shared read-only across trials via
/// `Arc`, and cloned per trial so each trial thread can mutate its own copy's
/// per-AS settings without a lock.
pub struct Simulation {
    /// Output directory for results
    pub output_dir: PathBuf,

    /// Percentages of ASes randomly adopting for each run
    pub percent_ases_randomly_adopting: Vec<f64>,

    /// Scenario configurations to run
    pub scenario_configs: Vec<ScenarioConfig>,

    /// Number of trials per configuration
    pub num_trials: usize,

    /// Bounded worker count for the trial-level thread pool.
    pub parse_cpus: usize,

    /// AS graph to use for simulations, shared read-only across trial threads.
    pub as_graph: Arc<ASGraph>,
}

impl Simulation {
    pub fn new(as_graph: ASGraph) -> Self {
        let output_dir = dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join("Desktop").join("sims").join("bgpsimulator_rust");

        Simulation {
            output_dir,
            percent_ases_randomly_adopting: vec![10.0, 20.0, 50.0, 80.0, 99.0],
            scenario_configs: vec![ScenarioConfig::new(
                "Subprefix Hijack; ROV Adopting".to_string(),
                "SubprefixHijack".to_string(),
            )
            .with_adoption_setting(Setting::Rov, true)],
            num_trials: 10,
            parse_cpus: num_cpus::get().max(1),
            as_graph: Arc::new(as_graph),
        }
    }

    pub fn with_output_dir(mut self, dir: PathBuf) -> Self {
        self.output_dir = dir;
        self
    }

    pub fn with_adoption_percentages(mut self, percentages: Vec<f64>) -> Self {
        self.percent_ases_randomly_adopting = percentages;
        self
    }

    pub fn with_scenario_configs(mut self, configs: Vec<ScenarioConfig>) -> Self {
        self.scenario_configs = configs;
        self
    }

    pub fn with_num_trials(mut self, trials: usize) -> Self {
        self.num_trials = trials;
        self
    }

    /// Run the complete simulation
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        info!("running simulation, output to {:?}", self.output_dir);
        std::fs::create_dir_all(&self.output_dir)?;

        let start_time = Instant::now();

        let configs = self.scenario_configs.clone();
        for scenario_config in &configs {
            println!("\nRunning scenario: {}", scenario_config.label);
            self.run_scenario(scenario_config)?;
        }

        let duration = start_time.elapsed();
        println!("\nSimulation complete in {:.2}s", duration.as_secs_f64());

        Ok(())
    }

    /// Run a single scenario with all adoption percentages
    fn run_scenario(&mut self, scenario_config: &ScenarioConfig) -> Result<(), Box<dyn std::error::Error>> {
        let mut summary = SimulationSummary::new(scenario_config.label.clone());

        let percentages = self.percent_ases_randomly_adopting.clone();
        for percent in percentages {
            println!("\n  Running with {}% adoption", percent);

            let tracker = self.run_trials_for_percentage(scenario_config, percent)?;
            let success_rate = tracker.success_rate();

            println!("    Success rate: {:.2}%", success_rate);
            summary.add_data_point(percent, success_rate);

            tracker.save_to_file(&self.output_dir)?;
        }

        summary.save_to_file(&self.output_dir)?;

        Ok(())
    }

    /// Run `num_trials` independent trials for one adoption percentage,
    /// fanned out across a bounded pool of scoped worker threads. Each
    /// worker pulls the next trial index off a shared counter and clones
    /// the shared topology to run it against, so trials never contend on
    /// the same `ASGraph` settings.
    fn run_trials_for_percentage(
        &self,
        scenario_config: &ScenarioConfig,
        percent: f64,
    ) -> Result<DataTracker, Box<dyn std::error::Error>> {
        let mut tracker = DataTracker::new(scenario_config.label.clone(), percent);

        let pb = ProgressBar::new(self.num_trials as u64);
        pb.set_style(
            ProgressStyle::default_bar().template("[{elapsed_precise}] {bar:40} {pos}/{len} trials")?.progress_chars("##-"),
        );

        let worker_count = self.parse_cpus.max(1).min(self.num_trials.max(1));
        let next_trial = AtomicUsize::new(0);
        let outcomes: Mutex<Vec<Outcomes>> = Mutex::new(Vec::new());
        let first_error: Mutex<Option<String>> = Mutex::new(None);

        std::thread::scope(|scope| {
            for _ in 0..worker_count {
                scope.spawn(|| loop {
                    let trial = next_trial.fetch_add(1, Ordering::SeqCst);
                    if trial >= self.num_trials {
                        break;
                    }

                    let scenario_impl = match super::scenarios::build(&scenario_config.scenario_name, &self.as_graph, scenario_config) {
                        Ok(s) => s,
                        Err(e) => {
                            first_error.lock().unwrap().get_or_insert_with(|| e.to_string());
                            pb.inc(1);
                            continue;
                        }
                    };
                    let scenario = Scenario::new(scenario_config.clone(), &self.as_graph, percent, scenario_impl);

                    let mut graph_clone = (*self.as_graph).clone();
                    match Self::run_single_trial(&mut graph_clone, &scenario, trial, percent) {
                        Ok(outcome) => outcomes.lock().unwrap().push(outcome),
                        Err(e) => {
                            first_error.lock().unwrap().get_or_insert_with(|| e.to_string());
                        }
                    }

                    pb.inc(1);
                });
            }
        });

        pb.finish();

        if let Some(message) = first_error.into_inner().unwrap() {
            return Err(message.into());
        }

        for outcome in outcomes.into_inner().unwrap() {
            tracker.add_outcome(outcome);
        }

        Ok(tracker)
    }

    /// Run a single trial of a scenario against its own (already-cloned)
    /// graph. Rounds run one at a time, rather than as a single
    /// `engine.run(n)` call, so the scenario's `post_propagation_hook` can
    /// observe and react to each round as it happens.
    fn run_single_trial(
        as_graph: &mut ASGraph,
        scenario: &Scenario,
        trial: usize,
        percent_adopt: f64,
    ) -> Result<Outcomes, Box<dyn std::error::Error>> {
        let mut engine = SimulationEngine::new(as_graph);

        scenario.setup_engine(&mut engine)?;

        let total_rounds = scenario.min_propagation_rounds().max(1) * 20;
        for round in 0..total_rounds {
            engine.run(1);
            scenario.scenario_impl.post_propagation_hook(&mut engine, round, trial, percent_adopt);
        }

        scenario.scenario_impl.pre_aggregation_hook(&engine);

        let outcome = if scenario.is_successful(&engine) { Outcomes::AttackerSuccess } else { Outcomes::LegitimateOriginSuccess };

        Ok(outcome)
    }
}
