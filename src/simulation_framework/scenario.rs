use std::collections::{HashMap, HashSet};
use std::net::IpAddr;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::error::SimResult;
use crate::route_validator::ROA;
use crate::shared::SettingsSet;
use crate::simulation_engine::Announcement;

use super::scenario_config::ScenarioConfig;

/// What one concrete attack (or non-attack) scenario contributes: who
/// attacks, who originates legitimately, what gets seeded, and how success
/// is measured. Adoption percentage and setting selection are layered on
/// top by `Scenario`, which every concrete scenario shares.
pub trait ScenarioTrait: Send + Sync {
    /// Minimum number of propagation rounds for this scenario
    fn min_propagation_rounds(&self) -> u32 {
        1
    }

    /// Get the name of this scenario type
    fn name(&self) -> &str;

    /// Get attacker ASNs for this scenario
    fn get_attacker_asns(&self, as_graph: &ASGraph) -> HashSet<ASN>;

    /// Get legitimate origin ASNs
    fn get_legitimate_origin_asns(&self, as_graph: &ASGraph) -> HashSet<ASN>;

    /// Get announcements to seed the simulation with
    fn get_seed_asn_ann_dict(&self, as_graph: &ASGraph) -> HashMap<ASN, Vec<Announcement>>;

    /// Get ROAs for the simulation
    fn get_roas(&self, as_graph: &ASGraph) -> Vec<ROA>;

    /// Get destination IP address for the data-plane traceback
    fn get_dest_ip_addr(&self) -> IpAddr {
        "1.2.3.4".parse().unwrap()
    }

    /// Settings baked into the attack itself rather than chosen by whoever
    /// configures adoption, e.g. the first-ASN-stripping transform that
    /// makes a prefix hijack a *shortest-path* hijack. Applied to
    /// `attacker_asns` with higher precedence than adoption settings.
    fn attacker_settings(&self) -> SettingsSet {
        SettingsSet::empty()
    }

    /// Whether the engine's final state counts as this scenario's attack
    /// having succeeded.
    fn is_successful(&self, engine: &SimulationEngine) -> bool;

    /// Runs after every propagation round. Default no-op; a scenario that
    /// needs a second-round hook (e.g. re-seeding a leaked path once the
    /// first round's routes have settled) overrides this instead of cramming
    /// extra state into `get_seed_asn_ann_dict`.
    fn post_propagation_hook(&self, _engine: &mut SimulationEngine, _round: u32, _trial: usize, _percent_adopt: f64) {}

    /// Runs once, after the last propagation round and before outcome
    /// aggregation. Default no-op.
    fn pre_aggregation_hook(&self, _engine: &SimulationEngine) {}
}

/// Binds one concrete `ScenarioTrait` implementation to an AS graph and an
/// adoption percentage: resolves which ASNs attack, originate, and adopt
/// defenses for this trial, and carries the resulting seed announcements
/// and ROAs the engine consumes.
pub struct Scenario {
    pub config: ScenarioConfig,
    pub percent_ases_randomly_adopting: f64,
    pub scenario_impl: Box<dyn ScenarioTrait>,
    pub attacker_asns: HashSet<ASN>,
    pub legitimate_origin_asns: HashSet<ASN>,
    pub adopting_asns: HashSet<ASN>,
    pub seed_asn_ann_dict: HashMap<ASN, Vec<Announcement>>,
    pub roas: Vec<ROA>,
    pub dest_ip_addr: IpAddr,
}

impl Scenario {
    pub fn new(
        config: ScenarioConfig,
        as_graph: &ASGraph,
        percent_ases_randomly_adopting: f64,
        scenario_impl: Box<dyn ScenarioTrait>,
    ) -> Self {
        let attacker_asns = config
            .override_attacker_asns
            .clone()
            .unwrap_or_else(|| scenario_impl.get_attacker_asns(as_graph));

        let legitimate_origin_asns = config
            .override_legitimate_origin_asns
            .clone()
            .unwrap_or_else(|| scenario_impl.get_legitimate_origin_asns(as_graph));

        let adopting_asns = config
            .override_adopting_asns
            .clone()
            .unwrap_or_else(|| Self::get_random_adopting_asns(as_graph, percent_ases_randomly_adopting));

        let seed_asn_ann_dict = config
            .override_seed_asn_ann_dict
            .clone()
            .unwrap_or_else(|| scenario_impl.get_seed_asn_ann_dict(as_graph));

        let roas = config.override_roas.clone().unwrap_or_else(|| scenario_impl.get_roas(as_graph));

        let dest_ip_addr = config.override_dest_ip_addr.unwrap_or_else(|| scenario_impl.get_dest_ip_addr());

        Scenario {
            config,
            percent_ases_randomly_adopting,
            scenario_impl,
            attacker_asns,
            legitimate_origin_asns,
            adopting_asns,
            seed_asn_ann_dict,
            roas,
            dest_ip_addr,
        }
    }

    fn get_random_adopting_asns(as_graph: &ASGraph, percent: f64) -> HashSet<ASN> {
        let all_asns: Vec<ASN> = as_graph.iter().map(|a| a.asn).collect();
        let num_to_adopt = ((all_asns.len() as f64) * (percent / 100.0)) as usize;

        let mut adopting = HashSet::new();
        let mut remaining = all_asns;

        for _ in 0..num_to_adopt.min(remaining.len()) {
            if remaining.is_empty() {
                break;
            }
            let idx = rand::random::<usize>() % remaining.len();
            let asn = remaining.swap_remove(idx);
            adopting.insert(asn);
        }

        adopting
    }

    pub fn name(&self) -> &str {
        self.scenario_impl.name()
    }

    pub fn min_propagation_rounds(&self) -> u32 {
        self.scenario_impl.min_propagation_rounds().max(1)
    }

    pub fn is_successful(&self, engine: &SimulationEngine) -> bool {
        self.scenario_impl.is_successful(engine)
    }

    /// Builds the per-AS settings map from the adopting ASNs and the
    /// config's default adoption settings, then hands the seed
    /// announcements and ROAs to `engine.setup` for round 0.
    pub fn setup_engine(&self, engine: &mut SimulationEngine) -> SimResult<()> {
        let adopted: SettingsSet = self
            .config
            .default_adoption_settings
            .iter()
            .filter(|(_, &enabled)| enabled)
            .map(|(&setting, _)| setting)
            .collect();

        let mut settings: HashMap<ASN, SettingsSet> = HashMap::new();
        for &asn in &self.adopting_asns {
            settings.insert(asn, adopted);
        }

        // Attacker-intrinsic settings take precedence over whatever adoption
        // assigned this ASN, since they describe the attack itself rather
        // than a defense the AS chose to run.
        let attacker_settings = self.scenario_impl.attacker_settings();
        if !attacker_settings.is_empty() {
            for &asn in &self.attacker_asns {
                let entry = settings.entry(asn).or_insert_with(SettingsSet::empty);
                for setting in attacker_settings.iter() {
                    entry.insert(setting);
                }
            }
        }

        let seeds: Vec<(ASN, Announcement)> = self
            .seed_asn_ann_dict
            .iter()
            .flat_map(|(&asn, anns)| anns.iter().cloned().map(move |ann| (asn, ann)))
            .collect();

        engine.setup(&settings, self.roas.clone(), seeds)
    }
}
