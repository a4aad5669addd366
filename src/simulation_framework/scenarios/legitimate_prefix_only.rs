use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::route_validator::ROA;
use crate::shared::{Relationships, Timestamps};
use crate::simulation_engine::Announcement;
use crate::simulation_framework::scenario::ScenarioTrait;

/// No attacker: only the legitimate origin announces. Useful as a control
/// run to measure baseline reachability against an attack scenario's.
pub struct LegitimatePrefixOnly {
    legitimate_origin_asns: HashSet<ASN>,
}

impl LegitimatePrefixOnly {
    pub fn new(legitimate_origin_asns: HashSet<ASN>) -> Self {
        LegitimatePrefixOnly { legitimate_origin_asns }
    }
}

impl ScenarioTrait for LegitimatePrefixOnly {
    fn name(&self) -> &str {
        "LegitimatePrefixOnly"
    }

    fn get_attacker_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        HashSet::new()
    }

    fn get_legitimate_origin_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.legitimate_origin_asns.clone()
    }

    fn get_seed_asn_ann_dict(&self, _as_graph: &ASGraph) -> HashMap<ASN, Vec<Announcement>> {
        let mut seed_dict = HashMap::new();
        let prefix = IpNetwork::from_str("10.0.0.0/24").unwrap();

        for &asn in &self.legitimate_origin_asns {
            let ann = Announcement::new_with_path(prefix, vec![asn], asn, Relationships::Origin, Timestamps::Victim);
            seed_dict.insert(asn, vec![ann]);
        }

        seed_dict
    }

    fn get_roas(&self, _as_graph: &ASGraph) -> Vec<ROA> {
        let prefix = IpNetwork::from_str("10.0.0.0/24").unwrap();
        self.legitimate_origin_asns.iter().map(|&asn| ROA::new(prefix, asn, Some(24))).collect()
    }

    fn is_successful(&self, engine: &SimulationEngine) -> bool {
        let legitimate_prefix = IpNetwork::from_str("10.0.0.0/24").unwrap();

        let mut has_routes = 0;
        let total_ases = engine.as_graph.len();

        for (_, policy) in engine.policy_store.iter() {
            if policy.local_rib.contains_key(&legitimate_prefix) {
                has_routes += 1;
            }
        }

        has_routes as f64 / total_ases as f64 > 0.8
    }
}
