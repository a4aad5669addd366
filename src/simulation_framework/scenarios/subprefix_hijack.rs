use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::route_validator::ROA;
use crate::shared::{Relationships, Timestamps};
use crate::simulation_engine::{Announcement, Prefix};
use crate::simulation_framework::scenario::ScenarioTrait;

/// Attacker announces a more specific prefix than the legitimate origin, so
/// longest-prefix-match routes traffic to the attacker everywhere the
/// hijack propagates, regardless of path preference.
pub struct SubprefixHijack {
    pub attacker_asns: HashSet<ASN>,
    pub legitimate_origin_asns: HashSet<ASN>,
    pub legitimate_prefix: Prefix,
    pub hijacked_prefix: Prefix,
}

impl SubprefixHijack {
    pub fn new(attacker_asns: HashSet<ASN>, legitimate_origin_asns: HashSet<ASN>) -> Self {
        SubprefixHijack {
            attacker_asns,
            legitimate_origin_asns,
            legitimate_prefix: IpNetwork::from_str("1.2.3.0/24").unwrap(),
            hijacked_prefix: IpNetwork::from_str("1.2.3.0/25").unwrap(),
        }
    }
}

impl ScenarioTrait for SubprefixHijack {
    fn name(&self) -> &str {
        "SubprefixHijack"
    }

    fn get_attacker_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.attacker_asns.clone()
    }

    fn get_legitimate_origin_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.legitimate_origin_asns.clone()
    }

    fn get_seed_asn_ann_dict(&self, _as_graph: &ASGraph) -> HashMap<ASN, Vec<Announcement>> {
        let mut seed_dict = HashMap::new();

        for &asn in &self.legitimate_origin_asns {
            let ann = Announcement::new_with_path(
                self.legitimate_prefix,
                vec![asn],
                asn,
                Relationships::Origin,
                Timestamps::Victim,
            );
            seed_dict.insert(asn, vec![ann]);
        }

        for &asn in &self.attacker_asns {
            let ann = Announcement::new_with_path(
                self.hijacked_prefix,
                vec![asn],
                asn,
                Relationships::Origin,
                Timestamps::Victim,
            );
            seed_dict.insert(asn, vec![ann]);
        }

        seed_dict
    }

    fn get_roas(&self, _as_graph: &ASGraph) -> Vec<ROA> {
        self.legitimate_origin_asns.iter().map(|&asn| ROA::new(self.legitimate_prefix, asn, Some(24))).collect()
    }

    fn is_successful(&self, engine: &SimulationEngine) -> bool {
        let mut attacker_reach = 0;
        let total_ases = engine.as_graph.len();

        for (_asn, policy) in engine.policy_store.iter() {
            if let Some(ann) = policy.local_rib.get(&self.hijacked_prefix) {
                if self.attacker_asns.contains(&ann.origin()) {
                    attacker_reach += 1;
                }
            }
        }

        let success_ratio = attacker_reach as f64 / total_ases as f64;
        success_ratio > 0.5
    }
}
