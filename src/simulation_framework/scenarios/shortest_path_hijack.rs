use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::route_validator::ROA;
use crate::shared::{Relationships, Setting, SettingsSet, Timestamps};
use crate::simulation_engine::{Announcement, Prefix};
use crate::simulation_framework::scenario::ScenarioTrait;

/// Same competing announcement as `PrefixHijack`, but the attacker strips
/// its own ASN a second time off paths sent to customers
/// (`FirstAsnStrippingPrefixHijackCustomers`), so its route looks one hop
/// shorter there than the legitimate one -- winning the Gao-Rexford
/// path-length tiebreak it would otherwise lose.
pub struct ShortestPathHijack {
    pub attacker_asns: HashSet<ASN>,
    pub legitimate_origin_asns: HashSet<ASN>,
    pub prefix: Prefix,
}

impl ShortestPathHijack {
    pub fn new(attacker_asns: HashSet<ASN>, legitimate_origin_asns: HashSet<ASN>) -> Self {
        ShortestPathHijack { attacker_asns, legitimate_origin_asns, prefix: IpNetwork::from_str("1.2.3.0/24").unwrap() }
    }
}

impl ScenarioTrait for ShortestPathHijack {
    fn name(&self) -> &str {
        "ShortestPathHijack"
    }

    fn min_propagation_rounds(&self) -> u32 {
        2
    }

    fn attacker_settings(&self) -> SettingsSet {
        SettingsSet::single(Setting::FirstAsnStrippingPrefixHijackCustomers)
    }

    fn get_attacker_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.attacker_asns.clone()
    }

    fn get_legitimate_origin_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.legitimate_origin_asns.clone()
    }

    fn get_seed_asn_ann_dict(&self, _as_graph: &ASGraph) -> HashMap<ASN, Vec<Announcement>> {
        let mut seed_dict = HashMap::new();

        for &asn in self.legitimate_origin_asns.iter().chain(self.attacker_asns.iter()) {
            let ann = Announcement::new_with_path(self.prefix, vec![asn], asn, Relationships::Origin, Timestamps::Victim);
            seed_dict.insert(asn, vec![ann]);
        }

        seed_dict
    }

    fn get_roas(&self, _as_graph: &ASGraph) -> Vec<ROA> {
        self.legitimate_origin_asns.iter().map(|&asn| ROA::new(self.prefix, asn, Some(24))).collect()
    }

    fn is_successful(&self, engine: &SimulationEngine) -> bool {
        let mut attacker_reach = 0;
        let total_ases = engine.as_graph.len();

        for (_asn, policy) in engine.policy_store.iter() {
            if let Some(ann) = policy.local_rib.get(&self.prefix) {
                if self.attacker_asns.contains(&ann.origin()) {
                    attacker_reach += 1;
                }
            }
        }

        attacker_reach as f64 / total_ases as f64 > 0.5
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn attacker_gets_the_stripping_setting() {
        let scenario = ShortestPathHijack::new(HashSet::from([666]), HashSet::from([777]));
        assert!(scenario.attacker_settings().contains(Setting::FirstAsnStrippingPrefixHijackCustomers));
    }

    #[test]
    fn needs_a_second_round() {
        let scenario = ShortestPathHijack::new(HashSet::from([666]), HashSet::from([777]));
        assert_eq!(scenario.min_propagation_rounds(), 2);
    }
}
