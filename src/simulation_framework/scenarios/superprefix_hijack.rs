use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::route_validator::ROA;
use crate::shared::{Relationships, Timestamps};
use crate::simulation_engine::{Announcement, Prefix};
use crate::simulation_framework::scenario::ScenarioTrait;

/// Attacker announces a prefix covering address space nobody else routes --
/// there is no more-specific competing announcement for longest-prefix-match
/// to prefer, so the attacker wins everywhere its announcement propagates.
/// The covered space carries a non-routed ROA (origin 0), the RPKI
/// convention for "this should never appear on the wire."
pub struct SuperprefixHijack {
    pub attacker_asns: HashSet<ASN>,
    pub legitimate_origin_asns: HashSet<ASN>,
    pub dark_prefix: Prefix,
}

impl SuperprefixHijack {
    pub fn new(attacker_asns: HashSet<ASN>, legitimate_origin_asns: HashSet<ASN>) -> Self {
        SuperprefixHijack { attacker_asns, legitimate_origin_asns, dark_prefix: IpNetwork::from_str("1.2.0.0/16").unwrap() }
    }
}

impl ScenarioTrait for SuperprefixHijack {
    fn name(&self) -> &str {
        "SuperprefixHijack"
    }

    fn get_attacker_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.attacker_asns.clone()
    }

    fn get_legitimate_origin_asns(&self, _as_graph: &ASGraph) -> HashSet<ASN> {
        self.legitimate_origin_asns.clone()
    }

    fn get_seed_asn_ann_dict(&self, _as_graph: &ASGraph) -> HashMap<ASN, Vec<Announcement>> {
        let mut seed_dict = HashMap::new();

        for &asn in &self.attacker_asns {
            let ann = Announcement::new_with_path(self.dark_prefix, vec![asn], asn, Relationships::Origin, Timestamps::Attacker);
            seed_dict.insert(asn, vec![ann]);
        }

        seed_dict
    }

    fn get_roas(&self, _as_graph: &ASGraph) -> Vec<ROA> {
        vec![ROA::new(self.dark_prefix, 0, None)]
    }

    fn is_successful(&self, engine: &SimulationEngine) -> bool {
        let mut attacker_reach = 0;
        let total_ases = engine.as_graph.len();

        for (_asn, policy) in engine.policy_store.iter() {
            if let Some(ann) = policy.local_rib.get(&self.dark_prefix) {
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
    use crate::as_graph::ASBuilder;

    fn as_graph() -> ASGraph {
        ASGraph::build(vec![ASBuilder::new(1).as_tier_1()])
    }

    #[test]
    fn roa_marks_dark_prefix_non_routed() {
        let scenario = SuperprefixHijack::new(HashSet::from([666]), HashSet::from([777]));
        let roas = scenario.get_roas(&as_graph());
        assert_eq!(roas.len(), 1);
        assert!(roas[0].is_non_routed());
        assert!(roas[0].covers_prefix(&scenario.dark_prefix));
    }

    #[test]
    fn only_the_attacker_originates() {
        let scenario = SuperprefixHijack::new(HashSet::from([666]), HashSet::from([777]));
        let seeds = scenario.get_seed_asn_ann_dict(&as_graph());
        assert_eq!(seeds.len(), 1);
        assert!(seeds.contains_key(&666));
        assert_eq!(seeds[&666][0].origin(), 666);
    }
}
