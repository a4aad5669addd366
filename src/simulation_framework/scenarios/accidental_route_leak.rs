use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::route_validator::ROA;
use crate::shared::{Relationships, Timestamps};
use crate::simulation_engine::{Announcement, Prefix};
use crate::simulation_framework::scenario::ScenarioTrait;

/// Models a customer that re-announces a route it learned from a provider
/// or peer to the wrong place, rather than a forged path -- the "attacker"
/// seeds the victim's prefix carrying the victim's ASN as its own learned
/// path, which (because seeding always originates unrestricted) propagates
/// everywhere instead of being confined the way a real BGP export policy
/// would confine it. No ROV-visible forgery: `origin()` is the victim's
/// own ASN the whole way, so only path-shape defenses (Path-End,
/// PeerLock-Lite, Only-To-Customers) catch it.
pub struct AccidentalRouteLeak {
    pub attacker_asns: HashSet<ASN>,
    pub legitimate_origin_asns: HashSet<ASN>,
    pub prefix: Prefix,
}

impl AccidentalRouteLeak {
    pub fn new(attacker_asns: HashSet<ASN>, legitimate_origin_asns: HashSet<ASN>) -> Self {
        AccidentalRouteLeak { attacker_asns, legitimate_origin_asns, prefix: IpNetwork::from_str("1.2.3.0/24").unwrap() }
    }
}

impl ScenarioTrait for AccidentalRouteLeak {
    fn name(&self) -> &str {
        "AccidentalRouteLeak"
    }

    fn min_propagation_rounds(&self) -> u32 {
        2
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
            let ann = Announcement::new_with_path(self.prefix, vec![asn], asn, Relationships::Origin, Timestamps::Victim);
            seed_dict.insert(asn, vec![ann]);
        }

        for (&leaker_asn, &victim_asn) in self.attacker_asns.iter().zip(self.legitimate_origin_asns.iter().cycle()) {
            // A real leak would copy the path the leaker actually learned
            // from the victim; round 0 stands in for "the leaker already
            // has this route" since there is no separate learn-then-leak
            // step in a single setup pass.
            let ann = Announcement::new_with_path(self.prefix, vec![victim_asn], leaker_asn, Relationships::Origin, Timestamps::Attacker);
            seed_dict.insert(leaker_asn, vec![ann]);
        }

        seed_dict
    }

    fn get_roas(&self, _as_graph: &ASGraph) -> Vec<ROA> {
        self.legitimate_origin_asns.iter().map(|&asn| ROA::new(self.prefix, asn, Some(24))).collect()
    }

    fn is_successful(&self, engine: &SimulationEngine) -> bool {
        let mut leaked_reach = 0;
        let total_ases = engine.as_graph.len();

        for (asn, policy) in engine.policy_store.iter() {
            if self.attacker_asns.contains(asn) || self.legitimate_origin_asns.contains(asn) {
                continue;
            }
            if let Some(ann) = policy.local_rib.get(&self.prefix) {
                if self.attacker_asns.iter().any(|a| ann.as_path.contains(a)) {
                    leaked_reach += 1;
                }
            }
        }

        leaked_reach as f64 / total_ases as f64 > 0.1
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
    fn leaked_announcement_still_names_the_real_origin() {
        let scenario = AccidentalRouteLeak::new(HashSet::from([666]), HashSet::from([777]));
        let seeds = scenario.get_seed_asn_ann_dict(&as_graph());

        let leaked_ann = &seeds[&666][0];
        assert_eq!(leaked_ann.origin(), 777, "a leak doesn't forge origin, it just exports somewhere it shouldn't");
    }

    #[test]
    fn needs_a_second_round() {
        let scenario = AccidentalRouteLeak::new(HashSet::from([666]), HashSet::from([777]));
        assert_eq!(scenario.min_propagation_rounds(), 2);
    }
}
