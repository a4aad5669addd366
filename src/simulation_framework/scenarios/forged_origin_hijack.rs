use std::collections::{HashMap, HashSet};
use std::str::FromStr;

use ipnetwork::IpNetwork;

use crate::as_graph::{ASGraph, ASN};
use crate::engine::SimulationEngine;
use crate::route_validator::ROA;
use crate::shared::{Relationships, Timestamps};
use crate::simulation_engine::{Announcement, Prefix};
use crate::simulation_framework::scenario::ScenarioTrait;

/// Attacker seeds the hijacked prefix with the legitimate origin's ASN
/// already at the tail of its AS path, so `Announcement::origin` -- and
/// therefore plain ROV -- reports the real owner. Only an AS path
/// inspection (or the data-plane traceback) reveals that traffic still
/// transits the attacker.
pub struct ForgedOriginHijack {
    pub attacker_asns: HashSet<ASN>,
    pub legitimate_origin_asns: HashSet<ASN>,
    pub prefix: Prefix,
}

impl ForgedOriginHijack {
    pub fn new(attacker_asns: HashSet<ASN>, legitimate_origin_asns: HashSet<ASN>) -> Self {
        ForgedOriginHijack { attacker_asns, legitimate_origin_asns, prefix: IpNetwork::from_str("1.2.3.0/24").unwrap() }
    }
}

impl ScenarioTrait for ForgedOriginHijack {
    fn name(&self) -> &str {
        "ForgedOriginHijack"
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

        for (&attacker_asn, &legitimate_asn) in self.attacker_asns.iter().zip(self.legitimate_origin_asns.iter().cycle()) {
            // Non-empty as_path ending in the victim's ASN: `seed_ann` only
            // fills an empty path, so this survives seeding untouched and
            // the attacker's own ASN is prepended on the first hop out.
            let ann = Announcement::new_with_path(self.prefix, vec![legitimate_asn], attacker_asn, Relationships::Origin, Timestamps::Attacker);
            seed_dict.insert(attacker_asn, vec![ann]);
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
                // `origin()` reports the forged (legitimate) ASN by design --
                // success is measured by whether the attacker is still
                // somewhere on the path actually carrying the traffic.
                if self.attacker_asns.iter().any(|a| ann.as_path.contains(a)) {
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
    fn attacker_seed_reports_victim_as_origin() {
        let scenario = ForgedOriginHijack::new(HashSet::from([666]), HashSet::from([777]));
        let seeds = scenario.get_seed_asn_ann_dict(&as_graph());

        let attacker_ann = &seeds[&666][0];
        assert_eq!(attacker_ann.origin(), 777, "forged origin must report the victim's ASN, not the attacker's");
        assert!(!attacker_ann.as_path.contains(&666), "attacker's own ASN is prepended on propagation, not present at seed time");
    }

    #[test]
    fn roa_only_covers_the_real_origin() {
        let scenario = ForgedOriginHijack::new(HashSet::from([666]), HashSet::from([777]));
        let roas = scenario.get_roas(&as_graph());
        assert_eq!(roas.len(), 1);
        assert_eq!(roas[0].origin, 777);
    }
}
