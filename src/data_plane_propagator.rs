use std::collections::{HashMap, HashSet};

use crate::as_graph::{AS, ASN};
use crate::engine::SimulationEngine;
use crate::prefix::{covers_addr, IPAddr};
use crate::shared::{Outcomes, Relationships};
use crate::simulation_engine::announcement::Policy;
use crate::simulation_engine::Announcement;

const MAX_TRACEBACK_HOPS: usize = 64;

/// Walks the forwarding path each AS would actually take toward `dst`,
/// classifying it by where that path lands: an attacker, a legitimate
/// origin, nowhere (`Disconnected`), or a forwarding cycle
/// (`DataPlaneLoop`). Distinct from a control-plane `local_rib` lookup: an
/// AS can hold a route that looks fine while its *next hop* forwards
/// somewhere else entirely, which is how origin-spoofing attacks succeed.
pub struct DataPlanePropagator<'a, 'g> {
    engine: &'a SimulationEngine<'g>,
    attacker_asns: &'a HashSet<ASN>,
    legitimate_origin_asns: &'a HashSet<ASN>,
    dst: IPAddr,
    resolved: HashMap<ASN, Outcomes>,
}

impl<'a, 'g> DataPlanePropagator<'a, 'g> {
    pub fn new(
        engine: &'a SimulationEngine<'g>,
        attacker_asns: &'a HashSet<ASN>,
        legitimate_origin_asns: &'a HashSet<ASN>,
        dst: IPAddr,
    ) -> Self {
        DataPlanePropagator { engine, attacker_asns, legitimate_origin_asns, dst, resolved: HashMap::new() }
    }

    /// Classifies every AS in the graph and returns the full map.
    pub fn run(mut self) -> HashMap<ASN, Outcomes> {
        let asns: Vec<ASN> = self.engine.policy_store.iter().map(|(&asn, _)| asn).collect();
        for asn in asns {
            if !self.resolved.contains_key(&asn) {
                let mut visited = Vec::new();
                let outcome = self.trace(asn, &mut visited);
                self.resolved.insert(asn, outcome);
            }
        }
        self.resolved
    }

    fn trace(&mut self, asn: ASN, visited: &mut Vec<ASN>) -> Outcomes {
        if let Some(&outcome) = self.resolved.get(&asn) {
            return outcome;
        }
        if self.attacker_asns.contains(&asn) {
            return Outcomes::AttackerSuccess;
        }
        if self.legitimate_origin_asns.contains(&asn) {
            return Outcomes::LegitimateOriginSuccess;
        }

        let as_obj = match self.engine.as_graph.get(&asn) {
            Some(a) => a,
            None => return Outcomes::Disconnected,
        };
        let policy = match self.engine.policy_store.get(&asn) {
            Some(p) => p,
            None => return Outcomes::Disconnected,
        };

        let ann = match Self::most_specific_ann(policy, &self.dst) {
            Some(ann) => ann,
            None => return Outcomes::Disconnected,
        };

        if ann.as_path.len() == 1 || ann.recv_relationship == Relationships::Origin || ann.next_hop_asn == asn {
            return Outcomes::Disconnected;
        }
        if !Self::passes_sav(as_obj, ann.next_hop_asn) {
            return Outcomes::Disconnected;
        }

        if visited.contains(&asn) || visited.len() > MAX_TRACEBACK_HOPS {
            return Outcomes::DataPlaneLoop;
        }
        visited.push(asn);

        let next_hop = ann.next_hop_asn;
        let outcome = self.trace(next_hop, visited);
        self.resolved.insert(asn, outcome);
        outcome
    }

    /// Longest-prefix match over the local RIB against `dst`.
    fn most_specific_ann<'p>(policy: &'p Policy, dst: &IPAddr) -> Option<&'p Announcement> {
        policy.local_rib.iter().filter(|(prefix, _)| covers_addr(prefix, dst)).max_by_key(|(prefix, _)| prefix.prefix()).map(|(_, ann)| ann)
    }

    /// Source address validation, reduced (no physical interfaces modeled
    /// here) to: is the chosen next hop actually one of our neighbors.
    fn passes_sav(as_obj: &AS, next_hop_asn: ASN) -> bool {
        as_obj.neighbor_asns().any(|&n| n == next_hop_asn)
    }
}
