use std::collections::HashMap;

use log::{debug, info};

use crate::as_graph::{ASGraph, ASN};
use crate::error::SimResult;
use crate::route_validator::{RouteValidator, ROA};
use crate::shared::{Relationships, SettingsSet};
use crate::simulation_engine::announcement::{Announcement, PolicyStore};

/// Orchestrates one trial: clears and seeds per-AS state, then drives the
/// rank-ordered three-sweep propagation schedule. The `ASGraph` topology is
/// shared read-only across the trials of one experiment; only per-AS
/// `settings` are mutated here at setup time, once per trial, before any
/// propagation runs.
pub struct SimulationEngine<'a> {
    pub as_graph: &'a mut ASGraph,
    pub policy_store: PolicyStore,
    pub route_validator: RouteValidator,
}

impl<'a> SimulationEngine<'a> {
    pub fn new(as_graph: &'a mut ASGraph) -> Self {
        let mut policy_store = PolicyStore::new();
        let asns: Vec<ASN> = as_graph.iter().map(|a| a.asn).collect();
        for asn in asns {
            policy_store.create_policy(asn);
        }

        SimulationEngine { as_graph, policy_store, route_validator: RouteValidator::new() }
    }

    /// Round 0 setup: clear every policy's state, install the scenario's
    /// per-AS settings, load ROAs, and seed origin announcements. Only ever
    /// called once per trial -- subsequent rounds of the same trial call
    /// `run` again without re-seeding.
    pub fn setup(
        &mut self,
        settings: &HashMap<ASN, SettingsSet>,
        roas: Vec<ROA>,
        seeds: Vec<(ASN, Announcement)>,
    ) -> SimResult<()> {
        for (_, policy) in self.policy_store.iter_mut() {
            policy.local_rib.clear();
            policy.recv_q.clear();
            policy.ribs_in.clear();
            policy.ribs_out.clear();
        }

        let asns: Vec<ASN> = self.as_graph.iter().map(|a| a.asn).collect();
        for asn in asns {
            if let Some(as_obj) = self.as_graph.get_mut(&asn) {
                as_obj.settings = settings.get(&asn).copied().unwrap_or_default();
            }
        }

        self.route_validator = RouteValidator::new();
        let roa_count = roas.len();
        for roa in roas {
            self.route_validator.add_roa(roa);
        }
        info!("setup: {} ASes, {} ROAs loaded, {} seeds", self.as_graph.len(), roa_count, seeds.len());

        for (asn, ann) in seeds {
            if let Some(policy) = self.policy_store.get_mut(&asn) {
                policy.seed_ann(ann)?;
            }
        }

        Ok(())
    }

    pub fn run(&mut self, rounds: u32) {
        for round in 0..rounds {
            debug!("propagation round {round}");
            self.propagation_round();
        }
    }

    /// Three relationship sweeps per round, in Gao-Rexford valley-free
    /// order: customer routes travel up first (highest local preference),
    /// then peer routes, then provider routes down last.
    fn propagation_round(&mut self) {
        self.customer_to_provider_sweep();
        self.peer_sweep();
        self.provider_to_customer_sweep();
    }

    fn customer_to_provider_sweep(&mut self) {
        let ranks = self.as_graph.propagation_ranks.clone();
        for rank_asns in ranks.iter() {
            self.drain_rank(rank_asns);
            self.send_rank(rank_asns, Relationships::Providers);
        }
    }

    fn peer_sweep(&mut self) {
        let all_asns: Vec<ASN> = self.as_graph.iter().map(|a| a.asn).collect();
        self.send_rank(&all_asns, Relationships::Peers);
        self.drain_rank(&all_asns);
    }

    fn provider_to_customer_sweep(&mut self) {
        let ranks = self.as_graph.propagation_ranks.clone();
        for rank_asns in ranks.iter().rev() {
            self.drain_rank(rank_asns);
            self.send_rank(rank_asns, Relationships::Customers);
        }
    }

    /// Send-then-drain within a rank: every AS in `asns` finishes sending
    /// before any of them drains, so a receiver always sees the complete
    /// batch a rank sent this phase rather than a partially updated view.
    fn send_rank(&mut self, asns: &[ASN], rel: Relationships) {
        for &asn in asns {
            if let Some(mut policy) = self.policy_store.take(&asn) {
                if let Some(as_obj) = self.as_graph.get(&asn) {
                    policy.propagate_to_rel(rel, as_obj, &mut self.policy_store);
                }
                self.policy_store.put_back(asn, policy);
            }
        }
    }

    fn drain_rank(&mut self, asns: &[ASN]) {
        for &asn in asns {
            if let Some(mut policy) = self.policy_store.take(&asn) {
                if let Some(as_obj) = self.as_graph.get(&asn) {
                    policy.drain_and_install(as_obj, self.as_graph, &self.route_validator);
                }
                self.policy_store.put_back(asn, policy);
            }
        }
    }

    pub fn get_local_rib_snapshot(&self) -> HashMap<ASN, HashMap<String, Vec<ASN>>> {
        let mut snapshot = HashMap::new();

        for (asn, policy) in self.policy_store.iter() {
            let mut as_ribs = HashMap::new();
            for (prefix, ann) in &policy.local_rib {
                as_ribs.insert(prefix.to_string(), ann.as_path.clone());
            }
            snapshot.insert(*asn, as_ribs);
        }

        snapshot
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::as_graph::ASBuilder;
    use crate::prefix::Prefix;
    use crate::shared::Timestamps;
    use ipnetwork::IpNetwork;
    use std::str::FromStr;

    fn chain_graph() -> ASGraph {
        // 1 (provider) -> 2 -> 3 (stub, origin)
        let b1 = ASBuilder::new(1).with_customers(vec![2]).as_tier_1();
        let b2 = ASBuilder::new(2).with_providers(vec![1]).with_customers(vec![3]);
        let b3 = ASBuilder::new(3).with_providers(vec![2]);
        let mut graph = ASGraph::build(vec![b1, b2, b3]);
        graph.assign_as_propagation_rank();
        graph
    }

    #[test]
    fn seeded_announcement_reaches_the_whole_chain() {
        let mut graph = chain_graph();
        let prefix: Prefix = IpNetwork::from_str("1.2.0.0/16").unwrap();
        let mut engine = SimulationEngine::new(&mut graph);

        let ann = Announcement::new_with_path(prefix, vec![3], 3, Relationships::Origin, Timestamps::Victim);
        engine.setup(&HashMap::new(), Vec::new(), vec![(3, ann)]).unwrap();
        engine.run(1);

        let snapshot = engine.get_local_rib_snapshot();
        assert!(snapshot[&2].contains_key(&prefix.to_string()));
        assert!(snapshot[&1].contains_key(&prefix.to_string()));
    }
}
