use std::collections::{HashMap, HashSet};

use crate::shared::{ASNGroups, Relationships, SettingsSet};

pub type ASN = u32;

/// A single AS in the graph. Neighbors are stored as ASNs rather than
/// references; callers resolve them through `ASGraph::get` by index. This
/// trades one extra hashmap lookup per neighbor walk for a graph with no
/// unsafe code and no self-referential lifetime.
///
/// `settings` lives here, not on `Policy`, because extensions like ASPA and
/// PeerLock-Lite need to ask "does *that other* AS adopt this extension?" --
/// a question that's only answerable cheaply if adoption is a property of
/// the graph, not of per-AS simulation state that would require threading a
/// `PolicyStore` reference through every validity check.
#[derive(Debug, Clone)]
pub struct AS {
    pub asn: ASN,
    pub peer_asns: Vec<ASN>,
    pub provider_asns: Vec<ASN>,
    pub customer_asns: Vec<ASN>,
    pub tier_1: bool,
    pub ixp: bool,
    pub provider_cone_asns: HashSet<ASN>,
    pub propagation_rank: Option<u32>,
    pub settings: SettingsSet,
}

impl AS {
    pub fn neighbor_asns(&self) -> impl Iterator<Item = &ASN> {
        self.peer_asns.iter().chain(self.provider_asns.iter()).chain(self.customer_asns.iter())
    }

    /// Stub: exactly one neighbor total, of any relationship.
    pub fn is_stub(&self) -> bool {
        self.neighbor_asns().count() == 1
    }

    /// Multihomed: no customers, but more than one peer/provider -- it has a
    /// choice of upstream, unlike a single-homed stub.
    pub fn is_multihomed(&self) -> bool {
        self.customer_asns.is_empty() && (self.peer_asns.len() + self.provider_asns.len()) > 1
    }

    /// Transit: has customers and more than one neighbor overall.
    pub fn is_transit(&self) -> bool {
        !self.customer_asns.is_empty()
            && (self.peer_asns.len() + self.provider_asns.len() + self.customer_asns.len()) > 1
    }

    pub fn asns_by_relationship(&self, relationship: Relationships) -> &[ASN] {
        match relationship {
            Relationships::Customers => &self.customer_asns,
            Relationships::Peers => &self.peer_asns,
            Relationships::Providers => &self.provider_asns,
            _ => &[],
        }
    }
}

/// Builder used to describe one AS's relationships before the graph is
/// assembled. `ASGraph::build` takes ownership of a `Vec<ASBuilder>`.
#[derive(Debug, Clone)]
pub struct ASBuilder {
    pub asn: ASN,
    pub peer_asns: Vec<ASN>,
    pub provider_asns: Vec<ASN>,
    pub customer_asns: Vec<ASN>,
    pub tier_1: bool,
    pub ixp: bool,
    pub settings: SettingsSet,
}

impl ASBuilder {
    pub fn new(asn: ASN) -> Self {
        ASBuilder {
            asn,
            peer_asns: Vec::new(),
            provider_asns: Vec::new(),
            customer_asns: Vec::new(),
            tier_1: false,
            ixp: false,
            settings: SettingsSet::empty(),
        }
    }

    pub fn with_settings(mut self, settings: SettingsSet) -> Self {
        self.settings = settings;
        self
    }

    pub fn with_peers(mut self, peers: Vec<ASN>) -> Self {
        self.peer_asns = peers;
        self
    }

    pub fn with_providers(mut self, providers: Vec<ASN>) -> Self {
        self.provider_asns = providers;
        self
    }

    pub fn with_customers(mut self, customers: Vec<ASN>) -> Self {
        self.customer_asns = customers;
        self
    }

    pub fn as_tier_1(mut self) -> Self {
        self.tier_1 = true;
        self
    }

    pub fn as_ixp(mut self) -> Self {
        self.ixp = true;
        self
    }

    pub fn from_asn_sets(
        asn: ASN,
        peers: HashSet<ASN>,
        providers: HashSet<ASN>,
        customers: HashSet<ASN>,
    ) -> Self {
        ASBuilder {
            asn,
            peer_asns: peers.into_iter().collect(),
            provider_asns: providers.into_iter().collect(),
            customer_asns: customers.into_iter().collect(),
            tier_1: false,
            ixp: false,
            settings: SettingsSet::empty(),
        }
    }
}

/// An AS graph: a safe arena of `AS` values, indexed by ASN. Replaces the
/// starting code's raw-pointer arena -- no `unsafe`, no self-referential
/// lifetimes, at the cost of one hashmap lookup per neighbor resolution.
#[derive(Debug, Clone)]
pub struct ASGraph {
    ases: Vec<AS>,
    asn_to_index: HashMap<ASN, usize>,
    pub propagation_ranks: Vec<Vec<ASN>>,
    pub asn_groups: HashMap<ASNGroups, HashSet<ASN>>,
}

impl ASGraph {
    pub fn new() -> Self {
        ASGraph {
            ases: Vec::new(),
            asn_to_index: HashMap::new(),
            propagation_ranks: Vec::new(),
            asn_groups: HashMap::new(),
        }
    }

    pub fn build(builders: Vec<ASBuilder>) -> ASGraph {
        let mut ases = Vec::with_capacity(builders.len());
        let mut asn_to_index = HashMap::with_capacity(builders.len());

        for (i, builder) in builders.iter().enumerate() {
            asn_to_index.insert(builder.asn, i);
            ases.push(AS {
                asn: builder.asn,
                peer_asns: builder.peer_asns.clone(),
                provider_asns: builder.provider_asns.clone(),
                customer_asns: builder.customer_asns.clone(),
                tier_1: builder.tier_1,
                ixp: builder.ixp,
                provider_cone_asns: HashSet::new(),
                propagation_rank: None,
                settings: builder.settings,
            });
        }

        ASGraph {
            ases,
            asn_to_index,
            propagation_ranks: Vec::new(),
            asn_groups: HashMap::new(),
        }
    }

    pub fn get(&self, asn: &ASN) -> Option<&AS> {
        self.asn_to_index.get(asn).map(|&i| &self.ases[i])
    }

    pub fn get_mut(&mut self, asn: &ASN) -> Option<&mut AS> {
        self.asn_to_index.get(asn).copied().map(move |i| &mut self.ases[i])
    }

    pub fn iter(&self) -> impl Iterator<Item = &AS> {
        self.ases.iter()
    }

    pub fn len(&self) -> usize {
        self.ases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ases.is_empty()
    }

    pub fn add_as_from_builder(&mut self, builder: ASBuilder) {
        let index = self.ases.len();
        self.asn_to_index.insert(builder.asn, index);
        self.ases.push(AS {
            asn: builder.asn,
            peer_asns: builder.peer_asns,
            provider_asns: builder.provider_asns,
            customer_asns: builder.customer_asns,
            tier_1: builder.tier_1,
            ixp: builder.ixp,
            provider_cone_asns: HashSet::new(),
            propagation_rank: None,
            settings: builder.settings,
        });
    }

    /// Real cycle detection: a DFS with an explicit recursion stack, run
    /// separately over the provider edges and the customer edges (they are
    /// each supposed to form a DAG; peer edges cannot cycle since there is
    /// only one relationship type between any two peers).
    pub fn check_for_cycles(&self) -> Result<(), String> {
        self.check_for_cycles_along(|a| &a.provider_asns, "provider")?;
        self.check_for_cycles_along(|a| &a.customer_asns, "customer")?;
        Ok(())
    }

    fn check_for_cycles_along(
        &self,
        edges: impl Fn(&AS) -> &Vec<ASN>,
        label: &str,
    ) -> Result<(), String> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            InProgress,
            Done,
        }
        let mut marks: HashMap<ASN, Mark> = HashMap::new();

        for as_obj in self.iter() {
            if marks.contains_key(&as_obj.asn) {
                continue;
            }
            let mut stack = vec![(as_obj.asn, edges(as_obj).clone().into_iter())];
            marks.insert(as_obj.asn, Mark::InProgress);

            while let Some((asn, mut children)) = stack.pop() {
                if let Some(child) = children.next() {
                    stack.push((asn, children));
                    match marks.get(&child) {
                        Some(Mark::InProgress) => {
                            return Err(format!(
                                "{} cycle detected in AS graph involving AS{}",
                                label, child
                            ));
                        }
                        Some(Mark::Done) => continue,
                        None => {
                            marks.insert(child, Mark::InProgress);
                            if let Some(child_as) = self.get(&child) {
                                stack.push((child, edges(child_as).clone().into_iter()));
                            }
                        }
                    }
                } else {
                    marks.insert(asn, Mark::Done);
                }
            }
        }
        Ok(())
    }

    /// Propagation rank: leaves (no customers) start at rank 0; a provider's
    /// rank is one more than the highest rank among its customers. ASes with
    /// no providers end up at the highest ranks (tier 1, typically).
    pub fn assign_as_propagation_rank(&mut self) {
        let mut rank: HashMap<ASN, u32> = HashMap::new();
        let asns: Vec<ASN> = self.ases.iter().map(|a| a.asn).collect();

        fn compute(
            asn: ASN,
            graph: &ASGraph,
            rank: &mut HashMap<ASN, u32>,
            visiting: &mut HashSet<ASN>,
        ) -> u32 {
            if let Some(&r) = rank.get(&asn) {
                return r;
            }
            // Guard against feeding a cyclic graph here; check_for_cycles
            // should already have rejected it, but don't infinite-loop if not.
            if !visiting.insert(asn) {
                return 0;
            }
            let as_obj = graph.get(&asn);
            let r = match as_obj {
                None => 0,
                Some(a) if a.customer_asns.is_empty() => 0,
                Some(a) => a
                    .customer_asns
                    .iter()
                    .map(|c| compute(*c, graph, rank, visiting) + 1)
                    .max()
                    .unwrap_or(0),
            };
            visiting.remove(&asn);
            rank.insert(asn, r);
            r
        }

        let mut visiting = HashSet::new();
        for asn in &asns {
            compute(*asn, self, &mut rank, &mut visiting);
        }

        let max_rank = rank.values().copied().max().unwrap_or(0);
        let mut rank_groups: Vec<Vec<ASN>> = vec![Vec::new(); (max_rank + 1) as usize];
        for asn in &asns {
            let r = rank[asn];
            rank_groups[r as usize].push(*asn);
            if let Some(a) = self.get_mut(asn) {
                a.propagation_rank = Some(r);
            }
        }
        self.propagation_ranks = rank_groups;
    }

    /// Transitive closure over provider edges: an AS's provider cone is
    /// every AS reachable by repeatedly following providers. Sound because
    /// the provider graph is acyclic once `check_for_cycles` has passed.
    pub fn add_provider_cone_asns(&mut self) {
        let asns: Vec<ASN> = self.ases.iter().map(|a| a.asn).collect();
        let mut memo: HashMap<ASN, HashSet<ASN>> = HashMap::new();

        fn cone(asn: ASN, graph: &ASGraph, memo: &mut HashMap<ASN, HashSet<ASN>>) -> HashSet<ASN> {
            if let Some(c) = memo.get(&asn) {
                return c.clone();
            }
            let mut result = HashSet::new();
            if let Some(a) = graph.get(&asn) {
                for provider in a.provider_asns.clone() {
                    result.insert(provider);
                    result.extend(cone(provider, graph, memo));
                }
            }
            memo.insert(asn, result.clone());
            result
        }

        for asn in &asns {
            let c = cone(*asn, self, &mut memo);
            memo.insert(*asn, c);
        }

        for asn in &asns {
            let cone_set = memo.remove(asn).unwrap_or_default();
            if let Some(a) = self.get_mut(asn) {
                a.provider_cone_asns = cone_set;
            }
        }
    }

    /// Derives the ASN groupings (TIER_1, IXPS, STUBS, MULTIHOMED,
    /// STUBS_OR_MH, TRANSIT, ETC, ALL_WOUT_IXPS) from each AS's relationships.
    pub fn add_asn_groups(&mut self) {
        let mut groups: HashMap<ASNGroups, HashSet<ASN>> = HashMap::new();
        for g in [
            ASNGroups::Tier1,
            ASNGroups::Ixps,
            ASNGroups::Stubs,
            ASNGroups::Multihomed,
            ASNGroups::StubsOrMh,
            ASNGroups::Transit,
            ASNGroups::Etc,
            ASNGroups::AllWoutIxps,
        ] {
            groups.insert(g, HashSet::new());
        }

        for as_obj in &self.ases {
            if as_obj.ixp {
                groups.get_mut(&ASNGroups::Ixps).unwrap().insert(as_obj.asn);
                continue;
            }
            groups.get_mut(&ASNGroups::AllWoutIxps).unwrap().insert(as_obj.asn);

            if as_obj.tier_1 {
                groups.get_mut(&ASNGroups::Tier1).unwrap().insert(as_obj.asn);
            }
            if as_obj.is_stub() {
                groups.get_mut(&ASNGroups::Stubs).unwrap().insert(as_obj.asn);
                groups.get_mut(&ASNGroups::StubsOrMh).unwrap().insert(as_obj.asn);
            } else if as_obj.is_multihomed() {
                groups.get_mut(&ASNGroups::Multihomed).unwrap().insert(as_obj.asn);
                groups.get_mut(&ASNGroups::StubsOrMh).unwrap().insert(as_obj.asn);
            } else if as_obj.is_transit() {
                groups.get_mut(&ASNGroups::Transit).unwrap().insert(as_obj.asn);
            } else {
                groups.get_mut(&ASNGroups::Etc).unwrap().insert(as_obj.asn);
            }
        }

        self.asn_groups = groups;
    }
}

impl Default for ASGraph {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chain_graph() -> ASGraph {
        // 1 (tier1) -> provider of 2 -> provider of 3 (stub)
        let b1 = ASBuilder::new(1).with_customers(vec![2]).as_tier_1();
        let b2 = ASBuilder::new(2).with_providers(vec![1]).with_customers(vec![3]);
        let b3 = ASBuilder::new(3).with_providers(vec![2]);
        ASGraph::build(vec![b1, b2, b3])
    }

    #[test]
    fn propagation_rank_ascends_from_leaves() {
        let mut graph = chain_graph();
        graph.assign_as_propagation_rank();
        assert_eq!(graph.get(&3).unwrap().propagation_rank, Some(0));
        assert_eq!(graph.get(&2).unwrap().propagation_rank, Some(1));
        assert_eq!(graph.get(&1).unwrap().propagation_rank, Some(2));
    }

    #[test]
    fn detects_provider_cycle() {
        let b1 = ASBuilder::new(1).with_providers(vec![2]);
        let b2 = ASBuilder::new(2).with_providers(vec![1]);
        let graph = ASGraph::build(vec![b1, b2]);
        assert!(graph.check_for_cycles().is_err());
    }

    #[test]
    fn provider_cone_is_transitive() {
        let mut graph = chain_graph();
        graph.add_provider_cone_asns();
        let cone = &graph.get(&3).unwrap().provider_cone_asns;
        assert!(cone.contains(&2));
        assert!(cone.contains(&1));
    }

    #[test]
    fn asn_groups_classify_stub_and_tier1() {
        let mut graph = chain_graph();
        graph.add_asn_groups();
        assert!(graph.asn_groups[&ASNGroups::Tier1].contains(&1));
        assert!(graph.asn_groups[&ASNGroups::Stubs].contains(&3));
    }
}
