use std::collections::{HashMap, VecDeque};

use crate::as_graph::{AS, ASGraph, ASN};
use crate::error::SimError;
use crate::prefix::Prefix;
use crate::route_validator::RouteValidator;
use crate::shared::{Relationships, Setting, Timestamps};
use crate::simulation_engine::policy::policy_extensions::{
    as_path_edge_filter, aspa, asra, bgp, bgpsec, enforce_first_as, only_to_customers, path_end,
    peerlock_lite, prefix_hijack_attacker, provider_cone_id, rov, rovpp, peer_rov,
};

#[derive(Debug, Clone)]
pub struct Announcement {
    pub prefix: Prefix,
    pub as_path: Vec<ASN>,
    pub next_hop_asn: ASN,
    pub recv_relationship: Relationships,
    pub timestamp: Timestamps,
    pub withdraw: bool,
    pub bgpsec_next_asn: Option<ASN>,
    pub bgpsec_as_path: Option<Vec<ASN>>,
    /// The attesting ASN, not a bare flag: a receiver needs to know *which*
    /// AS set Only-To-Customers to check it arrived on that AS's session.
    pub only_to_customers: Option<ASN>,
    pub rovpp_blackhole: Option<bool>,
    pub rost_ids: Option<Vec<u32>>,
}

impl Announcement {
    pub fn new(prefix: Prefix, next_hop_asn: ASN, recv_relationship: Relationships) -> Self {
        Announcement {
            prefix,
            as_path: Vec::new(),
            next_hop_asn,
            recv_relationship,
            timestamp: Timestamps::Victim,
            withdraw: false,
            bgpsec_next_asn: None,
            bgpsec_as_path: None,
            only_to_customers: None,
            rovpp_blackhole: None,
            rost_ids: None,
        }
    }

    pub fn new_with_path(
        prefix: Prefix,
        as_path: Vec<ASN>,
        next_hop_asn: ASN,
        recv_relationship: Relationships,
        timestamp: Timestamps,
    ) -> Self {
        Announcement {
            prefix,
            as_path,
            next_hop_asn,
            recv_relationship,
            timestamp,
            withdraw: false,
            bgpsec_next_asn: None,
            bgpsec_as_path: None,
            only_to_customers: None,
            rovpp_blackhole: None,
            rost_ids: None,
        }
    }

    pub fn origin(&self) -> ASN {
        self.as_path.last().copied().unwrap_or(self.next_hop_asn)
    }

    pub fn copy(&self) -> Self {
        self.clone()
    }

    pub fn copy_and_process(&self, next_hop_asn: ASN, recv_relationship: Relationships) -> Self {
        let mut new_ann = self.clone();

        if !new_ann.withdraw {
            new_ann.as_path.insert(0, next_hop_asn);
            if let Some(ref mut bgpsec_path) = new_ann.bgpsec_as_path {
                bgpsec_path.insert(0, next_hop_asn);
            }
        }

        new_ann.next_hop_asn = next_hop_asn;
        new_ann.recv_relationship = recv_relationship;
        new_ann.bgpsec_next_asn = Some(next_hop_asn);

        new_ann
    }
}

#[derive(Debug)]
pub struct AnnInfo {
    pub ann: Announcement,
    pub recv_relationship: Relationships,
}

impl AnnInfo {
    pub fn new(ann: Announcement, recv_relationship: Relationships) -> Self {
        AnnInfo { ann, recv_relationship }
    }
}

pub type RIBsIn = HashMap<ASN, HashMap<Prefix, Announcement>>;
pub type RIBsOut = HashMap<ASN, HashMap<Prefix, Announcement>>;
pub type LocalRIB = HashMap<Prefix, Announcement>;

/// Per-AS routing state. Which extensions apply lives on `AS::settings` in
/// the graph, not here -- see the comment on that field for why.
pub struct Policy {
    pub local_rib: LocalRIB,
    pub recv_q: VecDeque<AnnInfo>,
    pub ribs_in: RIBsIn,
    pub ribs_out: RIBsOut,
    pub asn: ASN,
}

impl Policy {
    pub fn new(asn: ASN) -> Self {
        Policy {
            local_rib: HashMap::new(),
            recv_q: VecDeque::new(),
            ribs_in: HashMap::new(),
            ribs_out: HashMap::new(),
            asn,
        }
    }

    pub fn receive_ann(&mut self, ann: Announcement, recv_relationship: Relationships) {
        self.recv_q.push_back(AnnInfo::new(ann, recv_relationship));
    }

    /// Drains `recv_q` and installs whatever wins into `local_rib`. Never
    /// sends anything -- sending only happens on explicit `propagate_to_*`
    /// calls, so the engine can enforce the rank-ordered sweep schedule
    /// (drain a rank, then send from it) without this method racing ahead.
    pub fn drain_and_install(&mut self, as_obj: &AS, as_graph: &ASGraph, route_validator: &RouteValidator) {
        let anns_to_process: Vec<AnnInfo> = self.recv_q.drain(..).collect();

        for ann_info in anns_to_process {
            debug_assert!(
                ann_info.recv_relationship != Relationships::Unknown,
                "an announcement must never reach processing with an unresolved relationship"
            );
            if self.valid_ann(&ann_info.ann, ann_info.recv_relationship, as_obj, as_graph, route_validator) {
                self.install_ann(ann_info.ann, as_obj);
            } else if as_obj.settings.contains(Setting::RovppV1Lite)
                || as_obj.settings.contains(Setting::RovppV2Lite)
                || as_obj.settings.contains(Setting::RovppV2iLite)
            {
                let hole = rovpp::blackhole_ann(&ann_info.ann, as_obj.asn);
                self.install_ann(hole, as_obj);
            }
        }
    }

    /// The composed validity chain: every enabled extension gets a veto,
    /// evaluated in a fixed precedence order so the checks that are cheapest
    /// and most fundamental (loop/path-shape) run before the ones that need
    /// graph or ROA lookups.
    pub fn valid_ann(
        &self,
        ann: &Announcement,
        recv_relationship: Relationships,
        as_obj: &AS,
        as_graph: &ASGraph,
        route_validator: &RouteValidator,
    ) -> bool {
        if !bgp::is_valid(ann, recv_relationship, as_obj) {
            return false;
        }
        if ann.withdraw {
            return true;
        }

        let settings = &as_obj.settings;

        if settings.contains(Setting::EnforceFirstAs) && !enforce_first_as::is_valid(ann, as_obj) {
            return false;
        }
        if settings.contains(Setting::AsPathEdgeFilter) && !as_path_edge_filter::is_valid(ann, as_obj.asn, as_graph) {
            return false;
        }
        if settings.contains(Setting::OnlyToCustomers) && !only_to_customers::is_valid(ann, recv_relationship) {
            return false;
        }
        if settings.contains(Setting::PathEnd) && !path_end::is_valid(ann, route_validator, as_graph) {
            return false;
        }
        if settings.contains(Setting::PeerLockLite) && !peerlock_lite::is_valid(ann, recv_relationship, as_graph) {
            return false;
        }
        if settings.contains(Setting::Rov) && !rov::is_valid(ann, route_validator) {
            return false;
        }
        if settings.contains(Setting::PeerRov) && !peer_rov::is_valid(ann, recv_relationship, route_validator) {
            return false;
        }
        if settings.contains(Setting::Asra) {
            if !asra::is_valid(ann, as_graph) {
                return false;
            }
        } else if settings.contains(Setting::AspaN) {
            if !aspa::is_valid_aspa_n(ann, recv_relationship, as_obj, as_graph) {
                return false;
            }
        } else if settings.contains(Setting::Aspa) && !aspa::is_valid(ann, recv_relationship, as_obj, as_graph) {
            return false;
        }
        if settings.contains(Setting::BgpisecTransitive) {
            if !bgpsec::is_valid_transitive(ann, as_obj) {
                return false;
            }
        } else if (settings.contains(Setting::Bgpsec) || settings.contains(Setting::Bgpisec))
            && !bgpsec::is_valid(ann, as_obj)
        {
            return false;
        }
        if (settings.contains(Setting::RovppV1Lite)
            || settings.contains(Setting::RovppV2Lite)
            || settings.contains(Setting::RovppV2iLite))
            && !rov::is_valid(ann, route_validator)
        {
            return false;
        }
        if settings.contains(Setting::ProviderConeId) && !provider_cone_id::is_valid(ann, recv_relationship, as_graph)
        {
            return false;
        }

        true
    }

    fn install_ann(&mut self, ann: Announcement, as_obj: &AS) {
        self.ribs_in.entry(ann.next_hop_asn).or_default().insert(ann.prefix, ann.clone());

        match self.get_best_ann_for_prefix(&ann.prefix, as_obj) {
            Some(best) => {
                self.local_rib.insert(ann.prefix, best);
            }
            None if ann.withdraw => {
                self.local_rib.remove(&ann.prefix);
            }
            None => {}
        }
    }

    pub fn get_best_ann_for_prefix(&self, prefix: &Prefix, as_obj: &AS) -> Option<Announcement> {
        let mut candidates = Vec::new();

        if let Some(current) = self.local_rib.get(prefix) {
            if !current.withdraw {
                candidates.push(current.clone());
            }
        }

        for neighbor_ribs in self.ribs_in.values() {
            if let Some(ann) = neighbor_ribs.get(prefix) {
                if !ann.withdraw {
                    candidates.push(ann.clone());
                }
            }
        }

        if candidates.is_empty() {
            return None;
        }

        candidates.sort_by(|a, b| {
            if rovpp::prefer_blackhole(a, b) {
                return std::cmp::Ordering::Less;
            }
            if rovpp::prefer_blackhole(b, a) {
                return std::cmp::Ordering::Greater;
            }
            let rel_a = self.relationship_for_compare(a, as_obj);
            let rel_b = self.relationship_for_compare(b, as_obj);
            if as_obj.settings.contains(Setting::Bgpsec)
                || as_obj.settings.contains(Setting::Bgpisec)
                || as_obj.settings.contains(Setting::BgpisecTransitive)
            {
                if let Some(tiebreak) = bgpsec::compare_as_tiebreak(a, b, as_obj) {
                    return tiebreak;
                }
            }
            bgp::compare(a, b, rel_a, rel_b)
        });

        candidates.into_iter().next()
    }

    fn get_relationship(&self, neighbor_asn: &ASN, as_obj: &AS) -> Relationships {
        if as_obj.customer_asns.contains(neighbor_asn) {
            Relationships::Customers
        } else if as_obj.peer_asns.contains(neighbor_asn) {
            Relationships::Peers
        } else if as_obj.provider_asns.contains(neighbor_asn) {
            Relationships::Providers
        } else {
            Relationships::Unknown
        }
    }

    /// The relationship to score an announcement by for Gao-Rexford
    /// comparison: `Origin` when it's the AS's own self-originated route
    /// (only ever true of the current `local_rib` entry, tagged by
    /// `seed_ann`; nothing in `ribs_in` is ever tagged this way), else the
    /// relationship of whichever neighbor sent it.
    fn relationship_for_compare(&self, ann: &Announcement, as_obj: &AS) -> Relationships {
        if ann.recv_relationship == Relationships::Origin {
            Relationships::Origin
        } else {
            self.get_relationship(&ann.next_hop_asn, as_obj)
        }
    }

    /// One leg of the engine's three-sweep schedule: send everything in
    /// `local_rib` that's allowed to go out over `rel`, to every neighbor of
    /// that relationship. Called once per sweep phase, never internally --
    /// keeping send and drain (`drain_and_install`) as separate steps is
    /// what lets the engine enforce the rank-ordered, send-then-drain
    /// ordering instead of announcements racing ahead within a round.
    pub fn propagate_to_rel(&mut self, rel: Relationships, as_obj: &AS, policy_store: &mut PolicyStore) {
        let anns: Vec<Announcement> = self
            .local_rib
            .values()
            .filter(|ann| self.should_propagate_to_rel(ann, rel, as_obj))
            .cloned()
            .collect();

        for ann in &anns {
            self.send_to_neighbors(ann, rel, as_obj, policy_store);
        }
    }

    fn should_propagate_to_rel(&self, ann: &Announcement, rel: Relationships, as_obj: &AS) -> bool {
        if !bgp::should_propagate(ann.recv_relationship, rel) {
            return false;
        }
        if as_obj.settings.contains(Setting::OnlyToCustomers) && !only_to_customers::should_propagate(ann, rel) {
            return false;
        }
        if as_obj.settings.contains(Setting::RovppV2Lite) || as_obj.settings.contains(Setting::RovppV2iLite) {
            if !rovpp::should_propagate_v2(ann, rel) {
                return false;
            }
        } else if as_obj.settings.contains(Setting::RovppV1Lite) && !rovpp::should_propagate_v1(ann) {
            return false;
        }
        true
    }

    fn send_to_neighbors(&mut self, ann: &Announcement, rel: Relationships, as_obj: &AS, policy_store: &mut PolicyStore) {
        let neighbor_asns = as_obj.asns_by_relationship(rel).to_vec();
        let recv_rel = rel.invert();
        let mut anns_to_send = Vec::new();

        for neighbor_asn in neighbor_asns {
            // `local_rib` already carries our ASN at the front for anything
            // we originated (seed_ann sets it directly); strip it here so
            // `copy_and_process` -- which every hop uses to prepend itself
            // on its way out -- doesn't double us up on the first hop out.
            let mut outgoing = ann.clone();
            if outgoing.as_path.first() == Some(&as_obj.asn) {
                outgoing.as_path.remove(0);
            }
            let mut new_ann = outgoing.copy_and_process(as_obj.asn, recv_rel);

            prefix_hijack_attacker::apply_on_egress(&mut new_ann, rel, as_obj);

            if as_obj.settings.contains(Setting::OnlyToCustomers) {
                only_to_customers::attach_on_egress(&mut new_ann, rel, as_obj.asn);
            }
            if as_obj.settings.contains(Setting::Bgpsec)
                || as_obj.settings.contains(Setting::Bgpisec)
                || as_obj.settings.contains(Setting::BgpisecTransitive)
            {
                bgpsec::sign_on_egress(&mut new_ann, as_obj);
            }

            self.ribs_out.entry(neighbor_asn).or_default().insert(new_ann.prefix, new_ann.clone());
            anns_to_send.push((neighbor_asn, new_ann));
        }

        for (neighbor_asn, new_ann) in anns_to_send {
            if let Some(neighbor_policy) = policy_store.get_mut(&neighbor_asn) {
                neighbor_policy.receive_ann(new_ann, recv_rel);
            }
        }
    }

    /// Seed an origination. Seeding the same prefix into the same AS's
    /// local RIB twice is always a scenario-authoring bug (there is nothing
    /// sensible to do with two simultaneous origins for one prefix at one
    /// AS), so this rejects rather than silently overwriting.
    pub fn seed_ann(&mut self, mut ann: Announcement) -> Result<(), SimError> {
        if !ann.withdraw && self.local_rib.contains_key(&ann.prefix) {
            return Err(SimError::SeedConflict { asn: self.asn, prefix: ann.prefix.to_string() });
        }

        if ann.as_path.is_empty() && !ann.withdraw {
            ann.as_path = vec![self.asn];
        }
        ann.next_hop_asn = self.asn;
        ann.recv_relationship = Relationships::Origin;

        if ann.withdraw {
            self.local_rib.remove(&ann.prefix);
        } else {
            self.local_rib.insert(ann.prefix, ann);
        }
        Ok(())
    }
}

pub struct PolicyStore {
    policies: HashMap<ASN, Policy>,
}

impl PolicyStore {
    pub fn new() -> Self {
        PolicyStore { policies: HashMap::new() }
    }

    pub fn create_policy(&mut self, asn: ASN) -> &mut Policy {
        self.policies.entry(asn).or_insert_with(|| Policy::new(asn))
    }

    pub fn get(&self, asn: &ASN) -> Option<&Policy> {
        self.policies.get(asn)
    }

    pub fn get_mut(&mut self, asn: &ASN) -> Option<&mut Policy> {
        self.policies.get_mut(asn)
    }

    /// Temporarily removes one AS's policy so the engine can process it
    /// while still holding `&mut self` to deliver to its neighbors --
    /// otherwise processing one entry and sending to others would need two
    /// live mutable borrows of the same map at once.
    pub fn take(&mut self, asn: &ASN) -> Option<Policy> {
        self.policies.remove(asn)
    }

    pub fn put_back(&mut self, asn: ASN, policy: Policy) {
        self.policies.insert(asn, policy);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ASN, &Policy)> {
        self.policies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&ASN, &mut Policy)> {
        self.policies.iter_mut()
    }
}

impl Default for PolicyStore {
    fn default() -> Self {
        Self::new()
    }
}
