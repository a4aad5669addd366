use crate::as_graph::{AS, ASGraph, ASN};
use crate::shared::{Relationships, Setting};
use crate::simulation_engine::announcement::Announcement;

/// `asn2` is an acceptable next hop from `asn1`'s point of view under ASPA:
/// true unless `asn1` exists, has adopted ASPA, and `asn2` is not one of its
/// providers. An AS that hasn't adopted ASPA makes no attestation, so it
/// can't disprove anything.
fn provider_check(asn1: ASN, asn2: ASN, as_graph: &ASGraph) -> bool {
    match as_graph.get(&asn1) {
        Some(as_obj) if as_obj.settings.contains(Setting::Aspa) || as_obj.settings.contains(Setting::AspaN) => {
            as_obj.provider_asns.contains(&asn2)
        }
        _ => true,
    }
}

/// The next hop must be the first ASN in the path -- unless the receiver is
/// an IXP route server, which is allowed (and in most deployments obligated)
/// to strip its own ASN.
fn next_hop_valid(ann: &Announcement, as_obj: &AS) -> bool {
    ann.as_path.first() == Some(&ann.next_hop_asn) || as_obj.ixp
}

/// Longest prefix of the path (read customer-to-provider, i.e. reversed)
/// where every consecutive pair passes `provider_check` -- RFC 9582's
/// up-ramp.
fn max_up_ramp_length(ann: &Announcement, as_graph: &ASGraph) -> usize {
    let reversed: Vec<ASN> = ann.as_path.iter().copied().rev().collect();
    for i in 0..reversed.len().saturating_sub(1) {
        if !provider_check(reversed[i], reversed[i + 1], as_graph) {
            return i + 1;
        }
    }
    ann.as_path.len()
}

/// Longest suffix of the path (in provider-to-customer order) where every
/// consecutive pair passes `provider_check` -- the down-ramp.
fn max_down_ramp_length(ann: &Announcement, as_graph: &ASGraph) -> usize {
    let reversed: Vec<ASN> = ann.as_path.iter().copied().rev().collect();
    for i in (1..reversed.len()).rev() {
        if !provider_check(reversed[i], reversed[i - 1], as_graph) {
            return reversed.len() - i;
        }
    }
    ann.as_path.len()
}

/// Upstream check (receiving from a customer or peer): invalid only if the
/// up-ramp alone can't cover the whole path.
fn upstream_check(ann: &Announcement, as_graph: &ASGraph) -> bool {
    if ann.as_path.len() <= 1 {
        return true;
    }
    max_up_ramp_length(ann, as_graph) >= ann.as_path.len()
}

/// Downstream check (receiving from a provider): invalid only if up-ramp and
/// down-ramp together can't cover the whole path -- a lone AS forwarding to
/// a non-provider can still be bridged by a down-ramp reaching back to meet
/// the up-ramp partway through.
fn downstream_check(ann: &Announcement, as_graph: &ASGraph) -> bool {
    if ann.as_path.len() <= 1 {
        return true;
    }
    max_up_ramp_length(ann, as_graph) + max_down_ramp_length(ann, as_graph) >= ann.as_path.len()
}

/// ASPA: valid unless the path contains a "valley" -- an up-ramp (and, when
/// received from a provider, a down-ramp) that doesn't cover the whole path,
/// which can only happen if some AS forwarded to a non-provider against its
/// own ASPA attestation. Which check applies depends on the direction this
/// AS received the announcement from: a route handed down from a provider
/// gets the combined up+down check, since either ramp could plausibly meet
/// in the middle; a route learned from a customer or peer only gets the
/// up-ramp check, since there is no legitimate down-ramp to speak of.
pub fn is_valid(ann: &Announcement, recv_relationship: Relationships, as_obj: &AS, as_graph: &ASGraph) -> bool {
    if !next_hop_valid(ann, as_obj) {
        return false;
    }
    match recv_relationship {
        Relationships::Providers => downstream_check(ann, as_graph),
        Relationships::Customers | Relationships::Peers => upstream_check(ann, as_graph),
        _ => true,
    }
}

/// ASPA+N: ASPA plus a check that no ASN repeats in the path (a reserved or
/// looped hop some ASPA deployments don't otherwise catch).
pub fn is_valid_aspa_n(ann: &Announcement, recv_relationship: Relationships, as_obj: &AS, as_graph: &ASGraph) -> bool {
    if !is_valid(ann, recv_relationship, as_obj, as_graph) {
        return false;
    }
    let mut seen = std::collections::HashSet::new();
    ann.as_path.iter().all(|asn| seen.insert(*asn))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::as_graph::ASBuilder;
    use crate::shared::{Relationships, SettingsSet, Timestamps};
    use ipnetwork::IpNetwork;
    use std::str::FromStr;

    fn graph() -> ASGraph {
        // 1 provider of 2, 2 provider of 3; all adopt ASPA.
        let settings = SettingsSet::single(Setting::Aspa);
        let b1 = ASBuilder::new(1).with_customers(vec![2]).with_settings(settings);
        let b2 = ASBuilder::new(2)
            .with_providers(vec![1])
            .with_customers(vec![3])
            .with_settings(settings);
        let b3 = ASBuilder::new(3).with_providers(vec![2]).with_settings(settings);
        ASGraph::build(vec![b1, b2, b3])
    }

    fn ann_with_path(path: Vec<ASN>) -> Announcement {
        let next_hop = path[0];
        Announcement::new_with_path(
            IpNetwork::from_str("1.2.0.0/16").unwrap(),
            path,
            next_hop,
            Relationships::Customers,
            Timestamps::Victim,
        )
    }

    fn validating_as(asn: ASN, graph: &ASGraph) -> AS {
        graph.get(&asn).unwrap().clone()
    }

    #[test]
    fn accepts_valid_provider_chain_from_a_provider() {
        let graph = graph();
        let ann = ann_with_path(vec![1, 2, 3]);
        let receiver = validating_as(3, &graph);
        assert!(is_valid(&ann, Relationships::Providers, &receiver, &graph));
    }

    #[test]
    fn rejects_valley_through_non_provider_from_a_provider() {
        // 1 provider of 2; 2 and 3 are peers (not provider/customer); 3
        // provider of 4. A path straight through all four skips over the
        // peer link in the middle as if it were a provider hop -- neither
        // ramp can bridge that, so the combined check must reject it.
        let settings = SettingsSet::single(Setting::Aspa);
        let b1 = ASBuilder::new(1).with_customers(vec![2]).with_settings(settings);
        let b2 = ASBuilder::new(2).with_providers(vec![1]).with_peers(vec![3]).with_settings(settings);
        let b3 = ASBuilder::new(3).with_peers(vec![2]).with_customers(vec![4]).with_settings(settings);
        let b4 = ASBuilder::new(4).with_providers(vec![3]).with_settings(settings);
        let graph = ASGraph::build(vec![b1, b2, b3, b4]);

        let ann = ann_with_path(vec![1, 2, 3, 4]);
        let receiver = validating_as(1, &graph);
        assert!(!is_valid(&ann, Relationships::Providers, &receiver, &graph));
    }

    #[test]
    fn rejects_mismatched_next_hop_unless_ixp() {
        let graph = graph();
        let mut forged = ann_with_path(vec![1, 2, 3]);
        forged.next_hop_asn = 999;
        let receiver = validating_as(3, &graph);
        assert!(!is_valid(&forged, Relationships::Providers, &receiver, &graph));

        let ixp_receiver = ASBuilder::new(3).as_ixp();
        let ixp_graph = ASGraph::build(vec![ixp_receiver]);
        let ixp_as = validating_as(3, &ixp_graph);
        assert!(is_valid(&forged, Relationships::Providers, &ixp_as, &ixp_graph));
    }

    #[test]
    fn upstream_check_ignores_the_down_ramp() {
        let graph = graph();
        // Received from a customer/peer: only the up-ramp matters.
        let ann = ann_with_path(vec![1, 2, 3]);
        let receiver = validating_as(1, &graph);
        assert!(is_valid(&ann, Relationships::Customers, &receiver, &graph));
    }
}
