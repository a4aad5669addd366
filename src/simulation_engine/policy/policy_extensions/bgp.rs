use std::cmp::Ordering;

use crate::as_graph::{ASN, AS};
use crate::shared::Relationships;
use crate::simulation_engine::announcement::Announcement;

/// Baseline BGP sanity checks every announcement must pass regardless of
/// which extensions an AS has enabled: no loops, and a non-origin path
/// can't be empty.
pub fn is_valid(ann: &Announcement, recv_relationship: Relationships, as_obj: &AS) -> bool {
    if ann.withdraw {
        return true;
    }
    if ann.as_path.is_empty() && recv_relationship != Relationships::Origin {
        return false;
    }
    if ann.as_path.contains(&as_obj.asn) {
        return false;
    }
    if ann.as_path.contains(&0) {
        return false;
    }
    true
}

/// Default Gao-Rexford export rule: routes learned from a peer or a
/// provider only go to customers; routes from a customer or self-originated
/// routes go everywhere.
pub fn should_propagate(recv_relationship: Relationships, send_relationship: Relationships) -> bool {
    match recv_relationship {
        Relationships::Providers | Relationships::Peers => {
            matches!(send_relationship, Relationships::Customers)
        }
        Relationships::Customers | Relationships::Origin => true,
        _ => false,
    }
}

fn gao_rexford_preference(rel: Relationships) -> u8 {
    match rel {
        Relationships::Origin => 4,
        Relationships::Customers => 3,
        Relationships::Peers => 2,
        Relationships::Providers => 1,
        Relationships::Unknown => 0,
    }
}

/// The second path element when present, else the first -- the tiebreak
/// operand, not `next_hop_asn` (which is always `as_path[0]` and so never
/// discriminates between two routes that arrived from the same next hop).
fn tiebreak_asn(ann: &Announcement) -> ASN {
    if ann.as_path.is_empty() {
        return ann.next_hop_asn;
    }
    ann.as_path[(ann.as_path.len() - 1).min(1)]
}

/// Default Gao-Rexford ordering: relationship preference, then shorter AS
/// path, then a deterministic tie-break on the second path element.
/// Extensions that need to rank above this (BGPsec validity, ROV++
/// hole-punching) should compare on their own criterion first and fall back
/// to this.
pub fn compare(ann1: &Announcement, ann2: &Announcement, rel1: Relationships, rel2: Relationships) -> Ordering {
    let pref1 = gao_rexford_preference(rel1);
    let pref2 = gao_rexford_preference(rel2);
    match pref2.cmp(&pref1) {
        Ordering::Equal => match ann1.as_path.len().cmp(&ann2.as_path.len()) {
            Ordering::Equal => tiebreak_asn(ann1).cmp(&tiebreak_asn(ann2)),
            other => other,
        },
        other => other,
    }
}
