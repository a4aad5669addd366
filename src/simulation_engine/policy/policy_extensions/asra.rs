use crate::as_graph::{ASGraph, ASN};
use crate::shared::Setting;
use crate::simulation_engine::announcement::Announcement;

/// Same provider check as ASPA, except an IXP route-server hop is exempt:
/// its "customers" at the exchange aren't a real provider/customer edge, so
/// ASRA skips the check whenever either side of the pair is an IXP AS.
fn provider_check(asn1: ASN, asn2: ASN, as_graph: &ASGraph) -> bool {
    if as_graph.get(&asn1).map(|a| a.ixp).unwrap_or(false) || as_graph.get(&asn2).map(|a| a.ixp).unwrap_or(false) {
        return true;
    }
    match as_graph.get(&asn1) {
        Some(as_obj) if as_obj.settings.contains(Setting::Asra) => as_obj.provider_asns.contains(&asn2),
        _ => true,
    }
}

fn ramp_split(ann: &Announcement, as_graph: &ASGraph) -> (usize, usize) {
    let reversed: Vec<ASN> = ann.as_path.iter().copied().rev().collect();
    let mut up = ann.as_path.len();
    for i in 0..reversed.len().saturating_sub(1) {
        if !provider_check(reversed[i], reversed[i + 1], as_graph) {
            up = i + 1;
            break;
        }
    }
    let mut down = ann.as_path.len();
    for i in (1..reversed.len()).rev() {
        if !provider_check(reversed[i], reversed[i - 1], as_graph) {
            down = reversed.len() - i;
            break;
        }
    }
    (up, down)
}

/// ASRA: ASPA+N with the IXP route-server peering-set exception.
pub fn is_valid(ann: &Announcement, as_graph: &ASGraph) -> bool {
    if ann.as_path.len() < 2 {
        return true;
    }
    let (up, down) = ramp_split(ann, as_graph);
    if up + down < ann.as_path.len() {
        return false;
    }
    let mut seen = std::collections::HashSet::new();
    ann.as_path.iter().all(|asn| seen.insert(*asn))
}
