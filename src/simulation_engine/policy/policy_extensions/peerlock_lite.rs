use crate::as_graph::ASGraph;
use crate::shared::Relationships;
use crate::simulation_engine::announcement::Announcement;

/// PeerLock-Lite: a customer should never be the source of a route that
/// transited a Tier-1 AS -- Tier-1s have no providers, so a Tier-1 ASN deep
/// in a path received from a customer is the signature of a route leak.
pub fn is_valid(ann: &Announcement, recv_relationship: Relationships, as_graph: &ASGraph) -> bool {
    if recv_relationship != Relationships::Customers {
        return true;
    }
    !ann.as_path.iter().any(|asn| as_graph.get(asn).map(|a| a.tier_1).unwrap_or(false))
}
