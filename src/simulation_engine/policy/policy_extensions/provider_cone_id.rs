use crate::as_graph::ASGraph;
use crate::shared::Relationships;
use crate::simulation_engine::announcement::Announcement;

/// Provider-Cone-ID: when a route arrives from a customer, the origin must
/// actually sit in that customer's provider cone (itself or one of its own
/// customers) -- a customer announcing a prefix for an AS outside its cone
/// cannot legitimately be on the path to it.
pub fn is_valid(ann: &Announcement, recv_relationship: Relationships, as_graph: &ASGraph) -> bool {
    if recv_relationship != Relationships::Customers {
        return true;
    }
    let origin = ann.as_path.last().copied().unwrap_or(ann.next_hop_asn);
    if origin == ann.next_hop_asn {
        return true;
    }
    match as_graph.get(&origin) {
        Some(origin_as) => origin_as.provider_cone_asns.contains(&ann.next_hop_asn),
        None => true,
    }
}
