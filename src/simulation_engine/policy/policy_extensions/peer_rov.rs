use crate::as_graph::ASN;
use crate::route_validator::RouteValidator;
use crate::shared::{ROAValidity, Relationships};
use crate::simulation_engine::announcement::Announcement;

/// Peer-ROV: the stricter ROV variant that also rejects unknown-validity
/// announcements, but only applies this extra scrutiny to routes received
/// from a peer -- this is the gate the starting implementation was missing,
/// without which Peer-ROV degenerates into plain ROV for every relationship.
pub fn is_valid(ann: &Announcement, recv_relationship: Relationships, route_validator: &RouteValidator) -> bool {
    if recv_relationship != Relationships::Peers {
        return true;
    }
    let origin: ASN = ann.as_path.last().copied().unwrap_or(ann.next_hop_asn);
    let (validity, _) = route_validator.get_roa_outcome(&ann.prefix, origin);
    validity == ROAValidity::Valid
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_validator::ROA;
    use crate::shared::Timestamps;
    use ipnetwork::IpNetwork;
    use std::str::FromStr;

    fn ann(origin: ASN, recv: Relationships) -> Announcement {
        Announcement::new_with_path(
            IpNetwork::from_str("1.2.0.0/16").unwrap(),
            vec![origin],
            origin,
            recv,
            Timestamps::Victim,
        )
    }

    #[test]
    fn rejects_unknown_only_from_peers() {
        let rv = RouteValidator::new();
        assert!(is_valid(&ann(200, Relationships::Customers), &rv));
        assert!(!is_valid(&ann(200, Relationships::Peers), &rv));
    }
}
