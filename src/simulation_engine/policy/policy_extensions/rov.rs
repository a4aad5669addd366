use crate::as_graph::ASN;
use crate::route_validator::RouteValidator;
use crate::shared::ROAValidity;
use crate::simulation_engine::announcement::Announcement;

/// Route Origin Validation: reject announcements whose origin ASN isn't
/// covered by a valid ROA. Unknown (no covering ROA) is accepted -- ROV
/// only rejects what it can positively disprove.
pub fn is_valid(ann: &Announcement, route_validator: &RouteValidator) -> bool {
    let origin: ASN = ann.as_path.last().copied().unwrap_or(ann.next_hop_asn);
    let (validity, _) = route_validator.get_roa_outcome(&ann.prefix, origin);
    !validity.is_invalid()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::route_validator::ROA;
    use crate::shared::{Relationships, Timestamps};
    use ipnetwork::IpNetwork;
    use std::str::FromStr;

    fn ann(prefix: &str, origin: ASN) -> Announcement {
        Announcement::new_with_path(
            IpNetwork::from_str(prefix).unwrap(),
            vec![origin],
            origin,
            Relationships::Customers,
            Timestamps::Victim,
        )
    }

    #[test]
    fn rejects_invalid_origin() {
        let mut rv = RouteValidator::new();
        rv.add_roa(ROA::new(IpNetwork::from_str("1.2.0.0/16").unwrap(), 100, None));
        assert!(!is_valid(&ann("1.2.0.0/16", 200), &rv));
    }

    #[test]
    fn accepts_unknown_prefix() {
        let rv = RouteValidator::new();
        assert!(is_valid(&ann("1.2.0.0/16", 200), &rv));
    }
}
