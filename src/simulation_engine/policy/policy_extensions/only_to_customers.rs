use crate::as_graph::ASN;
use crate::shared::Relationships;
use crate::simulation_engine::announcement::Announcement;

/// Only-To-Customers (RFC 9234). `ann.only_to_customers` carries the ASN
/// that attested the OTC attribute, not a bare flag -- a receiver needs the
/// attesting ASN to check it came in on the session that set it.
pub fn is_valid(ann: &Announcement, recv_relationship: Relationships) -> bool {
    match (ann.only_to_customers, recv_relationship) {
        // An OTC route can never legitimately arrive from a customer: that
        // would mean the customer re-exported something meant to terminate.
        (Some(_), Relationships::Customers) => false,
        // From a peer, the attesting ASN must be the peer that sent it.
        (Some(attester), Relationships::Peers) => attester == ann.next_hop_asn,
        _ => true,
    }
}

/// Attach the OTC attestation on egress when sending to a customer or
/// provider, so downstream ASes know this route must terminate at the next
/// customer.
pub fn attach_on_egress(ann: &mut Announcement, send_relationship: Relationships, as_obj_asn: ASN) {
    if ann.only_to_customers.is_none()
        && matches!(send_relationship, Relationships::Customers | Relationships::Providers)
    {
        ann.only_to_customers = Some(as_obj_asn);
    }
}

pub fn should_propagate(ann: &Announcement, send_relationship: Relationships) -> bool {
    match ann.only_to_customers {
        Some(_) => matches!(send_relationship, Relationships::Customers),
        None => true,
    }
}
