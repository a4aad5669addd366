use std::str::FromStr;

use ipnetwork::IpNetwork;

use bgpsimulator::as_graph::{ASBuilder, ASGraph};
use bgpsimulator::route_validator::{RouteValidator, ROA};
use bgpsimulator::shared::{Relationships, Setting, SettingsSet, Timestamps};
use bgpsimulator::simulation_engine::Announcement;

fn test_as_graph() -> ASGraph {
    let builder = ASBuilder::new(65001).with_peers(vec![65002, 65003]).with_providers(vec![65004]).with_customers(vec![65005, 65006]);
    ASGraph::build(vec![builder])
}

fn test_ann() -> Announcement {
    Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65002, 65007],
        65002,
        Relationships::Peers,
        Timestamps::Victim,
    )
}

#[test]
fn test_bgp_validation() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::bgp;

    let as_graph = test_as_graph();
    let as_obj = as_graph.get(&65001).unwrap();
    let mut ann = test_ann();

    assert!(bgp::is_valid(&ann, Relationships::Peers, as_obj));

    // Loop: our own ASN already in the path.
    ann.as_path.push(65001);
    assert!(!bgp::is_valid(&ann, Relationships::Peers, as_obj));

    // Empty path from a non-origin relationship is invalid.
    let mut empty_path_ann = ann.clone();
    empty_path_ann.as_path.clear();
    assert!(!bgp::is_valid(&empty_path_ann, Relationships::Peers, as_obj));

    // Empty path is fine when it's our own origination.
    assert!(bgp::is_valid(&empty_path_ann, Relationships::Origin, as_obj));

    // A withdrawal always passes, regardless of path shape.
    let mut withdrawal = empty_path_ann.clone();
    withdrawal.withdraw = true;
    assert!(bgp::is_valid(&withdrawal, Relationships::Peers, as_obj));
}

#[test]
fn test_bgp_export_rules() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::bgp;

    // From origin or a customer: export everywhere.
    assert!(bgp::should_propagate(Relationships::Origin, Relationships::Customers));
    assert!(bgp::should_propagate(Relationships::Origin, Relationships::Peers));
    assert!(bgp::should_propagate(Relationships::Origin, Relationships::Providers));
    assert!(bgp::should_propagate(Relationships::Customers, Relationships::Customers));
    assert!(bgp::should_propagate(Relationships::Customers, Relationships::Peers));
    assert!(bgp::should_propagate(Relationships::Customers, Relationships::Providers));

    // From a peer or provider: only export to customers.
    assert!(bgp::should_propagate(Relationships::Peers, Relationships::Customers));
    assert!(!bgp::should_propagate(Relationships::Peers, Relationships::Peers));
    assert!(!bgp::should_propagate(Relationships::Peers, Relationships::Providers));
    assert!(bgp::should_propagate(Relationships::Providers, Relationships::Customers));
    assert!(!bgp::should_propagate(Relationships::Providers, Relationships::Peers));
    assert!(!bgp::should_propagate(Relationships::Providers, Relationships::Providers));
}

#[test]
fn test_rov_validation() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::rov;

    let mut rv = RouteValidator::new();
    rv.add_roa(ROA::new(IpNetwork::from_str("10.0.0.0/24").unwrap(), 65008, Some(24)));

    let valid_ann = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65002, 65008],
        65002,
        Relationships::Peers,
        Timestamps::Victim,
    );
    assert!(rov::is_valid(&valid_ann, &rv));

    let invalid_ann = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65002, 65003],
        65002,
        Relationships::Peers,
        Timestamps::Victim,
    );
    assert!(!rov::is_valid(&invalid_ann, &rv));
}

#[test]
fn test_peer_rov_only_scrutinizes_peer_sessions() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::peer_rov;

    let rv = RouteValidator::new();
    let unknown_ann = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65003],
        65003,
        Relationships::Peers,
        Timestamps::Victim,
    );
    // No covering ROA: plain ROV would accept this, but Peer-ROV rejects
    // unknown validity when it arrives from a peer.
    assert!(!peer_rov::is_valid(&unknown_ann, Relationships::Peers, &rv));

    let from_customer = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65003],
        65003,
        Relationships::Customers,
        Timestamps::Victim,
    );
    assert!(peer_rov::is_valid(&from_customer, Relationships::Customers, &rv));
}

#[test]
fn test_only_to_customers_propagation() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::only_to_customers;

    let mut ann = test_ann();
    assert!(only_to_customers::is_valid(&ann, Relationships::Peers));

    only_to_customers::attach_on_egress(&mut ann, Relationships::Peers, 65001);
    assert_eq!(ann.only_to_customers, Some(65001));

    assert!(only_to_customers::should_propagate(&ann, Relationships::Customers));
    assert!(!only_to_customers::should_propagate(&ann, Relationships::Peers));
    assert!(!only_to_customers::should_propagate(&ann, Relationships::Providers));

    // An OTC-attested route arriving back from a customer is always invalid.
    assert!(!only_to_customers::is_valid(&ann, Relationships::Customers));
    // From a peer, the attesting ASN must match the sender.
    assert!(only_to_customers::is_valid(&ann, Relationships::Peers));
}

#[test]
fn test_enforce_first_as() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::enforce_first_as;

    let as_graph = test_as_graph();
    let as_obj = as_graph.get(&65001).unwrap();

    let valid_ann = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65002, 65007],
        65002,
        Relationships::Peers,
        Timestamps::Victim,
    );
    assert!(enforce_first_as::is_valid(&valid_ann, as_obj));

    // Next hop doesn't match the first ASN in the path.
    let mismatched_next_hop = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65002, 65007],
        65003,
        Relationships::Peers,
        Timestamps::Victim,
    );
    assert!(!enforce_first_as::is_valid(&mismatched_next_hop, as_obj));

    // First ASN isn't actually one of our neighbors.
    let not_a_neighbor = Announcement::new_with_path(
        IpNetwork::from_str("10.0.0.0/24").unwrap(),
        vec![65999, 65007],
        65999,
        Relationships::Peers,
        Timestamps::Victim,
    );
    assert!(!enforce_first_as::is_valid(&not_a_neighbor, as_obj));
}

#[test]
fn test_bgpsec_validation() {
    use bgpsimulator::simulation_engine::policy::policy_extensions::bgpsec;

    let as_graph = test_as_graph();
    let as_obj = as_graph.get(&65001).unwrap();

    let mut valid_ann = test_ann();
    valid_ann.bgpsec_next_asn = Some(65001);
    valid_ann.bgpsec_as_path = Some(valid_ann.as_path.clone());
    assert!(bgpsec::is_valid(&valid_ann, as_obj));

    // Signed for the wrong receiving ASN.
    let mut wrong_next_asn = test_ann();
    wrong_next_asn.bgpsec_next_asn = Some(65999);
    wrong_next_asn.bgpsec_as_path = Some(wrong_next_asn.as_path.clone());
    assert!(!bgpsec::is_valid(&wrong_next_asn, as_obj));

    // Secure path doesn't match the AS path.
    let mut path_mismatch = test_ann();
    path_mismatch.bgpsec_next_asn = Some(65001);
    path_mismatch.bgpsec_as_path = Some(vec![65003, 65004]);
    assert!(!bgpsec::is_valid(&path_mismatch, as_obj));

    // No secure path attached at all: falls back to plain BGP, always valid.
    let regular_ann = test_ann();
    assert!(bgpsec::is_valid(&regular_ann, as_obj));
}

#[test]
fn test_settings_set_composition() {
    let mut settings = SettingsSet::empty();
    assert!(settings.is_empty());

    settings.insert(Setting::Rov);
    settings.insert(Setting::OnlyToCustomers);
    assert!(settings.contains(Setting::Rov));
    assert!(settings.contains(Setting::OnlyToCustomers));
    assert!(!settings.contains(Setting::PeerRov));

    settings.remove(Setting::Rov);
    assert!(!settings.contains(Setting::Rov));
    assert!(settings.contains(Setting::OnlyToCustomers));

    let built: SettingsSet = vec![Setting::Aspa, Setting::PathEnd].into_iter().collect();
    assert!(built.contains(Setting::Aspa));
    assert!(built.contains(Setting::PathEnd));
    assert!(!built.contains(Setting::Rov));
}
