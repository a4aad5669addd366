use bgpsimulator::as_graph::{ASBuilder, ASGraph};
use bgpsimulator::shared::Relationships;

#[test]
fn test_as_creation() {
    let builder = ASBuilder::new(100).with_peers(vec![200, 300]).with_providers(vec![400]).with_customers(vec![500, 600]);
    let as_graph = ASGraph::build(vec![builder]);
    let as1 = as_graph.get(&100).unwrap();

    assert_eq!(as1.asn, 100);
    assert_eq!(as1.peer_asns.len(), 2);
    assert_eq!(as1.provider_asns.len(), 1);
    assert_eq!(as1.customer_asns.len(), 2);
    assert!(as1.peer_asns.contains(&200));
    assert!(as1.peer_asns.contains(&300));
    assert!(as1.provider_asns.contains(&400));
    assert!(as1.customer_asns.contains(&500));
    assert!(as1.customer_asns.contains(&600));
}

#[test]
fn test_as_graph_insertion() {
    let as1 = ASBuilder::new(1).with_customers(vec![2]);
    let as2 = ASBuilder::new(2).with_providers(vec![1]);

    let as_graph = ASGraph::build(vec![as1, as2]);

    assert_eq!(as_graph.len(), 2);
    assert!(as_graph.get(&1).is_some());
    assert!(as_graph.get(&2).is_some());
}

#[test]
fn test_cycle_detection() {
    // 1 -> 2 -> 3 -> 1 along provider edges
    let as1 = ASBuilder::new(1).with_providers(vec![3]).with_customers(vec![2]);
    let as2 = ASBuilder::new(2).with_providers(vec![1]).with_customers(vec![3]);
    let as3 = ASBuilder::new(3).with_providers(vec![2]).with_customers(vec![1]);

    let as_graph = ASGraph::build(vec![as1, as2, as3]);

    assert!(as_graph.check_for_cycles().is_err());
}

#[test]
fn test_no_cycle() {
    let as1 = ASBuilder::new(1).as_tier_1().with_customers(vec![2]);
    let as2 = ASBuilder::new(2).with_providers(vec![1]).with_customers(vec![3]);
    let as3 = ASBuilder::new(3).with_providers(vec![2]);

    let as_graph = ASGraph::build(vec![as1, as2, as3]);

    assert!(as_graph.check_for_cycles().is_ok());
}

#[test]
fn test_propagation_rank_assignment() {
    let as1 = ASBuilder::new(1).as_tier_1().with_customers(vec![2]);
    let as2 = ASBuilder::new(2).with_providers(vec![1]).with_customers(vec![3, 4]);
    let as3 = ASBuilder::new(3).with_providers(vec![2]);
    let as4 = ASBuilder::new(4).with_providers(vec![2]);

    let mut as_graph = ASGraph::build(vec![as1, as2, as3, as4]);

    as_graph.check_for_cycles().expect("no cycles should exist");
    as_graph.assign_as_propagation_rank();

    assert_eq!(as_graph.get(&1).unwrap().propagation_rank, Some(0), "tier 1 AS should have rank 0");
    assert_eq!(as_graph.get(&2).unwrap().propagation_rank, Some(1), "AS2 should have rank 1");
    assert_eq!(as_graph.get(&3).unwrap().propagation_rank, Some(2), "AS3 should have rank 2");
    assert_eq!(as_graph.get(&4).unwrap().propagation_rank, Some(2), "AS4 should have rank 2");
}

#[test]
fn test_as_neighbors() {
    let builder = ASBuilder::new(1).with_peers(vec![2, 3]).with_providers(vec![4]).with_customers(vec![5, 6]);
    let as_graph = ASGraph::build(vec![builder]);
    let as1 = as_graph.get(&1).unwrap();

    let provider_neighbors = as1.asns_by_relationship(Relationships::Providers);
    assert_eq!(provider_neighbors.len(), 1);
    assert!(provider_neighbors.contains(&4));

    let peer_neighbors = as1.asns_by_relationship(Relationships::Peers);
    assert_eq!(peer_neighbors.len(), 2);
    assert!(peer_neighbors.contains(&2));
    assert!(peer_neighbors.contains(&3));

    let customer_neighbors = as1.asns_by_relationship(Relationships::Customers);
    assert_eq!(customer_neighbors.len(), 2);
    assert!(customer_neighbors.contains(&5));
    assert!(customer_neighbors.contains(&6));
}
