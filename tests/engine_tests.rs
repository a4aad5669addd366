use std::collections::HashMap;

use bgpsimulator::as_graph::{ASBuilder, ASGraph};
use bgpsimulator::engine::SimulationEngine;
use bgpsimulator::prefix::Prefix;
use bgpsimulator::shared::Relationships;
use bgpsimulator::Announcement;

/// Simple provider/customer chain: AS1 (tier 1) -> {AS2, AS3}; AS2 -> AS4.
fn create_test_as_graph_simple() -> ASGraph {
    let as1_builder = ASBuilder::new(1).as_tier_1().with_customers(vec![2, 3]);
    let as2_builder = ASBuilder::new(2).with_providers(vec![1]).with_customers(vec![4]);
    let as3_builder = ASBuilder::new(3).with_providers(vec![1]);
    let as4_builder = ASBuilder::new(4).with_providers(vec![2]);

    let mut as_graph = ASGraph::build(vec![as1_builder, as2_builder, as3_builder, as4_builder]);
    as_graph.assign_as_propagation_rank();

    as_graph
}

#[test]
fn test_basic_propagation() {
    let mut as_graph = create_test_as_graph_simple();
    let mut engine = SimulationEngine::new(&mut as_graph);

    let prefix: Prefix = "10.0.0.0/24".parse().unwrap();
    let ann = Announcement::new(prefix, 4, Relationships::Origin);

    engine.setup(&HashMap::new(), Vec::new(), vec![(4, ann)]).unwrap();
    engine.run(5);

    let snapshot = engine.get_local_rib_snapshot();

    assert!(snapshot.get(&4).unwrap().contains_key("10.0.0.0/24"));

    assert!(snapshot.get(&2).unwrap().contains_key("10.0.0.0/24"));
    assert_eq!(&snapshot.get(&2).unwrap()["10.0.0.0/24"], &vec![2, 4]);

    assert!(snapshot.get(&1).unwrap().contains_key("10.0.0.0/24"));
    assert_eq!(&snapshot.get(&1).unwrap()["10.0.0.0/24"], &vec![1, 2, 4]);

    assert!(snapshot.get(&3).unwrap().contains_key("10.0.0.0/24"));
    assert_eq!(&snapshot.get(&3).unwrap()["10.0.0.0/24"], &vec![3, 1, 2, 4]);
}

#[test]
fn test_loop_prevention() {
    let mut as_graph = create_test_as_graph_simple();
    let mut engine = SimulationEngine::new(&mut as_graph);

    let prefix: Prefix = "10.0.0.0/24".parse().unwrap();
    let mut ann = Announcement::new(prefix, 1, Relationships::Origin);
    ann.as_path = vec![1, 3, 4]; // already contains AS 3, but not AS 2

    engine.setup(&HashMap::new(), Vec::new(), vec![(1, ann)]).unwrap();
    engine.run(5);

    let snapshot = engine.get_local_rib_snapshot();

    assert!(snapshot.get(&1).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&2).unwrap().contains_key("10.0.0.0/24"));
    // AS 3 already appears in the path, so it must reject on receipt.
    assert!(!snapshot.get(&3).unwrap().contains_key("10.0.0.0/24"));
}

#[test]
fn test_gao_rexford_export_rules() {
    // Diamond: AS1 (tier 1) -> {AS2, AS3} (peers) -> AS4.
    let as1_builder = ASBuilder::new(1).as_tier_1().with_customers(vec![2, 3]);
    let as2_builder = ASBuilder::new(2).with_providers(vec![1]).with_peers(vec![3]).with_customers(vec![4]);
    let as3_builder = ASBuilder::new(3).with_providers(vec![1]).with_peers(vec![2]).with_customers(vec![4]);
    let as4_builder = ASBuilder::new(4).with_providers(vec![2, 3]);

    let mut as_graph = ASGraph::build(vec![as1_builder, as2_builder, as3_builder, as4_builder]);
    as_graph.assign_as_propagation_rank();

    let mut engine = SimulationEngine::new(&mut as_graph);

    let prefix: Prefix = "10.0.0.0/24".parse().unwrap();
    let ann = Announcement::new(prefix, 4, Relationships::Origin);

    engine.setup(&HashMap::new(), Vec::new(), vec![(4, ann)]).unwrap();
    engine.run(5);

    let snapshot = engine.get_local_rib_snapshot();
    assert!(snapshot.get(&1).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&2).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&3).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&4).unwrap().contains_key("10.0.0.0/24"));

    // Announcement from AS 2, received by AS 3 over their peer link.
    let prefix2: Prefix = "20.0.0.0/24".parse().unwrap();
    let ann2 = Announcement::new(prefix2, 2, Relationships::Origin);

    engine.setup(&HashMap::new(), Vec::new(), vec![(2, ann2)]).unwrap();
    engine.run(5);

    let snapshot2 = engine.get_local_rib_snapshot();
    assert!(snapshot2.get(&2).unwrap().contains_key("20.0.0.0/24"));
    assert!(snapshot2.get(&1).unwrap().contains_key("20.0.0.0/24"));
    assert!(snapshot2.get(&3).unwrap().contains_key("20.0.0.0/24"));
    assert!(snapshot2.get(&4).unwrap().contains_key("20.0.0.0/24"));
}

#[test]
fn test_withdrawal() {
    let mut as_graph = create_test_as_graph_simple();
    let mut engine = SimulationEngine::new(&mut as_graph);

    let prefix: Prefix = "10.0.0.0/24".parse().unwrap();
    let ann = Announcement::new(prefix, 4, Relationships::Origin);

    engine.setup(&HashMap::new(), Vec::new(), vec![(4, ann)]).unwrap();
    engine.run(5);

    let snapshot = engine.get_local_rib_snapshot();
    assert!(snapshot.get(&1).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&2).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&3).unwrap().contains_key("10.0.0.0/24"));
    assert!(snapshot.get(&4).unwrap().contains_key("10.0.0.0/24"));

    let mut withdrawal = Announcement::new(prefix, 4, Relationships::Origin);
    withdrawal.withdraw = true;

    engine.setup(&HashMap::new(), Vec::new(), vec![(4, withdrawal)]).unwrap();
    engine.run(5);

    let snapshot2 = engine.get_local_rib_snapshot();
    assert!(!snapshot2.get(&1).unwrap().contains_key("10.0.0.0/24"));
    assert!(!snapshot2.get(&2).unwrap().contains_key("10.0.0.0/24"));
    assert!(!snapshot2.get(&3).unwrap().contains_key("10.0.0.0/24"));
    assert!(!snapshot2.get(&4).unwrap().contains_key("10.0.0.0/24"));
}
