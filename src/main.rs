use std::collections::HashMap;
use std::str::FromStr;

use ipnetwork::IpNetwork;

use bgpsimulator::as_graph::{ASBuilder, ASGraph};
use bgpsimulator::engine::SimulationEngine;
use bgpsimulator::route_validator::{RouteValidator, ROA};
use bgpsimulator::shared::{CommonASNs, Relationships, Setting, SettingsSet, Timestamps};
use bgpsimulator::Announcement;

fn main() {
    pretty_env_logger::init();
    println!("BGP Simulator - Rust\n");

    run_simple_propagation_example();
    println!("\n{}\n", "=".repeat(80));
    run_hijack_scenario_example();
    println!("\n{}\n", "=".repeat(80));
    run_defense_scenario_example();
}

/// Example 1: Simple BGP propagation
fn run_simple_propagation_example() {
    println!("Example 1: Simple BGP Propagation");
    println!("---------------------------------");

    let mut as_graph = create_simple_topology();
    as_graph.check_for_cycles().expect("no cycles should exist");
    as_graph.assign_as_propagation_rank();
    as_graph.add_asn_groups();

    let mut engine = SimulationEngine::new(&mut as_graph);

    let prefix = IpNetwork::from_str("10.0.0.0/24").unwrap();
    let announcement =
        Announcement::new_with_path(prefix, vec![65003], 65003, Relationships::Origin, Timestamps::Victim);

    engine.setup(&HashMap::new(), Vec::new(), vec![(65003, announcement)]).expect("seeding should succeed");

    println!("\nRunning simulation for 5 rounds...");
    engine.run(5);

    println!("\nFinal routing state:");
    let snapshot = engine.get_local_rib_snapshot();
    for (asn, ribs) in snapshot {
        if !ribs.is_empty() {
            println!("\nAS {}: ", asn);
            for (prefix, path) in ribs {
                println!("  {} -> {:?}", prefix, path);
            }
        }
    }
}

/// Example 2: Subprefix hijack scenario
fn run_hijack_scenario_example() {
    println!("Example 2: Subprefix Hijack Attack");
    println!("----------------------------------");

    let mut as_graph = create_attack_topology();
    let mut engine = SimulationEngine::new(&mut as_graph);

    let legitimate_prefix = IpNetwork::from_str("10.0.0.0/24").unwrap();
    let hijacked_prefix = IpNetwork::from_str("10.0.0.0/25").unwrap();

    let legitimate_ann = Announcement::new_with_path(
        legitimate_prefix,
        vec![CommonASNs::VICTIM],
        CommonASNs::VICTIM,
        Relationships::Origin,
        Timestamps::Victim,
    );
    let hijack_ann = Announcement::new_with_path(
        hijacked_prefix,
        vec![CommonASNs::ATTACKER],
        CommonASNs::ATTACKER,
        Relationships::Origin,
        Timestamps::Victim,
    );

    engine
        .setup(&HashMap::new(), Vec::new(), vec![(CommonASNs::VICTIM, legitimate_ann), (CommonASNs::ATTACKER, hijack_ann)])
        .expect("seeding should succeed");

    println!("\nVictim AS {} announces: {}", CommonASNs::VICTIM, legitimate_prefix);
    println!("Attacker AS {} announces: {} (more specific)", CommonASNs::ATTACKER, hijacked_prefix);

    engine.run(10);

    println!("\nAttack results:");
    let (attacker_count, victim_count) = count_outcomes(&engine, hijacked_prefix, legitimate_prefix);

    println!("ASes routing to attacker: {}", attacker_count);
    println!("ASes routing to victim: {}", victim_count);
    println!(
        "Attack success rate: {:.1}%",
        (attacker_count as f64 / (attacker_count + victim_count) as f64) * 100.0
    );
}

/// Example 3: Defense with ROV
fn run_defense_scenario_example() {
    println!("Example 3: Defense with ROV (Route Origin Validation)");
    println!("----------------------------------------------------");

    let mut as_graph = create_attack_topology();
    let all_asns: Vec<u32> = as_graph.iter().map(|a| a.asn).collect();
    let adopting_count = all_asns.len() / 2;

    println!("\nEnabling ROV for {} out of {} ASes", adopting_count, all_asns.len());

    let mut settings: HashMap<u32, SettingsSet> = HashMap::new();
    for asn in all_asns.iter().take(adopting_count) {
        settings.insert(*asn, SettingsSet::single(Setting::Rov));
    }

    let mut engine = SimulationEngine::new(&mut as_graph);

    let mut roas = Vec::new();
    roas.push(ROA::new(IpNetwork::from_str("10.0.0.0/24").unwrap(), CommonASNs::VICTIM, Some(24)));

    let legitimate_prefix = IpNetwork::from_str("10.0.0.0/24").unwrap();
    let hijacked_prefix = IpNetwork::from_str("10.0.0.0/25").unwrap();

    let legitimate_ann = Announcement::new_with_path(
        legitimate_prefix,
        vec![CommonASNs::VICTIM],
        CommonASNs::VICTIM,
        Relationships::Origin,
        Timestamps::Victim,
    );
    let hijack_ann = Announcement::new_with_path(
        hijacked_prefix,
        vec![CommonASNs::ATTACKER],
        CommonASNs::ATTACKER,
        Relationships::Origin,
        Timestamps::Victim,
    );

    engine
        .setup(&settings, roas, vec![(CommonASNs::VICTIM, legitimate_ann), (CommonASNs::ATTACKER, hijack_ann)])
        .expect("seeding should succeed");

    engine.run(10);

    println!("\nDefense results:");
    let mut protected_count = 0;
    let mut vulnerable_count = 0;

    for (i, &asn) in all_asns.iter().enumerate() {
        let has_rov = i < adopting_count;
        if let Some(policy) = engine.policy_store.get(&asn) {
            if let Some(ann) = policy.local_rib.get(&hijacked_prefix) {
                if ann.origin() == CommonASNs::ATTACKER {
                    if has_rov {
                        println!("WARNING: ROV AS {} still vulnerable!", asn);
                    }
                    vulnerable_count += 1;
                }
            } else if let Some(ann) = policy.local_rib.get(&legitimate_prefix) {
                if ann.origin() == CommonASNs::VICTIM {
                    protected_count += 1;
                }
            }
        }
    }

    println!("ASes protected (routing to victim): {}", protected_count);
    println!("ASes vulnerable (routing to attacker): {}", vulnerable_count);
    println!(
        "Protection rate: {:.1}%",
        (protected_count as f64 / (protected_count + vulnerable_count) as f64) * 100.0
    );
}

fn count_outcomes(
    engine: &SimulationEngine,
    hijacked_prefix: IpNetwork,
    legitimate_prefix: IpNetwork,
) -> (u32, u32) {
    let mut attacker_count = 0;
    let mut victim_count = 0;

    for (_, policy) in engine.policy_store.iter() {
        if let Some(ann) = policy.local_rib.get(&hijacked_prefix) {
            if ann.origin() == CommonASNs::ATTACKER {
                attacker_count += 1;
            }
        } else if let Some(ann) = policy.local_rib.get(&legitimate_prefix) {
            if ann.origin() == CommonASNs::VICTIM {
                victim_count += 1;
            }
        }
    }

    (attacker_count, victim_count)
}

fn create_simple_topology() -> ASGraph {
    let as1_builder = ASBuilder::new(65001).as_tier_1().with_customers(vec![65002]);
    let as2_builder = ASBuilder::new(65002).with_providers(vec![65001]).with_customers(vec![65003]);
    let as3_builder = ASBuilder::new(65003).with_providers(vec![65002]);

    ASGraph::build(vec![as1_builder, as2_builder, as3_builder])
}

fn create_attack_topology() -> ASGraph {
    let mut builders = Vec::new();

    builders.push(ASBuilder::new(CommonASNs::VICTIM).with_providers(vec![1, 2]));
    builders.push(ASBuilder::new(CommonASNs::ATTACKER).with_providers(vec![3, 4]));

    for i in 1..=10 {
        let mut builder = ASBuilder::new(i);

        if i <= 4 {
            builder = builder.with_providers(vec![i + 4]);
        } else {
            builder = builder.as_tier_1();
        }

        match i {
            1 | 2 => builder = builder.with_customers(vec![CommonASNs::VICTIM]),
            3 | 4 => builder = builder.with_customers(vec![CommonASNs::ATTACKER]),
            5 => builder = builder.with_customers(vec![1, 3]),
            6 => builder = builder.with_customers(vec![2, 4]),
            7 => builder = builder.with_customers(vec![1, 2]),
            8 => builder = builder.with_customers(vec![3, 4]),
            _ => {}
        };

        builders.push(builder);
    }

    let mut as_graph = ASGraph::build(builders);

    as_graph.check_for_cycles().expect("no cycles should exist");
    as_graph.assign_as_propagation_rank();
    as_graph.add_asn_groups();

    as_graph
}
