use std::collections::HashSet;

use crate::as_graph::{ASGraph, ASN};
use crate::error::{SimError, SimResult};

use super::scenario::ScenarioTrait;
use super::scenario_config::ScenarioConfig;

pub mod subprefix_hijack;
pub mod prefix_hijack;
pub mod superprefix_hijack;
pub mod forged_origin_hijack;
pub mod shortest_path_hijack;
pub mod accidental_route_leak;
pub mod legitimate_prefix_only;

pub use accidental_route_leak::AccidentalRouteLeak;
pub use forged_origin_hijack::ForgedOriginHijack;
pub use legitimate_prefix_only::LegitimatePrefixOnly;
pub use prefix_hijack::PrefixHijack;
pub use shortest_path_hijack::ShortestPathHijack;
pub use subprefix_hijack::SubprefixHijack;
pub use superprefix_hijack::SuperprefixHijack;

/// Resolves a scenario name (as carried on `ScenarioConfig::scenario_name`)
/// to a constructed scenario implementation, picking attacker and
/// legitimate-origin ASNs from the config's overrides or, failing that, at
/// random from the graph's stubs.
pub fn build(name: &str, as_graph: &ASGraph, config: &ScenarioConfig) -> SimResult<Box<dyn ScenarioTrait>> {
    let attacker_asns = config.override_attacker_asns.clone().unwrap_or_else(|| default_attacker_asns(as_graph));
    let legitimate_origin_asns = config
        .override_legitimate_origin_asns
        .clone()
        .unwrap_or_else(|| default_legitimate_origin_asns(as_graph, &attacker_asns));

    match name {
        "SubprefixHijack" => Ok(Box::new(SubprefixHijack::new(attacker_asns, legitimate_origin_asns))),
        "PrefixHijack" => Ok(Box::new(PrefixHijack::new(attacker_asns, legitimate_origin_asns))),
        "SuperprefixHijack" => Ok(Box::new(SuperprefixHijack::new(attacker_asns, legitimate_origin_asns))),
        "ForgedOriginHijack" => Ok(Box::new(ForgedOriginHijack::new(attacker_asns, legitimate_origin_asns))),
        "ShortestPathHijack" => Ok(Box::new(ShortestPathHijack::new(attacker_asns, legitimate_origin_asns))),
        "AccidentalRouteLeak" => Ok(Box::new(AccidentalRouteLeak::new(attacker_asns, legitimate_origin_asns))),
        "LegitimatePrefixOnly" => Ok(Box::new(LegitimatePrefixOnly::new(legitimate_origin_asns))),
        other => Err(SimError::UnknownScenario(other.to_string())),
    }
}

fn default_attacker_asns(as_graph: &ASGraph) -> HashSet<ASN> {
    let stubs: Vec<ASN> = as_graph.iter().filter(|a| a.is_stub() && !a.ixp).map(|a| a.asn).collect();
    if stubs.is_empty() {
        HashSet::new()
    } else {
        HashSet::from([stubs[rand::random::<usize>() % stubs.len()]])
    }
}

fn default_legitimate_origin_asns(as_graph: &ASGraph, attacker_asns: &HashSet<ASN>) -> HashSet<ASN> {
    let stubs: Vec<ASN> = as_graph.iter().filter(|a| a.is_stub() && !a.ixp && !attacker_asns.contains(&a.asn)).map(|a| a.asn).collect();
    if stubs.is_empty() {
        HashSet::new()
    } else {
        HashSet::from([stubs[rand::random::<usize>() % stubs.len()]])
    }
}
