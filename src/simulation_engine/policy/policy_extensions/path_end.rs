use crate::as_graph::ASGraph;
use crate::route_validator::RouteValidator;
use crate::shared::Setting;
use crate::simulation_engine::announcement::Announcement;
use crate::simulation_engine::policy::policy_extensions::rov;

/// Path-End: ROV-valid first (Path-End never rejects anything ROV itself
/// wouldn't), then -- only if the origin AS itself adopted Path-End -- the
/// AS just before the origin in the path must actually be a neighbor of the
/// origin AS in the real topology. An attacker forging a path can put any
/// ASN there; this catches forgeries the origin's real neighbor set would
/// never have produced.
pub fn is_valid(ann: &Announcement, route_validator: &RouteValidator, as_graph: &ASGraph) -> bool {
    if !rov::is_valid(ann, route_validator) {
        return false;
    }
    if ann.as_path.len() < 2 {
        return true;
    }
    let origin = ann.as_path[ann.as_path.len() - 1];
    let second_to_last = ann.as_path[ann.as_path.len() - 2];

    match as_graph.get(&origin) {
        Some(origin_as) => {
            if !origin_as.settings.contains(Setting::PathEnd) {
                return true;
            }
            origin_as.neighbor_asns().any(|&n| n == second_to_last)
        }
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::as_graph::ASBuilder;
    use crate::route_validator::ROA;
    use crate::shared::{Relationships, SettingsSet, Timestamps};
    use ipnetwork::IpNetwork;
    use std::str::FromStr;

    fn ann(path: Vec<u32>) -> Announcement {
        let origin = *path.last().unwrap();
        Announcement::new_with_path(
            IpNetwork::from_str("1.2.0.0/16").unwrap(),
            path,
            origin,
            Relationships::Customers,
            Timestamps::Victim,
        )
    }

    #[test]
    fn rejects_forged_second_to_last_when_origin_adopts() {
        let b1 = ASBuilder::new(1).with_customers(vec![2]).with_settings(SettingsSet::single(Setting::PathEnd));
        let b2 = ASBuilder::new(2).with_providers(vec![1]);
        let graph = ASGraph::build(vec![b1, b2]);
        let rv = RouteValidator::new();

        assert!(!is_valid(&ann(vec![3, 1]), &rv, &graph));
    }

    #[test]
    fn ignores_path_shape_when_origin_does_not_adopt() {
        let b1 = ASBuilder::new(1).with_customers(vec![2]);
        let b2 = ASBuilder::new(2).with_providers(vec![1]);
        let graph = ASGraph::build(vec![b1, b2]);
        let rv = RouteValidator::new();

        assert!(is_valid(&ann(vec![3, 1]), &rv, &graph));
    }

    #[test]
    fn rejects_rov_invalid_regardless_of_path_end() {
        let b1 = ASBuilder::new(1).with_customers(vec![2]).with_settings(SettingsSet::single(Setting::PathEnd));
        let b2 = ASBuilder::new(2).with_providers(vec![1]);
        let graph = ASGraph::build(vec![b1, b2]);
        let mut rv = RouteValidator::new();
        rv.add_roa(ROA::new(IpNetwork::from_str("1.2.0.0/16").unwrap(), 100, None));

        assert!(!is_valid(&ann(vec![2, 1]), &rv, &graph));
    }
}
