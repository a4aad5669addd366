use crate::as_graph::ASGraph;
use crate::simulation_engine::announcement::Announcement;

/// AS-Path Edge Filter: if the origin is a direct neighbor of the validating
/// AS and that neighbor is a stub or multihomed (so it has no customers of
/// its own to legitimately originate on behalf of), the path must be nothing
/// but the origin repeated -- any other ASN in it is forged, since a stub or
/// multihomed AS never transits anyone else's routes.
pub fn is_valid(ann: &Announcement, validating_asn: u32, as_graph: &ASGraph) -> bool {
    let origin = ann.origin();

    let validating_as = match as_graph.get(&validating_asn) {
        Some(as_obj) => as_obj,
        None => return true,
    };
    if !validating_as.neighbor_asns().any(|&n| n == origin) {
        return true;
    }

    let origin_as = match as_graph.get(&origin) {
        Some(as_obj) => as_obj,
        None => return true,
    };
    if !(origin_as.is_stub() || origin_as.is_multihomed()) {
        return true;
    }

    ann.as_path.iter().all(|&asn| asn == origin)
}
