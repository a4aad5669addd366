use crate::as_graph::ASN;
use crate::shared::{Relationships, Timestamps};
use crate::simulation_engine::announcement::Announcement;

/// Build the synthetic "blackhole" announcement ROV++ injects in place of an
/// invalid one: it carries the prefix but is marked undeliverable, so the
/// data plane drops it locally instead of forwarding to whatever residual
/// route would otherwise win.
pub fn blackhole_ann(invalid: &Announcement, as_obj_asn: ASN) -> Announcement {
    let mut hole = Announcement::new_with_path(
        invalid.prefix,
        vec![as_obj_asn],
        as_obj_asn,
        Relationships::Origin,
        Timestamps::Attacker,
    );
    hole.rovpp_blackhole = Some(true);
    hole
}

/// v1 Lite: blackhole locally, never propagate further.
pub fn should_propagate_v1(ann: &Announcement) -> bool {
    !ann.rovpp_blackhole.unwrap_or(false)
}

/// v2 Lite: like v1, but also flood the blackhole to customers so they don't
/// fall back to a worse route either -- the only extra propagation a
/// blackhole is ever allowed.
pub fn should_propagate_v2(ann: &Announcement, send_relationship: Relationships) -> bool {
    if ann.rovpp_blackhole.unwrap_or(false) {
        matches!(send_relationship, Relationships::Customers)
    } else {
        true
    }
}

/// v2i Lite: v2 Lite's propagation rule, plus immediate preference for the
/// blackhole over any other route for the same prefix so a late-arriving
/// legitimate announcement can't undo a hole punched earlier in the round.
pub fn prefer_blackhole(a: &Announcement, b: &Announcement) -> bool {
    a.rovpp_blackhole.unwrap_or(false) && !b.rovpp_blackhole.unwrap_or(false)
}
