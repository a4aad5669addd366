use crate::as_graph::AS;
use crate::shared::{Relationships, Setting};
use crate::simulation_engine::announcement::Announcement;

/// Origin-Prefix-Hijack-Customers / First-ASN-Stripping-Prefix-Hijack-Customers:
/// attacker-side propagation-time transforms applied to an outgoing
/// announcement on its way to customers, craft a shorter forged path.
///
/// Origin-Prefix-Hijack-Customers is the baseline attacker behavior and
/// needs no transform here -- it re-announces the hijack unchanged.
/// First-ASN-Stripping additionally strips the attacker's own ASN a second
/// time off the front of `as_path`, so customers see a path one hop shorter
/// than what peers/providers see.
pub fn apply_on_egress(ann: &mut Announcement, send_relationship: Relationships, as_obj: &AS) {
    if send_relationship != Relationships::Customers {
        return;
    }
    if !as_obj.settings.contains(Setting::FirstAsnStrippingPrefixHijackCustomers) {
        return;
    }
    if ann.as_path.first() == Some(&as_obj.asn) {
        ann.as_path.remove(0);
    }
}
