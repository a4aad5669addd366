use std::cmp::Ordering;

use crate::as_graph::AS;
use crate::simulation_engine::announcement::Announcement;

fn path_is_signed(ann: &Announcement, as_obj: &AS) -> bool {
    match &ann.bgpsec_as_path {
        Some(signed_path) => ann.bgpsec_next_asn == Some(as_obj.asn) && signed_path == &ann.as_path,
        None => false,
    }
}

/// BGPsec validity: either there's no secure path attached (ordinary BGP,
/// always acceptable) or the secure path matches the AS path exactly and is
/// signed for us.
pub fn is_valid(ann: &Announcement, as_obj: &AS) -> bool {
    ann.bgpsec_as_path.is_none() || path_is_signed(ann, as_obj)
}

/// BGP-iSec's transitive variant relaxes exact-match: a prefix of the AS
/// path being signed is enough, since iSec lets verification continue
/// through non-adopting ASes rather than breaking the secure chain.
pub fn is_valid_transitive(ann: &Announcement, as_obj: &AS) -> bool {
    match &ann.bgpsec_as_path {
        Some(signed_path) => {
            ann.bgpsec_next_asn == Some(as_obj.asn) && ann.as_path.ends_with(signed_path)
        }
        None => true,
    }
}

/// On egress, extend the secure path if we're still within the signed
/// chain; otherwise let it lapse (plain BGP from here on).
pub fn sign_on_egress(ann: &mut Announcement, as_obj: &AS) {
    if path_is_signed(ann, as_obj) {
        ann.bgpsec_as_path = Some(ann.as_path.clone());
    } else {
        ann.bgpsec_as_path = None;
    }
}

/// BGPsec validity is a tiebreak within a relationship class, never the
/// primary sort key -- Gao-Rexford preference and path length still decide
/// first. Returns `Some` only when the two announcements differ in
/// cryptographic validity; `None` means "defer to the next criterion".
pub fn compare_as_tiebreak(ann1: &Announcement, ann2: &Announcement, as_obj: &AS) -> Option<Ordering> {
    let valid1 = is_valid(ann1, as_obj) && ann1.bgpsec_as_path.is_some();
    let valid2 = is_valid(ann2, as_obj) && ann2.bgpsec_as_path.is_some();
    match (valid1, valid2) {
        (true, false) => Some(Ordering::Less),
        (false, true) => Some(Ordering::Greater),
        _ => None,
    }
}
