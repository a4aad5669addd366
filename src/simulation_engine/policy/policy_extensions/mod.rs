//! One file per policy extension. Each exposes a plain validity-check
//! function rather than a trait object, since an AS can have any number of
//! these enabled at once (see `SettingsSet`); `Policy::valid_ann` composes
//! them in precedence order instead of dispatching to a single active one.

pub mod bgp;
pub mod rov;
pub mod peer_rov;
pub mod aspa;
pub mod asra;
pub mod only_to_customers;
pub mod path_end;
pub mod peerlock_lite;
pub mod as_path_edge_filter;
pub mod enforce_first_as;
pub mod bgpsec;
pub mod rovpp;
pub mod provider_cone_id;
pub mod prefix_hijack_attacker;
