use std::fmt;

/// Direction an announcement was received from, relative to the receiving AS.
/// Ordering of the discriminants matters: it is the Gao-Rexford local-pref
/// ranking (higher wins), so do not renumber without re-checking
/// `Policy::compare_announcements`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Relationships {
    Providers = 1,
    Peers = 2,
    Customers = 3,
    Origin = 4,
    Unknown = 5,
}

impl Relationships {
    pub fn invert(&self) -> Self {
        match self {
            Relationships::Providers => Relationships::Customers,
            Relationships::Customers => Relationships::Providers,
            Relationships::Peers => Relationships::Peers,
            Relationships::Origin => Relationships::Origin,
            Relationships::Unknown => Relationships::Unknown,
        }
    }

    /// Local-preference ranking used by Gao-Rexford (higher is better).
    /// `Unknown` should never reach this comparison; see `valid_ann`.
    pub fn local_pref(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for Relationships {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Relationships::Providers => "PROVIDERS",
            Relationships::Peers => "PEERS",
            Relationships::Customers => "CUSTOMERS",
            Relationships::Origin => "ORIGIN",
            Relationships::Unknown => "UNKNOWN",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ASNGroups {
    Tier1,
    Ixps,
    Stubs,
    Multihomed,
    StubsOrMh,
    Transit,
    Etc,
    AllWoutIxps,
}

impl fmt::Display for ASNGroups {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ASNGroups::Tier1 => "TIER_1",
            ASNGroups::Ixps => "IXPS",
            ASNGroups::Stubs => "STUBS",
            ASNGroups::Multihomed => "MULTIHOMED",
            ASNGroups::StubsOrMh => "STUBS_OR_MH",
            ASNGroups::Transit => "TRANSIT",
            ASNGroups::Etc => "ETC",
            ASNGroups::AllWoutIxps => "ALL_WOUT_IXPS",
        };
        write!(f, "{}", s)
    }
}

/// A single composable policy extension. Unlike the single `Settings` enum
/// this replaces, an AS can have any number of these enabled at once -- see
/// `SettingsSet` and `Policy::valid_ann`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Setting {
    Rov = 0,
    PeerRov = 1,
    Aspa = 2,
    AspaN = 3,
    Asra = 4,
    AsPathEdgeFilter = 5,
    EnforceFirstAs = 6,
    OnlyToCustomers = 7,
    PathEnd = 8,
    PeerLockLite = 9,
    Bgpsec = 10,
    Bgpisec = 11,
    BgpisecTransitive = 12,
    RovppV1Lite = 13,
    RovppV2Lite = 14,
    RovppV2iLite = 15,
    ProviderConeId = 16,
    OriginPrefixHijackCustomers = 17,
    FirstAsnStrippingPrefixHijackCustomers = 18,
}

impl Setting {
    pub const ALL: [Setting; 19] = [
        Setting::Rov,
        Setting::PeerRov,
        Setting::Aspa,
        Setting::AspaN,
        Setting::Asra,
        Setting::AsPathEdgeFilter,
        Setting::EnforceFirstAs,
        Setting::OnlyToCustomers,
        Setting::PathEnd,
        Setting::PeerLockLite,
        Setting::Bgpsec,
        Setting::Bgpisec,
        Setting::BgpisecTransitive,
        Setting::RovppV1Lite,
        Setting::RovppV2Lite,
        Setting::RovppV2iLite,
        Setting::ProviderConeId,
        Setting::OriginPrefixHijackCustomers,
        Setting::FirstAsnStrippingPrefixHijackCustomers,
    ];

    fn bit(self) -> u32 {
        1u32 << (self as u8)
    }
}

/// A bitset of simultaneously-enabled `Setting`s for one AS. An empty set is
/// plain BGP.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, serde::Serialize, serde::Deserialize)]
pub struct SettingsSet(u32);

impl SettingsSet {
    pub fn empty() -> Self {
        SettingsSet(0)
    }

    pub fn single(setting: Setting) -> Self {
        SettingsSet(setting.bit())
    }

    pub fn contains(&self, setting: Setting) -> bool {
        self.0 & setting.bit() != 0
    }

    pub fn insert(&mut self, setting: Setting) {
        self.0 |= setting.bit();
    }

    pub fn remove(&mut self, setting: Setting) {
        self.0 &= !setting.bit();
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = Setting> + '_ {
        Setting::ALL.iter().copied().filter(move |s| self.contains(*s))
    }
}

impl FromIterator<Setting> for SettingsSet {
    fn from_iter<T: IntoIterator<Item = Setting>>(iter: T) -> Self {
        let mut set = SettingsSet::empty();
        for s in iter {
            set.insert(s);
        }
        set
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum ROAValidity {
    Valid = 0,
    Unknown = 1,
    InvalidLength = 2,
    InvalidOrigin = 3,
    InvalidLengthAndOrigin = 4,
}

impl ROAValidity {
    pub fn is_invalid(&self) -> bool {
        matches!(
            self,
            ROAValidity::InvalidLength | ROAValidity::InvalidOrigin | ROAValidity::InvalidLengthAndOrigin
        )
    }
}

impl fmt::Display for ROAValidity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ROAValidity::Valid => "VALID",
            ROAValidity::Unknown => "UNKNOWN",
            ROAValidity::InvalidLength => "INVALID_LENGTH",
            ROAValidity::InvalidOrigin => "INVALID_ORIGIN",
            ROAValidity::InvalidLengthAndOrigin => "INVALID_LENGTH_AND_ORIGIN",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ROARouted {
    Routed = 0,
    Unknown = 1,
    NonRouted = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Timestamps {
    Victim = 0,
    Attacker = 1,
}

/// Wire-level outcome of the data-plane traceback for one AS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[repr(u8)]
pub enum Outcomes {
    AttackerSuccess = 0,
    LegitimateOriginSuccess = 1,
    Disconnected = 2,
    DataPlaneLoop = 3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommonASNs;

impl CommonASNs {
    pub const ATTACKER: u32 = 666;
    pub const VICTIM: u32 = 777;
}
