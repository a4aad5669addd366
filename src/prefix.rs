use std::net::IpAddr;

use ipnetwork::IpNetwork;

use crate::error::SimError;

/// A unified IPv4/IPv6 prefix. The rest of the crate works entirely in terms
/// of `ipnetwork::IpNetwork` (the teacher's existing choice) through this
/// alias and the single `covers` predicate below, rather than the mix of
/// `supernet_of`/manual containment checks the starting code used in
/// different places.
pub type Prefix = IpNetwork;

/// A `Prefix` whose length equals its address family's full width, i.e. a
/// single host address. Used for data-plane destinations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IPAddr(Prefix);

impl IPAddr {
    pub fn new(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => IPAddr(IpNetwork::new(IpAddr::V4(v4), 32).expect("host prefix")),
            IpAddr::V6(v6) => IPAddr(IpNetwork::new(IpAddr::V6(v6), 128).expect("host prefix")),
        }
    }

    pub fn from_prefix(prefix: Prefix) -> Result<Self, SimError> {
        let full_len = match prefix {
            IpNetwork::V4(_) => 32,
            IpNetwork::V6(_) => 128,
        };
        if prefix.prefix() != full_len {
            return Err(SimError::InvalidIpAddress(prefix.to_string()));
        }
        Ok(IPAddr(prefix))
    }

    pub fn addr(&self) -> IpAddr {
        self.0.ip()
    }

    pub fn as_prefix(&self) -> Prefix {
        self.0
    }
}

/// The one "does `outer` cover `inner`" predicate used everywhere in this
/// crate (longest-prefix-match containment). Resolves the ambiguity in the
/// source between `supernet_of`-style and membership-style checks.
pub fn covers(outer: &Prefix, inner: &Prefix) -> bool {
    match (outer, inner) {
        (IpNetwork::V4(o), IpNetwork::V4(i)) => o.prefix() <= i.prefix() && o.contains(i.network()) && o.contains(i.ip()),
        (IpNetwork::V6(o), IpNetwork::V6(i)) => o.prefix() <= i.prefix() && o.contains(i.network()) && o.contains(i.ip()),
        _ => false,
    }
}

/// Longest-prefix-match containment of a host address.
pub fn covers_addr(outer: &Prefix, addr: &IPAddr) -> bool {
    match (outer, addr.as_prefix()) {
        (IpNetwork::V4(o), IpNetwork::V4(a)) => o.contains(a.ip()),
        (IpNetwork::V6(o), IpNetwork::V6(a)) => o.contains(a.ip()),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn covers_longest_prefix_match() {
        let outer = Prefix::from_str("10.0.0.0/8").unwrap();
        let inner = Prefix::from_str("10.1.0.0/16").unwrap();
        assert!(covers(&outer, &inner));
        assert!(!covers(&inner, &outer));
    }

    #[test]
    fn host_prefix_required_for_ipaddr() {
        let host = Prefix::from_str("1.2.3.4/32").unwrap();
        assert!(IPAddr::from_prefix(host).is_ok());
        let non_host = Prefix::from_str("1.2.3.0/24").unwrap();
        assert!(IPAddr::from_prefix(non_host).is_err());
    }
}
