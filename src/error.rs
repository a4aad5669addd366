use thiserror::Error;

use crate::as_graph::ASN;

/// The error taxonomy for this crate. Validity failures inside `valid_ann` are
/// not represented here -- those are a normal part of route processing and
/// simply cause an announcement to be dropped, not propagated as an error.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("cycle detected in AS graph: {0}")]
    Cycle(String),

    #[error("no CAIDA URL could be located for the requested date")]
    NoCaidaUrl,

    #[error("prefix {0} falls in a reserved/bogon block")]
    ReservedPrefix(String),

    #[error("invalid IP address: {0} is not a host prefix")]
    InvalidIpAddress(String),

    #[error("Gao-Rexford comparison failed to select a best announcement")]
    GaoRexford,

    #[error("announcement not found for prefix {0}")]
    AnnouncementNotFound(String),

    #[error("AS {asn} already has a local RIB entry for prefix {prefix}, cannot seed again")]
    SeedConflict { asn: ASN, prefix: String },

    #[error("unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("network error: {0}")]
    Network(String),
}

pub type SimResult<T> = Result<T, SimError>;
