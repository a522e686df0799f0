use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AppDirsError {
    #[error("system data-local directory is unavailable")]
    DataLocalDirUnavailable,
}

/// Outcome classes of a chain endpoint probe.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    /// The endpoint could not be dialed (bad URL, DNS, refused, timeout).
    #[error("unreachable: {0}")]
    Unreachable(String),

    /// The endpoint answered but the chain identity query failed.
    #[error("rejected: {0}")]
    Rejected(String),
}
