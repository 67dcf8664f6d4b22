//! Error types for voting-cascade.

use thiserror::Error;
use voting_topology::TopologyError;

/// Result type for voting-cascade operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while setting up or running a cascade.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Out-of-range or contradictory parameters. Raised before any network
    /// is built or mutated.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// The round loop recorded more snapshots than the network has room for.
    ///
    /// Adoption is one-way, so a correct engine stops after at most N rounds.
    #[error("cascade did not converge: {rounds} snapshots exceeds the limit of {limit}")]
    RoundLimitExceeded { rounds: usize, limit: usize },
}

impl Error {
    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Error::InvalidConfiguration(reason.into())
    }
}

impl From<TopologyError> for Error {
    fn from(err: TopologyError) -> Self {
        Error::InvalidConfiguration(err.to_string())
    }
}
