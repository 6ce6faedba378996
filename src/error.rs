//! Error type shared by the annealing engine and the job-shop model.

use thiserror::Error;

/// Errors raised by validation before any search work starts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Problem data is malformed: non-positive counts, a table of the
    /// wrong shape, a non-positive duration, or a job order that is not
    /// a permutation of `1..=J`.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A search parameter is out of range.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result alias for this crate.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn input(message: impl Into<String>) -> Self {
        Error::InvalidInput(message.into())
    }

    pub(crate) fn config(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}
