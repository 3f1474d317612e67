//! Error types for the consensus layer

use thiserror::Error;

/// Result type for consensus operations
pub type Result<T> = std::result::Result<T, Error>;

/// Consensus errors
#[derive(Error, Debug)]
pub enum Error {
    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(#[from] surety_ledger::Error),

    /// Caller is not a registered oracle holding the index, or the index
    /// does not match the round's issued index
    #[error("Oracle index mismatch for {oracle} (index {index})")]
    OracleIndexMismatch {
        /// Submitting party
        oracle: String,
        /// Index the submission carried
        index: u8,
    },

    /// No open status round matches the submission
    #[error("Unknown status request: {0}")]
    UnknownRequest(String),
}

impl Error {
    /// The underlying ledger error, when there is one
    pub fn as_ledger(&self) -> Option<&surety_ledger::Error> {
        match self {
            Error::Ledger(inner) => Some(inner),
            _ => None,
        }
    }
}
