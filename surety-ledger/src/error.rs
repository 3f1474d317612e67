//! Error types for the surety ledger

use rust_decimal::Decimal;
use thiserror::Error;

/// Result type for ledger operations
pub type Result<T> = std::result::Result<T, Error>;

/// Ledger errors
///
/// Every failure aborts the triggering operation with no partial state
/// change; the variant tells the caller exactly why.
#[derive(Error, Debug)]
pub enum Error {
    /// Operations are currently disabled by the administrator
    #[error("Contract is not operational")]
    NotOperational,

    /// Caller lacks the authority for this operation
    #[error("Caller {0} is not authorized for this operation")]
    Unauthorized(String),

    /// Airline has not posted the minimum collateral
    #[error("Airline {0} has not posted minimum funds")]
    AirlineNotFunded(String),

    /// Voter already approved this candidate
    #[error("Voter {0} already voted for this candidate")]
    AlreadyVoted(String),

    /// Candidate is already a registered airline
    #[error("Airline {0} is already registered")]
    AlreadyRegistered(String),

    /// Flight with this (airline, code, timestamp) key already exists
    #[error("Flight {0} is already registered")]
    DuplicateFlight(String),

    /// No flight with this key
    #[error("Unknown flight: {0}")]
    UnknownFlight(String),

    /// Insurance premium above the fixed price ceiling
    #[error("Premium {paid} exceeds insurance price limit {limit}")]
    PriceExceedsLimit {
        /// Premium the caller attached
        paid: Decimal,
        /// Configured price ceiling
        limit: Decimal,
    },

    /// Attached value below a required minimum
    #[error("Attached value {value} is below the required minimum {required}")]
    BelowMinimumFunds {
        /// Value the caller attached
        value: Decimal,
        /// Required minimum
        required: Decimal,
    },

    /// Caller has no credited, unwithdrawn payouts
    #[error("Nothing to withdraw for {0}")]
    NothingToWithdraw(String),

    /// Internal accounting invariant broken (liabilities vs. balance, etc.)
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for Error {
    fn from(err: bincode::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serialization(err.to_string())
    }
}
