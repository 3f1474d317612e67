//! AeroSurety Ledger Core
//!
//! Authoritative accounting state for the flight-surety system: airline
//! membership and collateral, registered flights, passenger insurance
//! policies, and the treasury that escrows every unit of value the core
//! holds.
//!
//! # Architecture
//!
//! - **Single state owner**: all entities live inside one [`SuretyLedger`];
//!   every operation is a synchronous atomic unit of work
//! - **Validate first**: each mutator checks every precondition before it
//!   touches state, so a failed call is indistinguishable from one never made
//! - **Privileged surface**: vote recording, status writes and payout
//!   crediting are gated on an authorized-caller table configured at
//!   deployment time
//! - **Journaled**: every successful mutation appends a hash-chained entry
//!   to an append-only journal
//!
//! # Invariants
//!
//! - An identity appears at most once as an airline; admission is monotonic
//! - Credited payout liabilities never exceed the treasury balance
//! - Payable balances are zeroed before funds are released (pull payment)
//! - Journal entries are never modified or deleted

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod error;
pub mod flights;
pub mod insurance;
pub mod journal;
pub mod ledger;
pub mod membership;
pub mod treasury;
pub mod types;

// Re-exports
pub use config::Config;
pub use error::{Error, Result};
pub use journal::{Journal, JournalEntry, LedgerEvent};
pub use ledger::SuretyLedger;
pub use types::{Airline, Flight, FlightKey, FlightStatus, InsurancePolicy, PartyId};
