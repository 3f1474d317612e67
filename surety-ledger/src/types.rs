//! Core types for the surety ledger
//!
//! All types are designed for:
//! - Deterministic serialization (bincode feeds the journal hash chain)
//! - Exact arithmetic (Decimal for money)
//! - Use as map keys where the data model calls for it

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Party identifier (airline, passenger, oracle, or administrator)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PartyId(String);

impl PartyId {
    /// Create new party ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PartyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Flight status code as resolved by oracle consensus
///
/// Discriminants match the wire codes oracles report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum FlightStatus {
    /// No resolution yet
    Unknown = 0,
    /// Flight on time
    OnTime = 10,
    /// Delay caused by the airline (triggers insurance payout)
    LateAirline = 20,
    /// Delay caused by weather
    LateWeather = 30,
    /// Delay caused by a technical problem
    LateTechnical = 40,
    /// Delay with another cause
    LateOther = 50,
}

impl FlightStatus {
    /// Numeric wire code
    pub fn code(&self) -> u8 {
        *self as u8
    }

    /// Parse from wire code
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FlightStatus::Unknown),
            10 => Some(FlightStatus::OnTime),
            20 => Some(FlightStatus::LateAirline),
            30 => Some(FlightStatus::LateWeather),
            40 => Some(FlightStatus::LateTechnical),
            50 => Some(FlightStatus::LateOther),
            _ => None,
        }
    }
}

impl fmt::Display for FlightStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FlightStatus::Unknown => "Unknown",
            FlightStatus::OnTime => "OnTime",
            FlightStatus::LateAirline => "LateAirline",
            FlightStatus::LateWeather => "LateWeather",
            FlightStatus::LateTechnical => "LateTechnical",
            FlightStatus::LateOther => "LateOther",
        };
        write!(f, "{}", name)
    }
}

/// Airline membership record
///
/// Created on first admission attempt; `is_registered` flips exactly once,
/// `is_funded` only by the airline's own funding transaction. Votes collected
/// by a pending candidate persist until admission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Airline {
    /// Airline identity
    pub id: PartyId,

    /// Display name supplied at registration
    pub name: String,

    /// Whether admission completed
    pub is_registered: bool,

    /// Whether minimum collateral was posted
    pub is_funded: bool,

    /// Distinct voters who approved this candidate's pending admission
    pub votes: BTreeSet<PartyId>,
}

impl Airline {
    /// New pending (not yet registered) record
    pub fn pending(id: PartyId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            is_registered: false,
            is_funded: false,
            votes: BTreeSet::new(),
        }
    }
}

/// Key identifying a flight: owning airline, flight code, scheduled departure
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FlightKey {
    /// Airline that registered the flight
    pub airline: PartyId,

    /// Flight code (e.g. "CODE123")
    pub code: String,

    /// Scheduled departure, unix seconds
    pub timestamp: i64,
}

impl FlightKey {
    /// Create new flight key
    pub fn new(airline: PartyId, code: impl Into<String>, timestamp: i64) -> Self {
        Self {
            airline,
            code: code.into(),
            timestamp,
        }
    }
}

impl fmt::Display for FlightKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}@{}", self.airline, self.code, self.timestamp)
    }
}

/// Registered flight record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flight {
    /// Lookup key
    pub key: FlightKey,

    /// Departure location
    pub location: String,

    /// Current status code; mutated only by oracle consensus resolution
    pub status: FlightStatus,

    /// When the flight was registered
    pub registered_at: DateTime<Utc>,
}

/// Insurance policy for one passenger on one flight
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InsurancePolicy {
    /// Insured passenger
    pub passenger: PartyId,

    /// Insured flight
    pub flight: FlightKey,

    /// Total premium paid (escrowed by the treasury)
    pub amount_paid: Decimal,

    /// Amount owed after a late-airline resolution; set exactly once
    pub credited_payout: Decimal,

    /// Whether the payout rule already ran for this policy
    pub credited: bool,

    /// Whether the credited payout was withdrawn
    pub withdrawn: bool,
}

impl InsurancePolicy {
    /// New policy with no credit yet
    pub fn new(passenger: PartyId, flight: FlightKey, amount_paid: Decimal) -> Self {
        Self {
            passenger,
            flight,
            amount_paid,
            credited_payout: Decimal::ZERO,
            credited: false,
            withdrawn: false,
        }
    }

    /// Credited and not yet withdrawn
    pub fn is_payable(&self) -> bool {
        self.credited && !self.withdrawn
    }
}
