//! Append-only journal of ledger state transitions
//!
//! Every successful mutation appends exactly one entry (withdrawal appends
//! two: the clearing of the payable balance, then the release of funds).
//! Entries are hash-chained: each entry hash covers the entry's canonical
//! bytes and the previous entry hash, so any rewrite of history is
//! detectable by [`Journal::verify_chain`].

use crate::types::{FlightKey, FlightStatus, PartyId};
use crate::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// State transition recorded in the journal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    /// Administrator flipped the operational flag
    OperationalChanged {
        /// New value of the flag
        enabled: bool,
    },
    /// Administrator authorized a privileged caller
    CallerAuthorized {
        /// Authorized identity
        caller: PartyId,
    },
    /// Administrator revoked a privileged caller
    CallerDeauthorized {
        /// Revoked identity
        caller: PartyId,
    },
    /// Airline admission completed
    AirlineRegistered {
        /// Admitted airline
        airline: PartyId,
        /// Display name
        name: String,
    },
    /// Airline posted collateral
    AirlineFunded {
        /// Funding airline
        airline: PartyId,
        /// Attached value
        amount: Decimal,
    },
    /// Admission vote recorded for a pending candidate
    VoteRecorded {
        /// Candidate under vote
        candidate: PartyId,
        /// Approving incumbent
        voter: PartyId,
        /// Votes collected so far
        votes: usize,
    },
    /// Flight registered by its airline
    FlightRegistered {
        /// Flight key
        flight: FlightKey,
        /// Departure location
        location: String,
    },
    /// Passenger purchased or topped up insurance
    InsurancePurchased {
        /// Insured passenger
        passenger: PartyId,
        /// Insured flight
        flight: FlightKey,
        /// Premium escrowed
        amount: Decimal,
    },
    /// Oracle registered and received its index assignment
    OracleRegistered {
        /// Oracle identity
        oracle: PartyId,
        /// Assigned indexes
        indexes: Vec<u8>,
        /// Registration fee collected
        fee: Decimal,
    },
    /// Status round opened; only oracles holding `index` should respond
    StatusRequested {
        /// Flight under request
        flight: FlightKey,
        /// Index issued for this round
        index: u8,
    },
    /// Oracle response accepted into a status round
    ResponseRecorded {
        /// Responding oracle
        oracle: PartyId,
        /// Flight under request
        flight: FlightKey,
        /// Reported status
        status: FlightStatus,
        /// Matching responses collected for this status
        count: usize,
    },
    /// Status round reached quorum; flight status written
    FlightResolved {
        /// Resolved flight
        flight: FlightKey,
        /// Final status
        status: FlightStatus,
    },
    /// Payout credited to a policy after a late-airline resolution
    PayoutCredited {
        /// Credited passenger
        passenger: PartyId,
        /// Insured flight
        flight: FlightKey,
        /// Credited amount
        amount: Decimal,
    },
    /// Payable balance zeroed at the start of a withdrawal
    PayoutsCleared {
        /// Withdrawing party
        party: PartyId,
        /// Cleared amount
        amount: Decimal,
    },
    /// Funds released to the withdrawing party (after clearing)
    FundsReleased {
        /// Receiving party
        party: PartyId,
        /// Released amount
        amount: Decimal,
    },
}

/// One hash-chained journal entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Unique entry ID
    pub entry_id: Uuid,

    /// Position in the journal (0-based, dense)
    pub sequence: u64,

    /// When the entry was recorded
    pub recorded_at: DateTime<Utc>,

    /// The state transition
    pub event: LedgerEvent,

    /// Hash of the previous entry (zeroes for the first)
    pub previous_hash: [u8; 32],

    /// Hash of this entry
    pub entry_hash: [u8; 32],
}

impl JournalEntry {
    /// Compute entry hash over sequence, previous hash, and canonical
    /// event bytes
    pub fn compute_hash(&self) -> Result<[u8; 32]> {
        let mut hasher = Sha256::new();
        hasher.update(self.sequence.to_be_bytes());
        hasher.update(self.previous_hash);
        hasher.update(bincode::serialize(&self.event)?);
        Ok(hasher.finalize().into())
    }
}

/// Append-only event journal
#[derive(Debug, Clone, Default)]
pub struct Journal {
    entries: Vec<JournalEntry>,
}

impl Journal {
    /// Empty journal
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an event, extending the hash chain
    pub fn append(&mut self, event: LedgerEvent) -> Result<()> {
        let previous_hash = self
            .entries
            .last()
            .map(|entry| entry.entry_hash)
            .unwrap_or([0u8; 32]);

        let mut entry = JournalEntry {
            entry_id: Uuid::new_v4(),
            sequence: self.entries.len() as u64,
            recorded_at: Utc::now(),
            event,
            previous_hash,
            entry_hash: [0u8; 32],
        };
        entry.entry_hash = entry.compute_hash()?;

        self.entries.push(entry);
        Ok(())
    }

    /// All entries, oldest first
    pub fn entries(&self) -> &[JournalEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the journal is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Recompute the chain and report whether every link holds
    pub fn verify_chain(&self) -> Result<bool> {
        let mut previous_hash = [0u8; 32];
        for (position, entry) in self.entries.iter().enumerate() {
            if entry.sequence != position as u64 || entry.previous_hash != previous_hash {
                return Ok(false);
            }
            if entry.compute_hash()? != entry.entry_hash {
                return Ok(false);
            }
            previous_hash = entry.entry_hash;
        }
        Ok(true)
    }

    /// Export the journal as pretty-printed JSON (audit hand-off)
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(id: &str) -> PartyId {
        PartyId::new(id)
    }

    #[test]
    fn test_chain_links_and_verifies() {
        let mut journal = Journal::new();
        journal
            .append(LedgerEvent::OperationalChanged { enabled: false })
            .unwrap();
        journal
            .append(LedgerEvent::AirlineFunded {
                airline: party("airline-1"),
                amount: Decimal::from(10),
            })
            .unwrap();
        journal
            .append(LedgerEvent::OperationalChanged { enabled: true })
            .unwrap();

        assert_eq!(journal.len(), 3);
        assert_eq!(
            journal.entries()[1].previous_hash,
            journal.entries()[0].entry_hash
        );
        assert!(journal.verify_chain().unwrap());
    }

    #[test]
    fn test_tampered_event_breaks_chain() {
        let mut journal = Journal::new();
        journal
            .append(LedgerEvent::AirlineFunded {
                airline: party("airline-1"),
                amount: Decimal::from(10),
            })
            .unwrap();
        journal
            .append(LedgerEvent::OperationalChanged { enabled: false })
            .unwrap();

        journal.entries[0].event = LedgerEvent::AirlineFunded {
            airline: party("airline-1"),
            amount: Decimal::from(10_000),
        };
        assert!(!journal.verify_chain().unwrap());
    }

    #[test]
    fn test_export_json() {
        let mut journal = Journal::new();
        journal
            .append(LedgerEvent::OperationalChanged { enabled: true })
            .unwrap();

        let json = journal.export_json().unwrap();
        assert!(json.contains("OperationalChanged"));
    }
}
