//! Airline admission consensus
//!
//! Per-candidate state machine: Unregistered -> PendingVotes -> Registered,
//! with no path back. While fewer than `bootstrap_threshold` airlines are
//! registered, a funded incumbent admits a candidate directly; from then on
//! each call records one approval vote and admission completes once votes
//! reach half the registered count (exactly 50% suffices, ties favor the
//! incumbents' decision to admit).

use crate::error::Result;
use serde::{Deserialize, Serialize};
use surety_ledger::{Error as LedgerError, PartyId, SuretyLedger};

/// Result of a registration attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AdmissionOutcome {
    /// Candidate is now a registered airline
    Registered,
    /// Candidate stays pending; votes collected so far and votes required
    PendingVotes {
        /// Approval votes recorded for the candidate
        votes: usize,
        /// Votes needed at the current registered count
        required: usize,
    },
}

/// Admission decision logic
///
/// Holds the identity this component uses on the ledger's privileged
/// surface; the deployment harness must authorize it.
#[derive(Debug)]
pub struct AdmissionConsensus {
    identity: PartyId,
}

impl AdmissionConsensus {
    /// New admission component acting as `identity`
    pub fn new(identity: PartyId) -> Self {
        Self { identity }
    }

    /// Register a candidate airline on behalf of `caller`
    ///
    /// The caller must be a registered, funded airline. Duplicate votes from
    /// the same caller are rejected; votes already collected persist across
    /// unrelated admissions.
    pub fn register_airline(
        &self,
        ledger: &mut SuretyLedger,
        caller: &PartyId,
        candidate: &PartyId,
        name: &str,
    ) -> Result<AdmissionOutcome> {
        ledger.ensure_operational()?;
        if !ledger.is_airline(caller) || !ledger.is_funded(caller) {
            return Err(LedgerError::AirlineNotFunded(caller.to_string()).into());
        }
        if ledger.is_airline(candidate) {
            return Err(LedgerError::AlreadyRegistered(candidate.to_string()).into());
        }

        let count = ledger.registered_count();
        if count < ledger.config().bootstrap_threshold {
            ledger.admit_airline(&self.identity, candidate, name)?;
            tracing::info!(candidate = %candidate, "candidate admitted in bootstrap phase");
            return Ok(AdmissionOutcome::Registered);
        }

        let votes = ledger.record_vote(&self.identity, candidate, caller, name)?;
        let required = (count + 1) / 2;
        if votes * 2 >= count {
            ledger.admit_airline(&self.identity, candidate, name)?;
            tracing::info!(candidate = %candidate, votes, "candidate admitted by quorum");
            Ok(AdmissionOutcome::Registered)
        } else {
            Ok(AdmissionOutcome::PendingVotes { votes, required })
        }
    }
}
