//! Airline membership and funding registry
//!
//! Tracks which parties are registered airlines, whether each posted the
//! minimum collateral, and the votes collected by pending candidates.
//! Admission is monotonic: a record transitions pending -> registered at
//! most once and is never deleted. The registered count is the quorum
//! denominator used by the admission consensus.

use crate::error::{Error, Result};
use crate::types::{Airline, PartyId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry of airlines keyed by identity
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AirlineRegistry {
    airlines: HashMap<PartyId, Airline>,
    registered_count: usize,
}

impl AirlineRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the identity is a registered airline
    pub fn is_airline(&self, id: &PartyId) -> bool {
        self.airlines
            .get(id)
            .map(|airline| airline.is_registered)
            .unwrap_or(false)
    }

    /// Whether the airline posted minimum collateral
    pub fn is_funded(&self, id: &PartyId) -> bool {
        self.airlines
            .get(id)
            .map(|airline| airline.is_funded)
            .unwrap_or(false)
    }

    /// Count of registered airlines (quorum denominator)
    pub fn registered_count(&self) -> usize {
        self.registered_count
    }

    /// Full record, registered or pending
    pub fn get(&self, id: &PartyId) -> Option<&Airline> {
        self.airlines.get(id)
    }

    /// Complete the candidate's admission
    ///
    /// Reuses the pending record (and its vote history) when one exists.
    /// Fails with `AlreadyRegistered` if admission already completed.
    pub fn admit(&mut self, candidate: &PartyId, name: &str) -> Result<()> {
        if self.is_airline(candidate) {
            return Err(Error::AlreadyRegistered(candidate.to_string()));
        }

        let record = self
            .airlines
            .entry(candidate.clone())
            .or_insert_with(|| Airline::pending(candidate.clone(), name));
        record.is_registered = true;
        self.registered_count += 1;
        Ok(())
    }

    /// Record one incumbent's vote for a pending candidate
    ///
    /// Creates the pending record on first vote. Votes persist until the
    /// candidate is admitted; they are not reset by unrelated admissions.
    /// Returns the votes collected so far.
    pub fn record_vote(&mut self, candidate: &PartyId, voter: &PartyId, name: &str) -> Result<usize> {
        if self.is_airline(candidate) {
            return Err(Error::AlreadyRegistered(candidate.to_string()));
        }

        let record = self
            .airlines
            .entry(candidate.clone())
            .or_insert_with(|| Airline::pending(candidate.clone(), name));
        if !record.votes.insert(voter.clone()) {
            return Err(Error::AlreadyVoted(voter.to_string()));
        }
        Ok(record.votes.len())
    }

    /// Mark a registered airline as funded; returns false if the flag was
    /// already set (repeat funding is a no-op)
    pub fn set_funded(&mut self, id: &PartyId) -> Result<bool> {
        let record = self
            .airlines
            .get_mut(id)
            .filter(|airline| airline.is_registered)
            .ok_or_else(|| Error::Unauthorized(id.to_string()))?;

        let newly_funded = !record.is_funded;
        record.is_funded = true;
        Ok(newly_funded)
    }
}
