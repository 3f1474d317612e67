//! Oracle status consensus
//!
//! Oracles register for a fee and receive a fixed set of distinct indexes.
//! A status request opens a round tied to one freshly drawn index; only
//! oracles holding that index may respond. Matching responses accumulate
//! per status code until the quorum resolves the round: the flight status
//! is written through the ledger's privileged surface, and a late-airline
//! resolution credits every policy on the flight. Resolution is terminal;
//! late submissions are accepted silently and trigger nothing.

use crate::error::{Error, Result};
use crate::indexes::IndexSource;
use rust_decimal::Decimal;
use std::collections::{BTreeSet, HashMap};
use surety_ledger::{FlightKey, FlightStatus, PartyId, SuretyLedger};

/// Result of a status request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusRequestOutcome {
    /// A round is open; oracles holding `index` should respond
    Opened {
        /// Index issued for this round
        index: u8,
    },
    /// The round already resolved; no new round is opened
    AlreadyResolved(FlightStatus),
}

/// Result of an oracle submission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// Response recorded; quorum not yet reached for this status
    Accepted {
        /// Matching responses collected for the submitted status
        count: usize,
    },
    /// Same oracle already reported this status for this round
    Duplicate,
    /// This response reached the quorum and resolved the round
    Resolved(FlightStatus),
    /// The round was already resolved; the response was accepted silently
    AlreadyResolved,
}

/// One status-request round
#[derive(Debug)]
struct StatusRound {
    index: u8,
    resolved: bool,
    responses: HashMap<FlightStatus, BTreeSet<PartyId>>,
}

impl StatusRound {
    fn new(index: u8) -> Self {
        Self {
            index,
            resolved: false,
            responses: HashMap::new(),
        }
    }
}

/// Oracle registration and status-round state
#[derive(Debug)]
pub struct OracleConsensus {
    identity: PartyId,
    oracles: HashMap<PartyId, Vec<u8>>,
    rounds: HashMap<FlightKey, StatusRound>,
    indexes: IndexSource,
}

impl OracleConsensus {
    /// New oracle component acting as `identity`, drawing indexes from
    /// `indexes`
    pub fn new(identity: PartyId, indexes: IndexSource) -> Self {
        Self {
            identity,
            oracles: HashMap::new(),
            rounds: HashMap::new(),
            indexes,
        }
    }

    /// Register the caller as an oracle
    ///
    /// Duplicate registration is idempotent: the existing assignment is
    /// returned and no additional fee is collected.
    pub fn register_oracle(
        &mut self,
        ledger: &mut SuretyLedger,
        caller: &PartyId,
        value: Decimal,
    ) -> Result<Vec<u8>> {
        ledger.ensure_operational()?;
        if let Some(existing) = self.oracles.get(caller) {
            return Ok(existing.clone());
        }

        let fee = ledger.config().oracle_registration_fee;
        if value < fee {
            return Err(surety_ledger::Error::BelowMinimumFunds {
                value,
                required: fee,
            }
            .into());
        }

        let assigned = self.indexes.assign(
            ledger.config().indexes_per_oracle,
            ledger.config().oracle_index_pool,
        );
        ledger.record_oracle_registered(&self.identity, caller, &assigned, value)?;
        self.oracles.insert(caller.clone(), assigned.clone());
        tracing::debug!(oracle = %caller, ?assigned, "oracle registered");
        Ok(assigned)
    }

    /// Indexes held by a registered oracle
    pub fn oracle_indexes(&self, oracle: &PartyId) -> Option<&[u8]> {
        self.oracles.get(oracle).map(Vec::as_slice)
    }

    /// Open (or refresh) a status round for a flight
    ///
    /// Any caller may request. While the round is unresolved a new request
    /// replaces it with a fresh index and fresh responses; once resolved the
    /// request is a no-op reporting the resolved status.
    pub fn request_flight_status(
        &mut self,
        ledger: &mut SuretyLedger,
        caller: &PartyId,
        key: &FlightKey,
    ) -> Result<StatusRequestOutcome> {
        ledger.ensure_operational()?;
        if let Some(round) = self.rounds.get(key) {
            if round.resolved {
                let status = ledger.flight_status(key)?;
                return Ok(StatusRequestOutcome::AlreadyResolved(status));
            }
        }

        let index = self.indexes.draw_index(ledger.config().oracle_index_pool);
        ledger.record_status_requested(&self.identity, key, index)?;
        self.rounds.insert(key.clone(), StatusRound::new(index));
        tracing::debug!(caller = %caller, flight = %key, index, "status round opened");
        Ok(StatusRequestOutcome::Opened { index })
    }

    /// Submit an oracle's status report for an open round
    pub fn submit_response(
        &mut self,
        ledger: &mut SuretyLedger,
        caller: &PartyId,
        key: &FlightKey,
        index: u8,
        status: FlightStatus,
    ) -> Result<SubmissionOutcome> {
        ledger.ensure_operational()?;
        let held = self
            .oracles
            .get(caller)
            .ok_or_else(|| Error::OracleIndexMismatch {
                oracle: caller.to_string(),
                index,
            })?;
        if !held.contains(&index) {
            return Err(Error::OracleIndexMismatch {
                oracle: caller.to_string(),
                index,
            });
        }

        let round = self
            .rounds
            .get_mut(key)
            .ok_or_else(|| Error::UnknownRequest(key.to_string()))?;
        if round.index != index {
            return Err(Error::OracleIndexMismatch {
                oracle: caller.to_string(),
                index,
            });
        }

        let bucket = round.responses.entry(status).or_default();
        if bucket.contains(caller) {
            return Ok(SubmissionOutcome::Duplicate);
        }
        let count = bucket.len() + 1;

        ledger.record_response(&self.identity, caller, key, status, count)?;
        bucket.insert(caller.clone());

        if round.resolved {
            return Ok(SubmissionOutcome::AlreadyResolved);
        }
        if count < ledger.config().oracle_quorum {
            return Ok(SubmissionOutcome::Accepted { count });
        }

        round.resolved = true;
        ledger.resolve_flight(&self.identity, key, status)?;
        if status == FlightStatus::LateAirline {
            let multiplier = ledger.config().payout_multiplier;
            ledger.credit_payouts(&self.identity, key, multiplier)?;
        }
        tracing::info!(flight = %key, %status, "status round resolved by quorum");
        Ok(SubmissionOutcome::Resolved(status))
    }
}
