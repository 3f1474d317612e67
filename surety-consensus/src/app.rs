//! Application facade over the ledger and the consensus components
//!
//! [`SuretyApp`] exposes the system's entire external surface. Every
//! operation takes the caller identity (and the attached value where money
//! moves) explicitly, and runs to completion under an exclusive lock: the
//! in-process equivalent of the host environment serializing submitted
//! transactions into a total order.

use crate::admission::{AdmissionConsensus, AdmissionOutcome};
use crate::error::Result;
use crate::indexes::IndexSource;
use crate::oracle::{OracleConsensus, StatusRequestOutcome, SubmissionOutcome};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use surety_ledger::{
    Config, FlightKey, FlightStatus, InsurancePolicy, LedgerEvent, PartyId, SuretyLedger,
};

#[derive(Debug)]
struct AppState {
    ledger: SuretyLedger,
    admission: AdmissionConsensus,
    oracle: OracleConsensus,
}

/// Main application interface
#[derive(Debug)]
pub struct SuretyApp {
    state: RwLock<AppState>,
}

impl SuretyApp {
    /// Build the facade on a deployed ledger
    ///
    /// `identity` is the identity this layer uses on the ledger's privileged
    /// surface; the deployment harness must have authorized it on `ledger`
    /// for admissions and resolutions to go through.
    pub fn new(ledger: SuretyLedger, identity: PartyId, indexes: IndexSource) -> Self {
        Self {
            state: RwLock::new(AppState {
                ledger,
                admission: AdmissionConsensus::new(identity.clone()),
                oracle: OracleConsensus::new(identity, indexes),
            }),
        }
    }

    // ---- operational guard ----

    /// Whether mutations are currently allowed
    pub fn is_operational(&self) -> bool {
        self.state.read().ledger.is_operational()
    }

    /// Flip the operational flag; administrator only
    pub fn set_operational(&self, caller: &PartyId, enabled: bool) -> Result<()> {
        self.state.write().ledger.set_operational(caller, enabled)?;
        Ok(())
    }

    /// Grant a caller access to the ledger's privileged surface;
    /// administrator only
    pub fn authorize_caller(&self, caller: &PartyId, party: PartyId) -> Result<()> {
        self.state.write().ledger.authorize_caller(caller, party)?;
        Ok(())
    }

    /// Revoke a caller's privileged access; administrator only
    pub fn deauthorize_caller(&self, caller: &PartyId, party: &PartyId) -> Result<()> {
        self.state.write().ledger.deauthorize_caller(caller, party)?;
        Ok(())
    }

    // ---- membership & funding ----

    /// Post airline collateral
    pub fn fund(&self, caller: &PartyId, value: Decimal) -> Result<()> {
        self.state.write().ledger.fund(caller, value)?;
        Ok(())
    }

    /// Whether the identity is a registered airline
    pub fn is_airline(&self, id: &PartyId) -> bool {
        self.state.read().ledger.is_airline(id)
    }

    /// Whether the airline posted minimum collateral
    pub fn is_funded(&self, id: &PartyId) -> bool {
        self.state.read().ledger.is_funded(id)
    }

    /// Count of registered airlines
    pub fn registered_count(&self) -> usize {
        self.state.read().ledger.registered_count()
    }

    /// Register (or vote for) a candidate airline
    pub fn register_airline(
        &self,
        caller: &PartyId,
        candidate: &PartyId,
        name: &str,
    ) -> Result<AdmissionOutcome> {
        let state = &mut *self.state.write();
        state
            .admission
            .register_airline(&mut state.ledger, caller, candidate, name)
    }

    // ---- flights ----

    /// Register a flight for the calling airline
    pub fn register_flight(
        &self,
        caller: &PartyId,
        code: &str,
        location: &str,
        timestamp: i64,
    ) -> Result<FlightKey> {
        let key = self
            .state
            .write()
            .ledger
            .register_flight(caller, code, location, timestamp)?;
        Ok(key)
    }

    /// Current status of a flight
    pub fn flight_status(&self, key: &FlightKey) -> Result<FlightStatus> {
        let status = self.state.read().ledger.flight_status(key)?;
        Ok(status)
    }

    // ---- insurance ----

    /// Purchase (or top up) insurance for a flight
    pub fn buy(&self, caller: &PartyId, key: &FlightKey, value: Decimal) -> Result<()> {
        self.state.write().ledger.buy(caller, key, value)?;
        Ok(())
    }

    /// Withdraw the caller's credited payouts; returns the released amount
    pub fn withdraw(&self, caller: &PartyId) -> Result<Decimal> {
        let amount = self.state.write().ledger.withdraw(caller)?;
        Ok(amount)
    }

    /// Credited, unwithdrawn total for a party
    pub fn payable(&self, party: &PartyId) -> Decimal {
        self.state.read().ledger.payable(party)
    }

    /// Distinct insured passengers in purchase order
    pub fn passengers(&self) -> Vec<PartyId> {
        self.state.read().ledger.passengers().to_vec()
    }

    /// Policy for one passenger on one flight
    pub fn policy(&self, key: &FlightKey, passenger: &PartyId) -> Option<InsurancePolicy> {
        self.state.read().ledger.policy(key, passenger).cloned()
    }

    // ---- oracles ----

    /// Register the caller as an oracle; returns its index assignment
    pub fn register_oracle(&self, caller: &PartyId, value: Decimal) -> Result<Vec<u8>> {
        let state = &mut *self.state.write();
        state.oracle.register_oracle(&mut state.ledger, caller, value)
    }

    /// Indexes held by a registered oracle
    pub fn oracle_indexes(&self, oracle: &PartyId) -> Option<Vec<u8>> {
        self.state
            .read()
            .oracle
            .oracle_indexes(oracle)
            .map(<[u8]>::to_vec)
    }

    /// Open (or refresh) a status round for a flight
    pub fn request_flight_status(
        &self,
        caller: &PartyId,
        key: &FlightKey,
    ) -> Result<StatusRequestOutcome> {
        let state = &mut *self.state.write();
        state
            .oracle
            .request_flight_status(&mut state.ledger, caller, key)
    }

    /// Submit an oracle's status report for an open round
    pub fn submit_response(
        &self,
        caller: &PartyId,
        key: &FlightKey,
        index: u8,
        status: FlightStatus,
    ) -> Result<SubmissionOutcome> {
        let state = &mut *self.state.write();
        state
            .oracle
            .submit_response(&mut state.ledger, caller, key, index, status)
    }

    // ---- constants & accounting reads ----

    /// Configured constants (minimum funds, price limit, multiplier, quorum,
    /// fee)
    pub fn config(&self) -> Config {
        self.state.read().ledger.config().clone()
    }

    /// Snapshot of the journal's events, oldest first
    pub fn journal_events(&self) -> Vec<LedgerEvent> {
        self.state
            .read()
            .ledger
            .journal()
            .entries()
            .iter()
            .map(|entry| entry.event.clone())
            .collect()
    }

    /// Recompute the journal hash chain
    pub fn verify_journal(&self) -> Result<bool> {
        let verified = self.state.read().ledger.journal().verify_chain()?;
        Ok(verified)
    }

    /// Treasury balance (all escrowed value)
    pub fn treasury_balance(&self) -> Decimal {
        self.state.read().ledger.treasury_balance()
    }

    /// Credited, unwithdrawn payout liabilities
    pub fn treasury_liabilities(&self) -> Decimal {
        self.state.read().ledger.treasury_liabilities()
    }

    /// Check the escrow solvency invariant
    pub fn check_solvency(&self) -> bool {
        self.state.read().ledger.check_solvency()
    }
}
