//! Main ledger orchestration layer
//!
//! [`SuretyLedger`] owns all state: the operational guard, the
//! authorized-caller table, airline membership, flights, insurance policies,
//! the treasury, and the journal. Every mutator validates its preconditions
//! before touching anything, applies the change, then journals it, so a
//! failed call leaves no trace.
//!
//! Caller identity and attached value are explicit parameters on every
//! operation, so the ledger is callable identically from tests and from any
//! transport.

use crate::{
    config::Config,
    error::{Error, Result},
    flights::FlightRegistry,
    insurance::InsuranceBook,
    journal::{Journal, LedgerEvent},
    membership::AirlineRegistry,
    treasury::Treasury,
    types::{Airline, Flight, FlightKey, FlightStatus, InsurancePolicy, PartyId},
};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Authoritative ledger state
#[derive(Debug)]
pub struct SuretyLedger {
    config: Config,
    admin: PartyId,
    operational: bool,
    authorized: HashSet<PartyId>,
    airlines: AirlineRegistry,
    flights: FlightRegistry,
    insurance: InsuranceBook,
    treasury: Treasury,
    journal: Journal,
}

impl SuretyLedger {
    /// New operational ledger administered by `admin`
    pub fn new(config: Config, admin: PartyId) -> Self {
        Self {
            config,
            admin,
            operational: true,
            authorized: HashSet::new(),
            airlines: AirlineRegistry::new(),
            flights: FlightRegistry::new(),
            insurance: InsuranceBook::new(),
            treasury: Treasury::new(),
            journal: Journal::new(),
        }
    }

    /// Seed the first airline at deployment time
    ///
    /// The genesis airline is registered (unfunded), so the bootstrap
    /// admission phase has a party that can fund and act.
    pub fn with_genesis_airline(mut self, id: PartyId, name: &str) -> Result<Self> {
        self.airlines.admit(&id, name)?;
        self.journal.append(LedgerEvent::AirlineRegistered {
            airline: id,
            name: name.to_string(),
        })?;
        Ok(self)
    }

    // ---- operational guard ----

    /// Whether mutations are currently allowed
    pub fn is_operational(&self) -> bool {
        self.operational
    }

    /// Flip the operational flag; administrator only
    ///
    /// Exempt from the operational check itself so the administrator can
    /// always restore service.
    pub fn set_operational(&mut self, caller: &PartyId, enabled: bool) -> Result<()> {
        self.require_admin(caller)?;
        self.operational = enabled;
        self.journal
            .append(LedgerEvent::OperationalChanged { enabled })?;
        tracing::info!(enabled, "operational flag changed");
        Ok(())
    }

    /// Fail with `NotOperational` while the guard is down
    pub fn ensure_operational(&self) -> Result<()> {
        if self.operational {
            Ok(())
        } else {
            Err(Error::NotOperational)
        }
    }

    fn require_admin(&self, caller: &PartyId) -> Result<()> {
        if *caller == self.admin {
            Ok(())
        } else {
            Err(Error::Unauthorized(caller.to_string()))
        }
    }

    fn require_authorized(&self, caller: &PartyId) -> Result<()> {
        if self.authorized.contains(caller) {
            Ok(())
        } else {
            Err(Error::Unauthorized(caller.to_string()))
        }
    }

    // ---- authorized-caller table (configured by the deployment harness) ----

    /// Grant a caller access to the privileged surface; administrator only
    pub fn authorize_caller(&mut self, caller: &PartyId, party: PartyId) -> Result<()> {
        self.require_admin(caller)?;
        self.authorized.insert(party.clone());
        self.journal
            .append(LedgerEvent::CallerAuthorized { caller: party })?;
        Ok(())
    }

    /// Revoke a caller's privileged access; administrator only
    pub fn deauthorize_caller(&mut self, caller: &PartyId, party: &PartyId) -> Result<()> {
        self.require_admin(caller)?;
        self.authorized.remove(party);
        self.journal.append(LedgerEvent::CallerDeauthorized {
            caller: party.clone(),
        })?;
        Ok(())
    }

    /// Whether the party may invoke privileged operations
    pub fn is_authorized(&self, party: &PartyId) -> bool {
        self.authorized.contains(party)
    }

    // ---- membership & funding ----

    /// Post collateral for a registered airline
    ///
    /// Repeat funding is a no-op success; the attached value still enters
    /// the treasury.
    pub fn fund(&mut self, caller: &PartyId, value: Decimal) -> Result<()> {
        self.ensure_operational()?;
        if !self.airlines.is_airline(caller) {
            return Err(Error::Unauthorized(caller.to_string()));
        }
        if value < self.config.minimum_funds {
            return Err(Error::BelowMinimumFunds {
                value,
                required: self.config.minimum_funds,
            });
        }

        self.airlines.set_funded(caller)?;
        self.treasury.deposit(value);
        self.journal.append(LedgerEvent::AirlineFunded {
            airline: caller.clone(),
            amount: value,
        })?;
        tracing::debug!(airline = %caller, %value, "airline funded");
        Ok(())
    }

    /// Whether the identity is a registered airline
    pub fn is_airline(&self, id: &PartyId) -> bool {
        self.airlines.is_airline(id)
    }

    /// Whether the airline posted minimum collateral
    pub fn is_funded(&self, id: &PartyId) -> bool {
        self.airlines.is_funded(id)
    }

    /// Count of registered airlines (quorum denominator)
    pub fn registered_count(&self) -> usize {
        self.airlines.registered_count()
    }

    /// Full airline record, registered or pending
    pub fn airline(&self, id: &PartyId) -> Option<&Airline> {
        self.airlines.get(id)
    }

    // ---- privileged admission surface (called by the decision layer) ----

    /// Complete a candidate's admission
    pub fn admit_airline(&mut self, caller: &PartyId, candidate: &PartyId, name: &str) -> Result<()> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        self.airlines.admit(candidate, name)?;
        self.journal.append(LedgerEvent::AirlineRegistered {
            airline: candidate.clone(),
            name: name.to_string(),
        })?;
        tracing::info!(candidate = %candidate, count = self.airlines.registered_count(), "airline admitted");
        Ok(())
    }

    /// Record one incumbent's admission vote; returns votes collected
    pub fn record_vote(
        &mut self,
        caller: &PartyId,
        candidate: &PartyId,
        voter: &PartyId,
        name: &str,
    ) -> Result<usize> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        let votes = self.airlines.record_vote(candidate, voter, name)?;
        self.journal.append(LedgerEvent::VoteRecorded {
            candidate: candidate.clone(),
            voter: voter.clone(),
            votes,
        })?;
        tracing::debug!(candidate = %candidate, voter = %voter, votes, "admission vote recorded");
        Ok(votes)
    }

    // ---- flights ----

    /// Register a flight for the calling airline
    pub fn register_flight(
        &mut self,
        caller: &PartyId,
        code: &str,
        location: &str,
        timestamp: i64,
    ) -> Result<FlightKey> {
        self.ensure_operational()?;
        if !self.airlines.is_airline(caller) || !self.airlines.is_funded(caller) {
            return Err(Error::AirlineNotFunded(caller.to_string()));
        }

        let key = FlightKey::new(caller.clone(), code, timestamp);
        self.flights.register(key.clone(), location)?;
        self.journal.append(LedgerEvent::FlightRegistered {
            flight: key.clone(),
            location: location.to_string(),
        })?;
        Ok(key)
    }

    /// Current status of a flight
    pub fn flight_status(&self, key: &FlightKey) -> Result<FlightStatus> {
        self.flights.status(key)
    }

    /// Full flight record
    pub fn flight(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    /// Write a resolved status; oracle consensus only
    pub fn resolve_flight(
        &mut self,
        caller: &PartyId,
        key: &FlightKey,
        status: FlightStatus,
    ) -> Result<()> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        self.flights.set_status(key, status)?;
        self.journal.append(LedgerEvent::FlightResolved {
            flight: key.clone(),
            status,
        })?;
        tracing::info!(flight = %key, %status, "flight status resolved");
        Ok(())
    }

    // ---- insurance ----

    /// Purchase (or top up) insurance for a flight
    pub fn buy(&mut self, passenger: &PartyId, key: &FlightKey, value: Decimal) -> Result<()> {
        self.ensure_operational()?;
        if value > self.config.insurance_price_limit {
            return Err(Error::PriceExceedsLimit {
                paid: value,
                limit: self.config.insurance_price_limit,
            });
        }
        if !self.flights.contains(key) {
            return Err(Error::UnknownFlight(key.to_string()));
        }

        self.insurance
            .buy(passenger, key, value, self.config.insurance_price_limit)?;
        self.treasury.deposit(value);
        self.journal.append(LedgerEvent::InsurancePurchased {
            passenger: passenger.clone(),
            flight: key.clone(),
            amount: value,
        })?;
        Ok(())
    }

    /// Credit payouts for every uncredited policy on a flight; oracle
    /// consensus only
    pub fn credit_payouts(
        &mut self,
        caller: &PartyId,
        key: &FlightKey,
        multiplier: Decimal,
    ) -> Result<()> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        if !self.flights.contains(key) {
            return Err(Error::UnknownFlight(key.to_string()));
        }

        for (passenger, amount) in self.insurance.credit_flight(key, multiplier) {
            self.treasury.add_liability(amount);
            self.journal.append(LedgerEvent::PayoutCredited {
                passenger: passenger.clone(),
                flight: key.clone(),
                amount,
            })?;
            tracing::info!(passenger = %passenger, flight = %key, %amount, "payout credited");
        }
        Ok(())
    }

    /// Withdraw the caller's credited payouts
    ///
    /// Pull payment: the payable balance is cleared (and journaled) strictly
    /// before funds leave the treasury.
    pub fn withdraw(&mut self, caller: &PartyId) -> Result<Decimal> {
        self.ensure_operational()?;
        let amount = self.insurance.payable(caller);
        if amount.is_zero() {
            return Err(Error::NothingToWithdraw(caller.to_string()));
        }
        if !self.treasury.can_release(amount) {
            return Err(Error::InvariantViolation(format!(
                "payable {} exceeds treasury balance",
                amount
            )));
        }

        let cleared = self.insurance.clear_credits(caller)?;
        self.journal.append(LedgerEvent::PayoutsCleared {
            party: caller.clone(),
            amount: cleared,
        })?;

        self.treasury.release(cleared)?;
        self.journal.append(LedgerEvent::FundsReleased {
            party: caller.clone(),
            amount: cleared,
        })?;
        tracing::info!(party = %caller, amount = %cleared, "payout withdrawn");
        Ok(cleared)
    }

    /// Distinct insured passengers in purchase order
    pub fn passengers(&self) -> &[PartyId] {
        self.insurance.passengers()
    }

    /// Policy for one passenger on one flight
    pub fn policy(&self, key: &FlightKey, passenger: &PartyId) -> Option<&InsurancePolicy> {
        self.insurance.policy(key, passenger)
    }

    /// Credited, unwithdrawn total for a party
    pub fn payable(&self, party: &PartyId) -> Decimal {
        self.insurance.payable(party)
    }

    // ---- oracle bookkeeping (called by the decision layer) ----

    /// Collect an oracle registration fee and journal the assignment
    pub fn record_oracle_registered(
        &mut self,
        caller: &PartyId,
        oracle: &PartyId,
        indexes: &[u8],
        fee: Decimal,
    ) -> Result<()> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        self.treasury.deposit(fee);
        self.journal.append(LedgerEvent::OracleRegistered {
            oracle: oracle.clone(),
            indexes: indexes.to_vec(),
            fee,
        })?;
        Ok(())
    }

    /// Journal an opened status round; the entry is the observable event
    /// carrying the round index
    pub fn record_status_requested(
        &mut self,
        caller: &PartyId,
        key: &FlightKey,
        index: u8,
    ) -> Result<()> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        if !self.flights.contains(key) {
            return Err(Error::UnknownFlight(key.to_string()));
        }
        self.journal.append(LedgerEvent::StatusRequested {
            flight: key.clone(),
            index,
        })?;
        Ok(())
    }

    /// Journal an accepted oracle response
    pub fn record_response(
        &mut self,
        caller: &PartyId,
        oracle: &PartyId,
        key: &FlightKey,
        status: FlightStatus,
        count: usize,
    ) -> Result<()> {
        self.ensure_operational()?;
        self.require_authorized(caller)?;
        self.journal.append(LedgerEvent::ResponseRecorded {
            oracle: oracle.clone(),
            flight: key.clone(),
            status,
            count,
        })?;
        tracing::debug!(oracle = %oracle, flight = %key, %status, count, "oracle response recorded");
        Ok(())
    }

    // ---- accounting reads ----

    /// Treasury balance (all escrowed value)
    pub fn treasury_balance(&self) -> Decimal {
        self.treasury.balance()
    }

    /// Credited, unwithdrawn payout liabilities
    pub fn treasury_liabilities(&self) -> Decimal {
        self.treasury.liabilities()
    }

    /// Check the escrow solvency invariant
    pub fn check_solvency(&self) -> bool {
        self.treasury.is_solvent()
    }

    /// Append-only journal
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Configured constants
    pub fn config(&self) -> &Config {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(id: &str) -> PartyId {
        PartyId::new(id)
    }

    fn admin() -> PartyId {
        party("admin")
    }

    fn app() -> PartyId {
        party("app")
    }

    /// Ledger with a funded genesis airline and an authorized app identity
    fn funded_ledger() -> SuretyLedger {
        let mut ledger = SuretyLedger::new(Config::default(), admin())
            .with_genesis_airline(party("airline-1"), "Alpha Air")
            .unwrap();
        ledger.authorize_caller(&admin(), app()).unwrap();
        ledger.fund(&party("airline-1"), Decimal::from(10)).unwrap();
        ledger
    }

    #[test]
    fn test_initially_operational() {
        let ledger = SuretyLedger::new(Config::default(), admin());
        assert!(ledger.is_operational());
    }

    #[test]
    fn test_only_admin_sets_operational() {
        let mut ledger = SuretyLedger::new(Config::default(), admin());

        let err = ledger.set_operational(&party("mallory"), false).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
        assert!(ledger.is_operational());

        ledger.set_operational(&admin(), false).unwrap();
        assert!(!ledger.is_operational());

        // Admin can restore while the guard is down
        ledger.set_operational(&admin(), true).unwrap();
        assert!(ledger.is_operational());
    }

    #[test]
    fn test_guard_blocks_mutations() {
        let mut ledger = funded_ledger();
        ledger.set_operational(&admin(), false).unwrap();

        let err = ledger.fund(&party("airline-1"), Decimal::from(10)).unwrap_err();
        assert!(matches!(err, Error::NotOperational));
        let err = ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap_err();
        assert!(matches!(err, Error::NotOperational));

        ledger.set_operational(&admin(), true).unwrap();
        ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap();
    }

    #[test]
    fn test_fund_requires_membership_and_minimum() {
        let mut ledger = SuretyLedger::new(Config::default(), admin())
            .with_genesis_airline(party("airline-1"), "Alpha Air")
            .unwrap();

        let err = ledger.fund(&party("stranger"), Decimal::from(10)).unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        let err = ledger.fund(&party("airline-1"), Decimal::from(9)).unwrap_err();
        assert!(matches!(err, Error::BelowMinimumFunds { .. }));
        assert!(!ledger.is_funded(&party("airline-1")));

        ledger.fund(&party("airline-1"), Decimal::from(10)).unwrap();
        assert!(ledger.is_funded(&party("airline-1")));
        assert_eq!(ledger.treasury_balance(), Decimal::from(10));

        // Repeat funding is a no-op success
        ledger.fund(&party("airline-1"), Decimal::from(10)).unwrap();
        assert!(ledger.is_funded(&party("airline-1")));
    }

    #[test]
    fn test_unfunded_airline_cannot_register_flight() {
        let mut ledger = SuretyLedger::new(Config::default(), admin())
            .with_genesis_airline(party("airline-1"), "Alpha Air")
            .unwrap();

        let err = ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap_err();
        assert!(matches!(err, Error::AirlineNotFunded(_)));
    }

    #[test]
    fn test_privileged_surface_requires_authorization() {
        let mut ledger = funded_ledger();

        let err = ledger
            .admit_airline(&party("mallory"), &party("airline-2"), "Beta Air")
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));

        ledger
            .admit_airline(&app(), &party("airline-2"), "Beta Air")
            .unwrap();
        assert!(ledger.is_airline(&party("airline-2")));

        // Revocation closes the surface again
        ledger.deauthorize_caller(&admin(), &app()).unwrap();
        let err = ledger
            .admit_airline(&app(), &party("airline-3"), "Gamma Air")
            .unwrap_err();
        assert!(matches!(err, Error::Unauthorized(_)));
    }

    #[test]
    fn test_buy_checks_price_then_flight() {
        let mut ledger = funded_ledger();
        let key = ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap();

        let err = ledger
            .buy(&party("passenger-1"), &key, Decimal::from(2))
            .unwrap_err();
        assert!(matches!(err, Error::PriceExceedsLimit { .. }));
        assert!(ledger.passengers().is_empty());

        let ghost = FlightKey::new(party("airline-1"), "GHOST", 0);
        let err = ledger
            .buy(&party("passenger-1"), &ghost, Decimal::ONE)
            .unwrap_err();
        assert!(matches!(err, Error::UnknownFlight(_)));

        ledger.buy(&party("passenger-1"), &key, Decimal::ONE).unwrap();
        assert_eq!(ledger.passengers(), &[party("passenger-1")]);
    }

    #[test]
    fn test_withdraw_clears_before_release() {
        let mut ledger = funded_ledger();
        let key = ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap();
        ledger.buy(&party("passenger-1"), &key, Decimal::ONE).unwrap();
        ledger
            .credit_payouts(&app(), &key, Decimal::new(15, 1))
            .unwrap();
        assert_eq!(ledger.payable(&party("passenger-1")), Decimal::new(15, 1));
        assert!(ledger.check_solvency());

        let amount = ledger.withdraw(&party("passenger-1")).unwrap();
        assert_eq!(amount, Decimal::new(15, 1));
        assert_eq!(ledger.payable(&party("passenger-1")), Decimal::ZERO);

        // The journal shows the balance was cleared before funds moved
        let events: Vec<_> = ledger
            .journal()
            .entries()
            .iter()
            .map(|entry| &entry.event)
            .collect();
        let cleared = events
            .iter()
            .position(|event| matches!(event, LedgerEvent::PayoutsCleared { .. }))
            .unwrap();
        let released = events
            .iter()
            .position(|event| matches!(event, LedgerEvent::FundsReleased { .. }))
            .unwrap();
        assert!(cleared < released);

        let err = ledger.withdraw(&party("passenger-1")).unwrap_err();
        assert!(matches!(err, Error::NothingToWithdraw(_)));
    }

    #[test]
    fn test_credit_payouts_is_idempotent() {
        let mut ledger = funded_ledger();
        let key = ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap();
        ledger.buy(&party("passenger-1"), &key, Decimal::ONE).unwrap();

        ledger
            .credit_payouts(&app(), &key, Decimal::new(15, 1))
            .unwrap();
        ledger
            .credit_payouts(&app(), &key, Decimal::new(15, 1))
            .unwrap();

        assert_eq!(ledger.payable(&party("passenger-1")), Decimal::new(15, 1));
        assert_eq!(ledger.treasury_liabilities(), Decimal::new(15, 1));
    }

    #[test]
    fn test_journal_chain_verifies_after_activity() {
        let mut ledger = funded_ledger();
        let key = ledger
            .register_flight(&party("airline-1"), "CODE123", "Zurich", 1_700_000_000)
            .unwrap();
        ledger.buy(&party("passenger-1"), &key, Decimal::ONE).unwrap();

        assert!(ledger.journal().verify_chain().unwrap());
        assert!(!ledger.journal().is_empty());
    }
}
