//! Insurance book: policies, roster, and the two-phase payout
//!
//! Purchases escrow a premium against a flight. When a late-airline
//! resolution arrives, every policy on the flight is credited exactly once
//! (premium times the payout multiplier). Withdrawal is pull-payment: the
//! payable balance is cleared first, funds move second.

use crate::error::{Error, Result};
use crate::types::{FlightKey, InsurancePolicy, PartyId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Policies per flight plus the distinct-passenger roster
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InsuranceBook {
    policies: HashMap<FlightKey, Vec<InsurancePolicy>>,
    passengers: Vec<PartyId>,
}

impl InsuranceBook {
    /// Empty book
    pub fn new() -> Self {
        Self::default()
    }

    /// Create or top up a policy and keep the roster distinct
    ///
    /// The price ceiling applies per purchase; the flight's existence is the
    /// caller's concern.
    pub fn buy(
        &mut self,
        passenger: &PartyId,
        flight: &FlightKey,
        amount: Decimal,
        price_limit: Decimal,
    ) -> Result<()> {
        if amount > price_limit {
            return Err(Error::PriceExceedsLimit {
                paid: amount,
                limit: price_limit,
            });
        }

        let policies = self.policies.entry(flight.clone()).or_default();
        match policies
            .iter_mut()
            .find(|policy| policy.passenger == *passenger)
        {
            Some(policy) => policy.amount_paid += amount,
            None => policies.push(InsurancePolicy::new(
                passenger.clone(),
                flight.clone(),
                amount,
            )),
        }

        if !self.passengers.contains(passenger) {
            self.passengers.push(passenger.clone());
        }
        Ok(())
    }

    /// Credit every not-yet-credited policy on the flight
    ///
    /// Returns the newly credited (passenger, amount) pairs; policies already
    /// credited are skipped, so calling this again is a no-op.
    pub fn credit_flight(
        &mut self,
        flight: &FlightKey,
        multiplier: Decimal,
    ) -> Vec<(PartyId, Decimal)> {
        let mut credited = Vec::new();
        if let Some(policies) = self.policies.get_mut(flight) {
            for policy in policies.iter_mut().filter(|policy| !policy.credited) {
                policy.credited_payout = policy.amount_paid * multiplier;
                policy.credited = true;
                credited.push((policy.passenger.clone(), policy.credited_payout));
            }
        }
        credited
    }

    /// Sum of credited, unwithdrawn payouts across all the party's policies
    pub fn payable(&self, party: &PartyId) -> Decimal {
        self.policies
            .values()
            .flatten()
            .filter(|policy| policy.passenger == *party && policy.is_payable())
            .map(|policy| policy.credited_payout)
            .sum()
    }

    /// Mark every payable policy withdrawn and return the cleared sum
    ///
    /// After this returns, [`payable`](Self::payable) is zero for the party.
    pub fn clear_credits(&mut self, party: &PartyId) -> Result<Decimal> {
        let mut cleared = Decimal::ZERO;
        for policy in self
            .policies
            .values_mut()
            .flatten()
            .filter(|policy| policy.passenger == *party && policy.is_payable())
        {
            cleared += policy.credited_payout;
            policy.withdrawn = true;
        }

        if cleared.is_zero() {
            return Err(Error::NothingToWithdraw(party.to_string()));
        }
        Ok(cleared)
    }

    /// Distinct passengers in purchase order
    pub fn passengers(&self) -> &[PartyId] {
        &self.passengers
    }

    /// Policy for one passenger on one flight
    pub fn policy(&self, flight: &FlightKey, passenger: &PartyId) -> Option<&InsurancePolicy> {
        self.policies
            .get(flight)?
            .iter()
            .find(|policy| policy.passenger == *passenger)
    }

    /// All policies on one flight
    pub fn policies_for_flight(&self, flight: &FlightKey) -> &[InsurancePolicy] {
        self.policies
            .get(flight)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn party(id: &str) -> PartyId {
        PartyId::new(id)
    }

    fn flight() -> FlightKey {
        FlightKey::new(party("airline-1"), "CODE123", 1_700_000_000)
    }

    fn limit() -> Decimal {
        Decimal::ONE
    }

    #[test]
    fn test_price_ceiling() {
        let mut book = InsuranceBook::new();
        let err = book
            .buy(&party("passenger-1"), &flight(), Decimal::new(11, 1), limit())
            .unwrap_err();
        assert!(matches!(err, Error::PriceExceedsLimit { .. }));
        assert!(book.passengers().is_empty());
    }

    #[test]
    fn test_roster_stays_distinct_on_repeat_purchase() {
        let mut book = InsuranceBook::new();
        let passenger = party("passenger-1");
        book.buy(&passenger, &flight(), Decimal::new(5, 1), limit())
            .unwrap();
        book.buy(&passenger, &flight(), Decimal::new(5, 1), limit())
            .unwrap();

        assert_eq!(book.passengers(), &[passenger.clone()]);
        assert_eq!(
            book.policy(&flight(), &passenger).unwrap().amount_paid,
            Decimal::ONE
        );
    }

    #[test]
    fn test_credit_exactly_once() {
        let mut book = InsuranceBook::new();
        let passenger = party("passenger-1");
        book.buy(&passenger, &flight(), Decimal::ONE, limit()).unwrap();

        let multiplier = Decimal::new(15, 1);
        let credited = book.credit_flight(&flight(), multiplier);
        assert_eq!(credited, vec![(passenger.clone(), Decimal::new(15, 1))]);

        // Second credit pass is a no-op
        assert!(book.credit_flight(&flight(), multiplier).is_empty());
        assert_eq!(book.payable(&passenger), Decimal::new(15, 1));
    }

    #[test]
    fn test_clear_credits_zeroes_payable() {
        let mut book = InsuranceBook::new();
        let passenger = party("passenger-1");
        let other = FlightKey::new(party("airline-2"), "CODE456", 1_700_000_000);

        book.buy(&passenger, &flight(), Decimal::ONE, limit()).unwrap();
        book.buy(&passenger, &other, Decimal::new(5, 1), limit())
            .unwrap();
        book.credit_flight(&flight(), Decimal::new(15, 1));
        book.credit_flight(&other, Decimal::new(15, 1));

        let cleared = book.clear_credits(&passenger).unwrap();
        assert_eq!(cleared, Decimal::new(225, 2)); // 1.5 + 0.75
        assert_eq!(book.payable(&passenger), Decimal::ZERO);

        let err = book.clear_credits(&passenger).unwrap_err();
        assert!(matches!(err, Error::NothingToWithdraw(_)));
    }

    #[test]
    fn test_uncredited_policy_not_payable() {
        let mut book = InsuranceBook::new();
        let passenger = party("passenger-1");
        book.buy(&passenger, &flight(), Decimal::ONE, limit()).unwrap();

        assert_eq!(book.payable(&passenger), Decimal::ZERO);
        assert!(book.clear_credits(&passenger).is_err());
    }
}
