//! Property-based tests for ledger invariants
//!
//! These tests use proptest to verify critical invariants:
//! - Journal chain integrity: any sequence of events yields a verifiable chain
//! - Pull payment: withdraw always zeroes the payable balance
//! - Premium accounting: accepted purchases accumulate exactly

use proptest::prelude::*;
use rust_decimal::Decimal;
use surety_ledger::{
    Config, Error, FlightKey, Journal, LedgerEvent, PartyId, SuretyLedger,
};

fn party(id: &str) -> PartyId {
    PartyId::new(id)
}

/// Strategy for premiums within the default price limit (cents)
fn premium_strategy() -> impl Strategy<Value = Decimal> {
    (1u64..=100u64).prop_map(|cents| Decimal::new(cents as i64, 2))
}

/// Strategy for a small pool of passenger identities
fn passenger_strategy() -> impl Strategy<Value = PartyId> {
    (0u8..8u8).prop_map(|n| PartyId::new(format!("passenger-{}", n)))
}

/// Strategy for journal events
fn event_strategy() -> impl Strategy<Value = LedgerEvent> {
    let flight = FlightKey::new(PartyId::new("airline-1"), "CODE123", 1_700_000_000);
    prop_oneof![
        any::<bool>().prop_map(|enabled| LedgerEvent::OperationalChanged { enabled }),
        premium_strategy().prop_map(|amount| LedgerEvent::AirlineFunded {
            airline: PartyId::new("airline-1"),
            amount,
        }),
        (passenger_strategy(), premium_strategy()).prop_map({
            let flight = flight.clone();
            move |(passenger, amount)| LedgerEvent::InsurancePurchased {
                passenger,
                flight: flight.clone(),
                amount,
            }
        }),
        passenger_strategy().prop_map({
            let flight = flight.clone();
            move |passenger| LedgerEvent::PayoutCredited {
                passenger,
                flight: flight.clone(),
                amount: Decimal::new(15, 1),
            }
        }),
    ]
}

/// Build a ledger with one funded airline, one flight, and an authorized app
fn ledger_with_flight() -> (SuretyLedger, FlightKey) {
    let admin = party("admin");
    let airline = party("airline-1");
    let mut ledger = SuretyLedger::new(Config::default(), admin.clone())
        .with_genesis_airline(airline.clone(), "Alpha Air")
        .unwrap();
    ledger.authorize_caller(&admin, party("app")).unwrap();
    // Collateral well above the minimum so 1.5x payouts stay covered for
    // any generated purchase set
    ledger.fund(&airline, Decimal::from(100)).unwrap();
    let key = ledger
        .register_flight(&airline, "CODE123", "Zurich", 1_700_000_000)
        .unwrap();
    (ledger, key)
}

proptest! {
    #[test]
    fn prop_journal_chain_always_verifies(events in prop::collection::vec(event_strategy(), 0..64)) {
        let mut journal = Journal::new();
        for event in events {
            journal.append(event).unwrap();
        }
        prop_assert!(journal.verify_chain().unwrap());
    }

    #[test]
    fn prop_withdraw_zeroes_payable(
        purchases in prop::collection::vec((passenger_strategy(), premium_strategy()), 1..32)
    ) {
        let (mut ledger, key) = ledger_with_flight();
        for (passenger, amount) in &purchases {
            ledger.buy(passenger, &key, *amount).unwrap();
        }
        ledger
            .credit_payouts(&party("app"), &key, Decimal::new(15, 1))
            .unwrap();

        let passengers: std::collections::BTreeSet<_> =
            purchases.iter().map(|(passenger, _)| passenger.clone()).collect();
        for passenger in &passengers {
            let payable = ledger.payable(passenger);
            prop_assert!(!payable.is_zero());

            let withdrawn = ledger.withdraw(passenger).unwrap();
            prop_assert_eq!(withdrawn, payable);
            prop_assert_eq!(ledger.payable(passenger), Decimal::ZERO);

            // A second consecutive withdrawal has nothing left to take
            prop_assert!(matches!(
                ledger.withdraw(passenger),
                Err(Error::NothingToWithdraw(_))
            ));
        }
        prop_assert_eq!(ledger.treasury_liabilities(), Decimal::ZERO);
        prop_assert!(ledger.check_solvency());
    }

    #[test]
    fn prop_premiums_accumulate_exactly(
        amounts in prop::collection::vec(premium_strategy(), 1..16)
    ) {
        let (mut ledger, key) = ledger_with_flight();
        let passenger = party("passenger-0");

        let mut expected = Decimal::ZERO;
        for amount in &amounts {
            ledger.buy(&passenger, &key, *amount).unwrap();
            expected += *amount;
        }

        let policy = ledger.policy(&key, &passenger).unwrap();
        prop_assert_eq!(policy.amount_paid, expected);
        prop_assert_eq!(ledger.passengers().len(), 1);
    }
}
