//! End-to-end scenario walkthrough
//!
//! Deploys the core in-process and drives the full insurance lifecycle:
//! funding, flight registration, insurance purchase, oracle quorum, payout
//! withdrawal. Run with `RUST_LOG=debug` to watch every state transition.

use anyhow::Context;
use surety_consensus::{IndexSource, StatusRequestOutcome, SuretyApp};
use surety_ledger::{Config, FlightStatus, PartyId, SuretyLedger};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let admin = PartyId::new("admin");
    let app_id = PartyId::new("surety-app");
    let airline = PartyId::new("alpha-air");
    let passenger = PartyId::new("passenger-1");

    // Deployment: ledger, genesis airline, authorized app identity
    let config = Config::default();
    let mut ledger = SuretyLedger::new(config.clone(), admin.clone())
        .with_genesis_airline(airline.clone(), "Alpha Air")
        .context("seeding genesis airline")?;
    ledger
        .authorize_caller(&admin, app_id.clone())
        .context("authorizing app identity")?;
    let app = SuretyApp::new(ledger, app_id, IndexSource::from_entropy());

    // Airline posts collateral and registers a flight
    app.fund(&airline, config.minimum_funds)?;
    let key = app.register_flight(&airline, "CODE123", "Zurich", 1_700_000_000)?;
    tracing::info!(flight = %key, "flight registered");

    // Passenger pays the price ceiling
    app.buy(&passenger, &key, config.insurance_price_limit)?;

    // Open a round and register oracles until enough hold its index
    let outcome = app.request_flight_status(&PartyId::new("requester"), &key)?;
    let index = match outcome {
        StatusRequestOutcome::Opened { index } => index,
        StatusRequestOutcome::AlreadyResolved(status) => {
            anyhow::bail!("round resolved before any submission: {status}")
        }
    };

    let mut holders = Vec::new();
    let mut next = 0;
    while holders.len() < config.oracle_quorum {
        next += 1;
        let oracle = PartyId::new(format!("oracle-{next}"));
        let assigned = app.register_oracle(&oracle, config.oracle_registration_fee)?;
        if assigned.contains(&index) {
            holders.push(oracle);
        }
    }
    tracing::info!(registered = next, quorum = config.oracle_quorum, "oracles ready");

    // Quorum of matching late-airline reports resolves the round
    for holder in &holders {
        app.submit_response(holder, &key, index, FlightStatus::LateAirline)?;
    }
    anyhow::ensure!(
        app.flight_status(&key)? == FlightStatus::LateAirline,
        "round did not resolve"
    );

    let credited = app.payable(&passenger);
    let withdrawn = app.withdraw(&passenger)?;
    tracing::info!(%credited, %withdrawn, "payout complete");

    anyhow::ensure!(app.check_solvency(), "treasury must stay solvent");
    anyhow::ensure!(app.verify_journal()?, "journal chain must verify");

    println!("scenario complete:");
    println!("  flight:    {key}");
    println!("  status:    {}", app.flight_status(&key)?);
    println!("  withdrawn: {withdrawn}");
    println!("  treasury:  {}", app.treasury_balance());
    println!("  journal:   {} entries", app.journal_events().len());
    Ok(())
}
