//! Flight registry
//!
//! Flat records keyed by (airline, code, timestamp). Status starts at
//! `Unknown` and is written exactly by the oracle consensus resolution path;
//! airlines have no direct setter.

use crate::error::{Error, Result};
use crate::types::{Flight, FlightKey, FlightStatus};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Registry of flights keyed by their composite key
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlightRegistry {
    flights: HashMap<FlightKey, Flight>,
}

impl FlightRegistry {
    /// Empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a flight with status `Unknown`
    pub fn register(&mut self, key: FlightKey, location: impl Into<String>) -> Result<()> {
        if self.flights.contains_key(&key) {
            return Err(Error::DuplicateFlight(key.to_string()));
        }

        self.flights.insert(
            key.clone(),
            Flight {
                key,
                location: location.into(),
                status: FlightStatus::Unknown,
                registered_at: Utc::now(),
            },
        );
        Ok(())
    }

    /// Whether the flight exists
    pub fn contains(&self, key: &FlightKey) -> bool {
        self.flights.contains_key(key)
    }

    /// Current status code
    pub fn status(&self, key: &FlightKey) -> Result<FlightStatus> {
        self.flights
            .get(key)
            .map(|flight| flight.status)
            .ok_or_else(|| Error::UnknownFlight(key.to_string()))
    }

    /// Write the resolved status
    pub fn set_status(&mut self, key: &FlightKey, status: FlightStatus) -> Result<()> {
        let flight = self
            .flights
            .get_mut(key)
            .ok_or_else(|| Error::UnknownFlight(key.to_string()))?;
        flight.status = status;
        Ok(())
    }

    /// Full flight record
    pub fn get(&self, key: &FlightKey) -> Option<&Flight> {
        self.flights.get(key)
    }

    /// Number of registered flights
    pub fn len(&self) -> usize {
        self.flights.len()
    }

    /// Whether no flights are registered
    pub fn is_empty(&self) -> bool {
        self.flights.is_empty()
    }
}
