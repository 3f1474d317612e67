//! Configuration for the surety core

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Core configuration
///
/// All values are exposed as reads on the application facade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Minimum collateral an airline must post before it may vote or
    /// register other airlines
    pub minimum_funds: Decimal,

    /// Maximum premium accepted for a single insurance purchase
    pub insurance_price_limit: Decimal,

    /// Credited payout = premium * multiplier on a late-airline resolution
    pub payout_multiplier: Decimal,

    /// Registered-airline count below which admission skips voting
    pub bootstrap_threshold: usize,

    /// Fee attached to oracle registration
    pub oracle_registration_fee: Decimal,

    /// Matching responses required to resolve a status round
    pub oracle_quorum: usize,

    /// Distinct indexes assigned to each oracle at registration
    pub indexes_per_oracle: usize,

    /// Indexes are drawn from `0..oracle_index_pool`
    pub oracle_index_pool: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            minimum_funds: Decimal::from(10),
            insurance_price_limit: Decimal::ONE,
            payout_multiplier: Decimal::new(15, 1), // 1.5x
            bootstrap_threshold: 4,
            oracle_registration_fee: Decimal::ONE,
            oracle_quorum: 3,
            indexes_per_oracle: 3,
            oracle_index_pool: 10,
        }
    }
}

impl Config {
    /// Load from TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| crate::Error::Config(format!("Failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Load defaults, then apply environment variable overrides
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Config::default();

        if let Ok(value) = std::env::var("SURETY_MINIMUM_FUNDS") {
            config.minimum_funds = parse_decimal("SURETY_MINIMUM_FUNDS", &value)?;
        }

        if let Ok(value) = std::env::var("SURETY_INSURANCE_PRICE_LIMIT") {
            config.insurance_price_limit = parse_decimal("SURETY_INSURANCE_PRICE_LIMIT", &value)?;
        }

        if let Ok(value) = std::env::var("SURETY_ORACLE_QUORUM") {
            config.oracle_quorum = value
                .parse()
                .map_err(|e| crate::Error::Config(format!("SURETY_ORACLE_QUORUM: {}", e)))?;
        }

        Ok(config)
    }
}

fn parse_decimal(name: &str, value: &str) -> crate::Result<Decimal> {
    value
        .parse()
        .map_err(|e| crate::Error::Config(format!("{}: {}", name, e)))
}
