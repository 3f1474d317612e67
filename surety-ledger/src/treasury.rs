//! Treasury and escrow accounting
//!
//! Every unit of value the core holds (collateral, premiums, oracle fees)
//! enters the balance; credited payouts are tracked as liabilities until
//! withdrawn. Solvency means liabilities never exceed the balance.

use crate::error::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Value held by the ledger and the payouts owed against it
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Treasury {
    balance: Decimal,
    liabilities: Decimal,
}

impl Treasury {
    /// Empty treasury
    pub fn new() -> Self {
        Self::default()
    }

    /// Deposit attached value
    pub fn deposit(&mut self, amount: Decimal) {
        self.balance += amount;
    }

    /// Record a credited payout as owed
    pub fn add_liability(&mut self, amount: Decimal) {
        self.liabilities += amount;
    }

    /// Whether a release of `amount` is covered by the balance
    pub fn can_release(&self, amount: Decimal) -> bool {
        amount <= self.balance
    }

    /// Release funds to a withdrawing party, settling the liability
    pub fn release(&mut self, amount: Decimal) -> Result<()> {
        if !self.can_release(amount) {
            return Err(Error::InvariantViolation(format!(
                "release of {} exceeds treasury balance {}",
                amount, self.balance
            )));
        }
        self.balance -= amount;
        self.liabilities -= amount;
        Ok(())
    }

    /// Current balance
    pub fn balance(&self) -> Decimal {
        self.balance
    }

    /// Credited, unwithdrawn payouts
    pub fn liabilities(&self) -> Decimal {
        self.liabilities
    }

    /// Liabilities are covered by the balance
    pub fn is_solvent(&self) -> bool {
        self.liabilities <= self.balance
    }
}
