use crate::error::{AtmError, Result};
use serde::{Deserialize, Serialize};

/// A positive withdrawal amount in whole currency units.
///
/// Absent, zero and negative requests cannot be turned into an `Amount`, so
/// nothing downstream of validation ever sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u64);

impl Amount {
    pub fn new(value: u64) -> Result<Self> {
        if value > 0 {
            Ok(Self(value))
        } else {
            Err(AtmError::InvalidAmount)
        }
    }

    /// Validates a raw request amount as it arrives from the outside world.
    pub fn from_request(value: Option<i64>) -> Result<Self> {
        match value {
            Some(v) if v > 0 => Self::new(v as u64),
            _ => Err(AtmError::InvalidAmount),
        }
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

/// A bank account as seen by the ATM.
///
/// `overdraft` is the remaining borrowing headroom. Withdrawals that dip into it
/// consume it permanently; nothing in this crate replenishes it.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct Account {
    pub username: String,
    pub balance: u64,
    pub overdraft: u64,
    /// Opaque credential checked by an [`Authenticator`](super::ports::Authenticator).
    pub pin_hash: String,
}

impl Account {
    pub fn new(
        username: impl Into<String>,
        balance: u64,
        overdraft: u64,
        pin_hash: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            balance,
            overdraft,
            pin_hash: pin_hash.into(),
        }
    }

    /// Funds that can back a withdrawal, honoring the overdraft flag.
    pub fn available(&self, use_overdraft: bool) -> u64 {
        if use_overdraft {
            self.balance.saturating_add(self.overdraft)
        } else {
            self.balance
        }
    }

    pub fn can_afford(&self, amount: Amount, use_overdraft: bool) -> bool {
        self.available(use_overdraft) >= amount.value()
    }

    /// Debits the account.
    ///
    /// Amounts covered by the balance leave the overdraft untouched. Otherwise the
    /// balance is emptied and whatever is left of balance + overdraft becomes the
    /// new overdraft.
    pub fn withdraw(&mut self, amount: Amount, use_overdraft: bool) -> Result<()> {
        let amount = amount.value();
        if amount <= self.balance {
            self.balance -= amount;
            return Ok(());
        }

        let available = self.available(use_overdraft);
        if available < amount {
            return Err(AtmError::InsufficientFunds {
                requested: amount,
                available,
            });
        }

        self.overdraft = available - amount;
        self.balance = 0;
        Ok(())
    }

    /// The account without its credential, for audit listings.
    pub fn summary(&self) -> AccountSummary {
        AccountSummary {
            username: self.username.clone(),
            balance: self.balance,
            overdraft: self.overdraft,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone)]
pub struct AccountSummary {
    pub username: String,
    pub balance: u64,
    pub overdraft: u64,
}
