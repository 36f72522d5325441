use super::inventory::CashInventory;
use super::ledger::AccountLedger;
use crate::domain::account::AccountSummary;
use crate::domain::inventory::InventorySnapshot;
use crate::domain::ports::AuthenticatorBox;
use crate::error::{AtmError, Result};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BalanceOutcome {
    Balance { balance: u64, overdraft: u64 },
    InvalidPin,
    AccountNotFound,
}

/// Read-only queries: balance enquiries for customers and audit listings
/// for operators.
pub struct EnquiryService {
    ledger: Arc<AccountLedger>,
    inventory: Arc<CashInventory>,
    authenticator: AuthenticatorBox,
}

impl EnquiryService {
    pub fn new(
        ledger: Arc<AccountLedger>,
        inventory: Arc<CashInventory>,
        authenticator: AuthenticatorBox,
    ) -> Self {
        Self {
            ledger,
            inventory,
            authenticator,
        }
    }

    pub async fn balance(&self, username: &str, pin: &str) -> Result<BalanceOutcome> {
        let account = match self.ledger.find(username).await {
            Ok(account) => account,
            Err(AtmError::AccountNotFound(_)) => return Ok(BalanceOutcome::AccountNotFound),
            Err(e) => return Err(e),
        };

        if !self.authenticator.authenticate(&account, pin) {
            return Ok(BalanceOutcome::InvalidPin);
        }

        Ok(BalanceOutcome::Balance {
            balance: account.balance,
            overdraft: account.overdraft,
        })
    }

    /// All accounts, without credentials.
    pub async fn accounts(&self) -> Result<Vec<AccountSummary>> {
        let accounts = self.ledger.all().await?;
        Ok(accounts.iter().map(|a| a.summary()).collect())
    }

    pub async fn machine_inventory(&self) -> Result<InventorySnapshot> {
        self.inventory.current_state().await
    }
}
