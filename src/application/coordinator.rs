use super::inventory::CashInventory;
use super::ledger::AccountLedger;
use crate::domain::account::{Account, Amount};
use crate::domain::inventory::DispensePlan;
use crate::domain::ports::AuthenticatorBox;
use crate::domain::withdrawal::{WithdrawalOutcome, WithdrawalRequest};
use crate::error::{AtmError, Result};
use std::sync::Arc;

/// Runs withdrawal requests end to end.
///
/// Each request walks authentication, amount validation, the affordability
/// check, planning and the commit, stopping at the first step that fails.
/// Every stop is a [`WithdrawalOutcome`]; only an unknown account and storage
/// failures come back as errors. Nothing is retried.
pub struct WithdrawalCoordinator {
    ledger: Arc<AccountLedger>,
    inventory: Arc<CashInventory>,
    authenticator: AuthenticatorBox,
}

impl WithdrawalCoordinator {
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

    pub async fn withdraw(&self, request: WithdrawalRequest) -> Result<WithdrawalOutcome> {
        let account = self.ledger.find(&request.username).await?;

        if !self.authenticator.authenticate(&account, &request.pin) {
            tracing::debug!(username = %request.username, "withdrawal rejected: invalid pin");
            return Ok(WithdrawalOutcome::InvalidPin);
        }

        let amount = match Amount::from_request(request.amount) {
            Ok(amount) => amount,
            Err(_) => {
                tracing::debug!(?request, "withdrawal rejected: invalid amount");
                return Ok(WithdrawalOutcome::InvalidAmount {
                    balance: account.balance,
                    overdraft: account.overdraft,
                });
            }
        };

        if !account.can_afford(amount, request.use_overdraft) {
            tracing::debug!(?request, "withdrawal rejected: insufficient account funds");
            return Ok(insufficient_funds(&account));
        }

        let plan = match self.inventory.plan(amount).await {
            Ok(plan) if !plan.is_empty() => plan,
            Ok(_) => return Ok(machine_cash_rejection(&account, "Nothing to dispense".to_string())),
            Err(AtmError::Plan(rejection)) => {
                tracing::debug!(
                    ?request,
                    %rejection,
                    "withdrawal rejected: machine cannot dispense"
                );
                return Ok(machine_cash_rejection(&account, rejection.to_string()));
            }
            Err(e) => return Err(e),
        };

        let outcome = self.commit(&request, amount, plan).await?;
        tracing::info!(
            username = %request.username,
            amount = amount.value(),
            status = %outcome.status(),
            "withdrawal processed"
        );
        Ok(outcome)
    }

    /// Debits the account and dispenses the plan as one unit.
    ///
    /// Locks are taken account first, inventory second. The account is reloaded
    /// and re-checked under its lock, and the plan is re-validated against live
    /// counts before any money moves, so a concurrent request that got there
    /// first turns this one into a rejection instead of a half-applied debit.
    async fn commit(
        &self,
        request: &WithdrawalRequest,
        amount: Amount,
        plan: DispensePlan,
    ) -> Result<WithdrawalOutcome> {
        let account_lock = self.ledger.lock(&request.username).await;
        let account = self.ledger.find(&request.username).await?;
        if !account.can_afford(amount, request.use_overdraft) {
            return Ok(insufficient_funds(&account));
        }

        let inventory_lock = self.inventory.lock().await;
        let remaining = match self.inventory.check(&inventory_lock, &plan).await {
            Ok(remaining) => remaining,
            Err(AtmError::Dispense(e)) => {
                tracing::debug!(?request, error = %e, "dispense no longer possible");
                return Ok(machine_cash_rejection(&account, e.to_string()));
            }
            Err(e) => return Err(e),
        };

        let debited = match self
            .ledger
            .debit(&account_lock, amount, request.use_overdraft)
            .await
        {
            Ok(debited) => debited,
            Err(AtmError::InsufficientFunds { .. }) => return Ok(insufficient_funds(&account)),
            Err(e) => return Err(e),
        };

        if let Err(e) = self.inventory.commit(&inventory_lock, remaining).await {
            tracing::warn!(
                username = %request.username,
                error = %e,
                "inventory update failed after debit, restoring account"
            );
            if let Err(restore_error) = self.ledger.restore(&account_lock, account).await {
                tracing::error!(
                    username = %request.username,
                    error = %restore_error,
                    "failed to restore account after inventory update failure"
                );
            }
            return Err(e);
        }

        Ok(WithdrawalOutcome::Success {
            balance: debited.balance,
            overdraft: debited.overdraft,
            plan,
        })
    }
}

fn insufficient_funds(account: &Account) -> WithdrawalOutcome {
    WithdrawalOutcome::InsufficientAccountFunds {
        balance: account.balance,
        overdraft: account.overdraft,
    }
}

fn machine_cash_rejection(account: &Account, message: String) -> WithdrawalOutcome {
    WithdrawalOutcome::InsufficientMachineCash {
        balance: account.balance,
        overdraft: account.overdraft,
        message,
    }
}
