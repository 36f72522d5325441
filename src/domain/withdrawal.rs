use super::inventory::DispensePlan;
use serde::Serialize;
use std::fmt;

pub const COLLECT_CASH_MESSAGE: &str = "Please collect your cash";
pub const INVALID_PIN_MESSAGE: &str = "Invalid pin";
pub const INSUFFICIENT_ACCOUNT_FUNDS_MESSAGE: &str = "Insufficient funds in account";
pub const POSITIVE_AMOUNT_MESSAGE: &str = "Please provide a positive amount to withdraw";

/// A customer's request to take cash out of the machine.
///
/// `amount` is kept raw so that absent or non-positive values reach the
/// coordinator and get a proper outcome instead of failing at parse time.
#[derive(Clone, PartialEq, Eq)]
pub struct WithdrawalRequest {
    pub username: String,
    pub pin: String,
    pub amount: Option<i64>,
    pub use_overdraft: bool,
}

impl WithdrawalRequest {
    pub fn new(
        username: impl Into<String>,
        pin: impl Into<String>,
        amount: Option<i64>,
        use_overdraft: bool,
    ) -> Self {
        Self {
            username: username.into(),
            pin: pin.into(),
            amount,
            use_overdraft,
        }
    }
}

impl fmt::Debug for WithdrawalRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WithdrawalRequest")
            .field("username", &self.username)
            .field("pin", &"*****")
            .field("amount", &self.amount)
            .field("use_overdraft", &self.use_overdraft)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WithdrawalStatus {
    Success,
    InvalidPin,
    LowBalance,
    LowBalanceInAtm,
    InvalidRequestAmount,
}

impl WithdrawalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            WithdrawalStatus::Success => "success",
            WithdrawalStatus::InvalidPin => "invalid_pin",
            WithdrawalStatus::LowBalance => "low_balance",
            WithdrawalStatus::LowBalanceInAtm => "low_balance_in_atm",
            WithdrawalStatus::InvalidRequestAmount => "invalid_request_amount",
        }
    }
}

impl fmt::Display for WithdrawalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Terminal result of a withdrawal request.
///
/// Balances carried by the failure variants are the account's figures at the
/// time of the decision; failures never change them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WithdrawalOutcome {
    Success {
        balance: u64,
        overdraft: u64,
        plan: DispensePlan,
    },
    InvalidPin,
    InsufficientAccountFunds {
        balance: u64,
        overdraft: u64,
    },
    InsufficientMachineCash {
        balance: u64,
        overdraft: u64,
        message: String,
    },
    InvalidAmount {
        balance: u64,
        overdraft: u64,
    },
}

impl WithdrawalOutcome {
    pub fn status(&self) -> WithdrawalStatus {
        match self {
            WithdrawalOutcome::Success { .. } => WithdrawalStatus::Success,
            WithdrawalOutcome::InvalidPin => WithdrawalStatus::InvalidPin,
            WithdrawalOutcome::InsufficientAccountFunds { .. } => WithdrawalStatus::LowBalance,
            WithdrawalOutcome::InsufficientMachineCash { .. } => WithdrawalStatus::LowBalanceInAtm,
            WithdrawalOutcome::InvalidAmount { .. } => WithdrawalStatus::InvalidRequestAmount,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, WithdrawalOutcome::Success { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            WithdrawalOutcome::Success { .. } => COLLECT_CASH_MESSAGE,
            WithdrawalOutcome::InvalidPin => INVALID_PIN_MESSAGE,
            WithdrawalOutcome::InsufficientAccountFunds { .. } => {
                INSUFFICIENT_ACCOUNT_FUNDS_MESSAGE
            }
            WithdrawalOutcome::InsufficientMachineCash { message, .. } => message,
            WithdrawalOutcome::InvalidAmount { .. } => POSITIVE_AMOUNT_MESSAGE,
        }
    }

    /// Balance and overdraft reported with the outcome, if any.
    pub fn balances(&self) -> Option<(u64, u64)> {
        match self {
            WithdrawalOutcome::Success {
                balance, overdraft, ..
            }
            | WithdrawalOutcome::InsufficientAccountFunds { balance, overdraft }
            | WithdrawalOutcome::InsufficientMachineCash {
                balance, overdraft, ..
            }
            | WithdrawalOutcome::InvalidAmount { balance, overdraft } => {
                Some((*balance, *overdraft))
            }
            WithdrawalOutcome::InvalidPin => None,
        }
    }

    pub fn plan(&self) -> Option<&DispensePlan> {
        match self {
            WithdrawalOutcome::Success { plan, .. } => Some(plan),
            _ => None,
        }
    }
}
