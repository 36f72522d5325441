use crate::domain::inventory::DispenseError;
use crate::domain::planner::PlanRejection;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AtmError {
    #[error("Withdrawal amount must be a positive number")]
    InvalidAmount,
    #[error("Account not found for username {0}")]
    AccountNotFound(String),
    #[error("Insufficient funds: requested {requested}, available {available}")]
    InsufficientFunds { requested: u64, available: u64 },
    #[error(transparent)]
    Plan(#[from] PlanRejection),
    #[error(transparent)]
    Dispense(#[from] DispenseError),
    #[error("Denomination of value {0} is provisioned more than once")]
    DuplicateDenomination(u64),
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDBError(#[from] rocksdb::Error),
}

pub type Result<T> = std::result::Result<T, AtmError>;
