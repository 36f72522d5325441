//! Application layer containing the withdrawal engine's orchestration.
//!
//! `CashInventory` and `AccountLedger` each guard one shared resource behind
//! `tokio` mutexes; `WithdrawalCoordinator` combines them into a single
//! withdrawal, always locking the account before the inventory.

pub mod coordinator;
pub mod enquiry;
pub mod inventory;
pub mod ledger;
