//! Withdrawal engine for a cash machine backed by a bank ledger.
//!
//! A withdrawal is authenticated, checked against the account, planned against
//! the machine's notes with a greedy largest-first pass, and then committed to
//! both the ledger and the cash inventory under their locks.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod interfaces;
pub mod telemetry;
