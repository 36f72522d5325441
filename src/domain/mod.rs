//! Domain types and rules of the withdrawal engine.
//!
//! Nothing in here performs I/O or locking; the pieces are combined by the
//! application layer.

pub mod account;
pub mod inventory;
pub mod planner;
pub mod ports;
pub mod withdrawal;
