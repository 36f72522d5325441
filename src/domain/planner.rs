//! Greedy dispense planning.
//!
//! The planner is a pure function over an inventory view: it reads counts and
//! never mutates them. Applying a plan is the job of
//! [`CashInventory`](crate::application::inventory::CashInventory).

use super::account::Amount;
use super::inventory::{Denomination, DispenseEntry, DispensePlan};
use thiserror::Error;

/// Rule used to compute the machine total for the capacity pre-check.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CapacityCheck {
    /// Sum of each denomination's count squared. Kept as the default so
    /// machines behave the same as the system they replace.
    #[default]
    SquaredCounts,
    /// Sum of value times count, the cash actually in the machine.
    FaceValue,
}

impl CapacityCheck {
    pub fn machine_total(&self, denominations: &[Denomination]) -> u64 {
        denominations.iter().fold(0u64, |acc, d| {
            let figure = match self {
                CapacityCheck::SquaredCounts => {
                    d.available_count.saturating_mul(d.available_count)
                }
                CapacityCheck::FaceValue => d.value.saturating_mul(d.available_count),
            };
            acc.saturating_add(figure)
        })
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanRejection {
    #[error(
        "Insufficient money in the machine: requested {requested}, machine total {machine_total}"
    )]
    InsufficientCash { requested: u64, machine_total: u64 },
    #[error(
        "Amount {requested} cannot be dispensed with the available denominations, please try a different amount"
    )]
    Unsatisfiable { requested: u64, remainder: u64 },
}

/// Builds a dispense plan for `amount`, taking as many of each denomination as
/// fit, in the order the denominations are given.
///
/// The order is not re-sorted here. Callers holding an
/// [`InventorySnapshot`](super::inventory::InventorySnapshot) get descending
/// order; any other order can yield a different plan or none at all.
pub fn plan(
    amount: Amount,
    denominations: &[Denomination],
    capacity_check: CapacityCheck,
) -> Result<DispensePlan, PlanRejection> {
    let requested = amount.value();
    let machine_total = capacity_check.machine_total(denominations);
    if machine_total < requested {
        return Err(PlanRejection::InsufficientCash {
            requested,
            machine_total,
        });
    }

    let mut remaining = requested;
    let mut entries = Vec::new();
    for denomination in denominations {
        if remaining == 0 {
            break;
        }
        if denomination.value == 0 {
            continue;
        }
        let take = (remaining / denomination.value).min(denomination.available_count);
        if take > 0 {
            entries.push(DispenseEntry {
                value: denomination.value,
                count: take,
            });
            remaining -= take * denomination.value;
        }
    }

    if remaining != 0 {
        return Err(PlanRejection::Unsatisfiable {
            requested,
            remainder: remaining,
        });
    }

    Ok(DispensePlan::new(entries))
}
