use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use thiserror::Error;

/// A note value together with how many of them the machine holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Denomination {
    pub value: u64,
    pub available_count: u64,
}

impl Denomination {
    pub fn new(value: u64, available_count: u64) -> Self {
        Self {
            value,
            available_count,
        }
    }
}

/// A point-in-time view of the machine's cash.
///
/// Denominations are always held sorted descending by value, whatever order
/// the backing store returns them in. The planner's greedy pass depends on it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventorySnapshot {
    denominations: Vec<Denomination>,
}

impl InventorySnapshot {
    pub fn new(mut denominations: Vec<Denomination>) -> Self {
        denominations.sort_by(|a, b| b.value.cmp(&a.value));
        Self { denominations }
    }

    pub fn denominations(&self) -> &[Denomination] {
        &self.denominations
    }

    pub fn into_denominations(self) -> Vec<Denomination> {
        self.denominations
    }

    pub fn get(&self, value: u64) -> Option<&Denomination> {
        self.denominations.iter().find(|d| d.value == value)
    }

    /// First value that appears more than once, if any.
    pub fn duplicate_value(&self) -> Option<u64> {
        let mut seen = HashSet::new();
        self.denominations
            .iter()
            .map(|d| d.value)
            .find(|value| !seen.insert(*value))
    }

    /// Face value of all notes in the machine.
    pub fn face_value(&self) -> u64 {
        self.denominations.iter().fold(0u64, |acc, d| {
            acc.saturating_add(d.value.saturating_mul(d.available_count))
        })
    }

    /// Returns the inventory left after dispensing `plan`.
    ///
    /// Every entry is checked before anything is taken; a single failing entry
    /// rejects the whole plan and `self` is returned untouched inside the error.
    pub fn remove(&self, plan: &DispensePlan) -> Result<InventorySnapshot, DispenseError> {
        let mut remaining = self.denominations.clone();
        for entry in plan.entries() {
            let Some(denomination) = remaining.iter_mut().find(|d| d.value == entry.value) else {
                return Err(DispenseError::new(
                    DispenseFailure::DenominationNotAvailable { value: entry.value },
                    self.clone(),
                ));
            };
            if denomination.available_count < entry.count {
                return Err(DispenseError::new(
                    DispenseFailure::DenominationCountNotAvailable {
                        value: entry.value,
                        requested: entry.count,
                        available: denomination.available_count,
                    },
                    self.clone(),
                ));
            }
            denomination.available_count -= entry.count;
        }
        Ok(InventorySnapshot::new(remaining))
    }
}

/// One line of a dispense plan: `count` notes of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispenseEntry {
    pub value: u64,
    pub count: u64,
}

impl DispenseEntry {
    pub fn total(&self) -> u64 {
        self.value * self.count
    }
}

impl fmt::Display for DispenseEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.value, self.count)
    }
}

/// The notes to hand out for one withdrawal.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DispensePlan {
    entries: Vec<DispenseEntry>,
}

impl DispensePlan {
    pub fn new(entries: Vec<DispenseEntry>) -> Self {
        Self { entries }
    }

    pub fn entries(&self) -> &[DispenseEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Amount covered by the plan.
    pub fn total(&self) -> u64 {
        self.entries.iter().map(DispenseEntry::total).sum()
    }
}

impl fmt::Display for DispensePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.entries.iter().map(ToString::to_string).collect();
        write!(f, "{}", parts.join(";"))
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispenseFailure {
    #[error("Denomination of value {value} is not available in the machine")]
    DenominationNotAvailable { value: u64 },
    #[error(
        "Count for denomination {value} is not available in the machine: expected {requested}, available {available}"
    )]
    DenominationCountNotAvailable {
        value: u64,
        requested: u64,
        available: u64,
    },
}

/// A dispense that no longer matches the live inventory.
///
/// Carries the inventory as it stood when the plan was rejected, which is also
/// the inventory as it stands afterwards: nothing was taken.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{failure}")]
pub struct DispenseError {
    pub failure: DispenseFailure,
    pub inventory: InventorySnapshot,
}

impl DispenseError {
    pub fn new(failure: DispenseFailure, inventory: InventorySnapshot) -> Self {
        Self { failure, inventory }
    }
}
