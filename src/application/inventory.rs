use crate::config::AtmConfig;
use crate::domain::account::Amount;
use crate::domain::inventory::{Denomination, DispensePlan, InventorySnapshot};
use crate::domain::planner::{self, CapacityCheck};
use crate::domain::ports::InventoryStoreBox;
use crate::error::{AtmError, Result};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Proof that the caller holds the machine's inventory lock.
pub struct InventoryLock {
    _guard: OwnedMutexGuard<()>,
}

/// The machine's cash.
///
/// Reads go straight to the store. Every mutation runs under a single mutex
/// that covers reloading, validating and saving, so two dispenses can never
/// both pass their checks against the same counts.
pub struct CashInventory {
    store: InventoryStoreBox,
    capacity_check: CapacityCheck,
    lock: Arc<Mutex<()>>,
}

impl CashInventory {
    pub fn new(store: InventoryStoreBox, config: AtmConfig) -> Self {
        Self {
            store,
            capacity_check: config.capacity_check,
            lock: Arc::new(Mutex::new(())),
        }
    }

    /// Current denominations, descending by value.
    pub async fn current_state(&self) -> Result<InventorySnapshot> {
        Ok(InventorySnapshot::new(self.store.load_all().await?))
    }

    /// Plans a dispense for `amount` against the current state.
    ///
    /// Planner rejections come back as [`AtmError::Plan`].
    pub async fn plan(&self, amount: Amount) -> Result<DispensePlan> {
        let snapshot = self.current_state().await?;
        let plan = planner::plan(amount, snapshot.denominations(), self.capacity_check)?;
        Ok(plan)
    }

    /// Dispenses `plan` from the live inventory and returns what is left.
    ///
    /// On [`AtmError::Dispense`] nothing was taken and the error carries the
    /// unchanged inventory.
    pub async fn apply(&self, plan: &DispensePlan) -> Result<InventorySnapshot> {
        let lock = self.lock().await;
        let remaining = self.check(&lock, plan).await?;
        self.commit(&lock, remaining.clone()).await?;
        Ok(remaining)
    }

    /// Replaces the machine's inventory, e.g. when the machine is loaded.
    pub async fn provision(&self, denominations: Vec<Denomination>) -> Result<InventorySnapshot> {
        let snapshot = InventorySnapshot::new(denominations);
        if let Some(value) = snapshot.duplicate_value() {
            return Err(AtmError::DuplicateDenomination(value));
        }
        if snapshot.denominations().iter().any(|d| d.value == 0) {
            return Err(AtmError::ValidationError(
                "Denomination value must be positive".to_string(),
            ));
        }
        let lock = self.lock().await;
        self.commit(&lock, snapshot.clone()).await?;
        Ok(snapshot)
    }

    /// Takes the inventory lock. Hold it across [`check`](Self::check) and
    /// [`commit`](Self::commit) to make them one atomic step.
    pub async fn lock(&self) -> InventoryLock {
        InventoryLock {
            _guard: self.lock.clone().lock_owned().await,
        }
    }

    /// Validates `plan` against the live inventory without changing it.
    pub async fn check(
        &self,
        _lock: &InventoryLock,
        plan: &DispensePlan,
    ) -> Result<InventorySnapshot> {
        let live = self.current_state().await?;
        let remaining = live.remove(plan)?;
        Ok(remaining)
    }

    /// Persists `snapshot` as the machine's inventory.
    pub async fn commit(&self, _lock: &InventoryLock, snapshot: InventorySnapshot) -> Result<()> {
        self.store.save_all(snapshot.into_denominations()).await
    }
}
