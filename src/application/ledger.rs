use crate::domain::account::{Account, Amount};
use crate::domain::ports::AccountStoreBox;
use crate::error::{AtmError, Result};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Proof that the caller holds one account's lock.
pub struct AccountLock {
    username: String,
    _guard: OwnedMutexGuard<()>,
}

impl AccountLock {
    pub fn username(&self) -> &str {
        &self.username
    }
}

/// Owns every change to account balances.
///
/// Each username has its own mutex, so withdrawals against different accounts
/// proceed in parallel while those against the same account queue up.
pub struct AccountLedger {
    store: AccountStoreBox,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl AccountLedger {
    pub fn new(store: AccountStoreBox) -> Self {
        Self {
            store,
            locks: Mutex::new(HashMap::new()),
        }
    }

    pub async fn find(&self, username: &str) -> Result<Account> {
        self.store
            .find(username)
            .await?
            .ok_or_else(|| AtmError::AccountNotFound(username.to_string()))
    }

    pub async fn all(&self) -> Result<Vec<Account>> {
        self.store.all().await
    }

    /// Inserts or replaces an account, e.g. when seeding the bank.
    pub async fn open(&self, account: Account) -> Result<()> {
        let lock = self.lock(&account.username).await;
        self.store_locked(&lock, account).await
    }

    /// Takes the lock for `username`.
    ///
    /// Entries nobody holds or waits on are dropped from the registry first,
    /// so it only grows with the number of accounts in flight.
    pub async fn lock(&self, username: &str) -> AccountLock {
        let mutex = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, mutex| Arc::strong_count(mutex) > 1);
            locks
                .entry(username.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        AccountLock {
            username: username.to_string(),
            _guard: mutex.lock_owned().await,
        }
    }

    /// Debits `username` and returns the account as saved.
    pub async fn withdraw(
        &self,
        username: &str,
        amount: Amount,
        use_overdraft: bool,
    ) -> Result<Account> {
        let lock = self.lock(username).await;
        self.debit(&lock, amount, use_overdraft).await
    }

    /// Debits the locked account. The affordability check and the save happen
    /// under the caller's lock.
    pub async fn debit(
        &self,
        lock: &AccountLock,
        amount: Amount,
        use_overdraft: bool,
    ) -> Result<Account> {
        let mut account = self.find(lock.username()).await?;
        account.withdraw(amount, use_overdraft)?;
        self.store.save(account.clone()).await?;
        tracing::debug!(
            username = %account.username,
            amount = amount.value(),
            balance = account.balance,
            overdraft = account.overdraft,
            "account debited"
        );
        Ok(account)
    }

    /// Puts back a previously read state of the locked account.
    pub async fn restore(&self, lock: &AccountLock, account: Account) -> Result<()> {
        if account.username != lock.username() {
            return Err(AtmError::ValidationError(format!(
                "Cannot restore account {} under the lock of {}",
                account.username,
                lock.username()
            )));
        }
        self.store_locked(lock, account).await
    }

    async fn store_locked(&self, _lock: &AccountLock, account: Account) -> Result<()> {
        self.store.save(account).await
    }
}
