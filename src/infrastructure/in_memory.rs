use crate::domain::account::Account;
use crate::domain::inventory::Denomination;
use crate::domain::ports::{AccountStore, InventoryStore};
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for bank accounts.
///
/// Uses `Arc<RwLock<HashMap<String, Account>>>` to allow shared concurrent access.
/// Ideal for testing or small datasets where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with `accounts`.
    pub fn with_accounts(accounts: impl IntoIterator<Item = Account>) -> Self {
        let accounts = accounts
            .into_iter()
            .map(|account| (account.username.clone(), account))
            .collect();
        Self {
            accounts: Arc::new(RwLock::new(accounts)),
        }
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find(&self, username: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(username).cloned())
    }

    async fn save(&self, account: Account) -> Result<()> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.username.clone(), account);
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.username.cmp(&b.username));
        Ok(all)
    }
}

/// A thread-safe in-memory store for the machine's denominations.
///
/// Keeps the list in the order it was last saved.
#[derive(Default, Clone)]
pub struct InMemoryInventoryStore {
    denominations: Arc<RwLock<Vec<Denomination>>>,
}

impl InMemoryInventoryStore {
    /// Creates a new, empty in-memory inventory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store holding `denominations`.
    pub fn with_denominations(denominations: Vec<Denomination>) -> Self {
        Self {
            denominations: Arc::new(RwLock::new(denominations)),
        }
    }
}

#[async_trait]
impl InventoryStore for InMemoryInventoryStore {
    async fn load_all(&self) -> Result<Vec<Denomination>> {
        let denominations = self.denominations.read().await;
        Ok(denominations.clone())
    }

    async fn save_all(&self, denominations: Vec<Denomination>) -> Result<()> {
        let mut stored = self.denominations.write().await;
        *stored = denominations;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_in_memory_account_store() {
        let store = InMemoryAccountStore::new();
        let account = Account::new("clint_west", 800, 200, "hash");

        store.save(account.clone()).await.unwrap();
        let retrieved = store.find("clint_west").await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        assert!(store.find("unknown").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_in_memory_account_store_all_sorted() {
        let store = InMemoryAccountStore::with_accounts(vec![
            Account::new("russell_gladiator", 1800, 150, "h2"),
            Account::new("clint_west", 800, 200, "h1"),
        ]);

        let all = store.all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].username, "clint_west");
        assert_eq!(all[1].username, "russell_gladiator");
    }

    #[tokio::test]
    async fn test_in_memory_inventory_store() {
        let store = InMemoryInventoryStore::new();
        assert!(store.load_all().await.unwrap().is_empty());

        let denominations = vec![Denomination::new(20, 3), Denomination::new(50, 1)];
        store.save_all(denominations.clone()).await.unwrap();
        assert_eq!(store.load_all().await.unwrap(), denominations);
    }
}
