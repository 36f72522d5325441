use super::account::Account;
use super::inventory::Denomination;
use crate::error::Result;
use async_trait::async_trait;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find(&self, username: &str) -> Result<Option<Account>>;
    async fn save(&self, account: Account) -> Result<()>;
    async fn all(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
    async fn load_all(&self) -> Result<Vec<Denomination>>;
    /// Replaces the stored inventory with `denominations`.
    async fn save_all(&self, denominations: Vec<Denomination>) -> Result<()>;
}

/// Checks a pin against an account's stored credential.
pub trait Authenticator: Send + Sync {
    fn authenticate(&self, account: &Account, pin: &str) -> bool;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type InventoryStoreBox = Box<dyn InventoryStore>;
pub type AuthenticatorBox = Box<dyn Authenticator>;
