use crate::domain::account::Account;
use crate::domain::inventory::Denomination;
use crate::domain::ports::{AccountStore, InventoryStore};
use crate::error::{AtmError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options, WriteBatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing account states.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing the machine's denominations.
pub const CF_DENOMINATIONS: &str = "denominations";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `Account` and `Denomination` entities using
/// separate Column Families. Accounts are keyed by username, denominations by
/// their big-endian value, so iteration yields them ascending by value.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("accounts" and "denominations") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_denominations = ColumnFamilyDescriptor::new(CF_DENOMINATIONS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_denominations])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            AtmError::InternalError(Box::new(std::io::Error::other(format!(
                "{} column family not found",
                name
            ))))
        })
    }

    fn encode<T: Serialize>(value: &T) -> Result<Vec<u8>> {
        serde_json::to_vec(value).map_err(|e| {
            AtmError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Serialization error: {}", e),
            )))
        })
    }

    fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
        serde_json::from_slice(bytes).map_err(|e| {
            AtmError::InternalError(Box::new(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                format!("Deserialization error: {}", e),
            )))
        })
    }

    fn scan<T: DeserializeOwned>(&self, cf: &ColumnFamily) -> Result<Vec<T>> {
        let mut items = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            items.push(Self::decode(&value)?);
        }
        Ok(items)
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn find(&self, username: &str) -> Result<Option<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        match self.db.get_cf(cf, username.as_bytes())? {
            Some(bytes) => Ok(Some(Self::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    async fn save(&self, account: Account) -> Result<()> {
        let cf = self.cf(CF_ACCOUNTS)?;
        let value = Self::encode(&account)?;
        self.db.put_cf(cf, account.username.as_bytes(), value)?;
        Ok(())
    }

    async fn all(&self) -> Result<Vec<Account>> {
        let cf = self.cf(CF_ACCOUNTS)?;
        self.scan(cf)
    }
}

#[async_trait]
impl InventoryStore for RocksDBStore {
    async fn load_all(&self) -> Result<Vec<Denomination>> {
        let cf = self.cf(CF_DENOMINATIONS)?;
        self.scan(cf)
    }

    async fn save_all(&self, denominations: Vec<Denomination>) -> Result<()> {
        let cf = self.cf(CF_DENOMINATIONS)?;

        // Replace the whole inventory in one atomic write.
        let mut batch = WriteBatch::default();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (key, _value) = item?;
            batch.delete_cf(cf, key);
        }
        for denomination in &denominations {
            batch.put_cf(
                cf,
                denomination.value.to_be_bytes(),
                Self::encode(denomination)?,
            );
        }
        self.db.write(batch)?;
        Ok(())
    }
}
