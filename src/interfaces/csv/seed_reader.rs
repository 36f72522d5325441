use crate::domain::account::Account;
use crate::domain::inventory::Denomination;
use crate::error::{AtmError, Result};
use crate::infrastructure::pin::hash_pin;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::io::Read;

/// Accounts file row: `username, pin, balance, overdraft`. The pin is hashed
/// on load and never kept in clear.
#[derive(Debug, Deserialize)]
struct AccountSeed {
    username: String,
    pin: String,
    balance: u64,
    overdraft: u64,
}

impl From<AccountSeed> for Account {
    fn from(seed: AccountSeed) -> Self {
        Account::new(seed.username, seed.balance, seed.overdraft, hash_pin(&seed.pin))
    }
}

/// Inventory file row: `value, count`.
#[derive(Debug, Deserialize)]
struct DenominationSeed {
    value: u64,
    count: u64,
}

impl From<DenominationSeed> for Denomination {
    fn from(seed: DenominationSeed) -> Self {
        Denomination::new(seed.value, seed.count)
    }
}

fn read_all<R, S, T>(source: R) -> Result<Vec<T>>
where
    R: Read,
    S: DeserializeOwned,
    T: From<S>,
{
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source)
        .into_deserialize::<S>()
        .map(|row| row.map(T::from).map_err(AtmError::from))
        .collect()
}

/// Reads the bank's accounts. Any malformed row fails the whole load.
pub fn read_accounts<R: Read>(source: R) -> Result<Vec<Account>> {
    read_all::<R, AccountSeed, Account>(source)
}

/// Reads the machine's denominations. Any malformed row fails the whole load.
pub fn read_denominations<R: Read>(source: R) -> Result<Vec<Denomination>> {
    read_all::<R, DenominationSeed, Denomination>(source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_accounts_hashes_pins() {
        let data = "username, pin, balance, overdraft\nclint_west, 1234, 800, 200";
        let accounts = read_accounts(data.as_bytes()).unwrap();
        assert_eq!(accounts.len(), 1);
        assert_eq!(accounts[0].username, "clint_west");
        assert_eq!(accounts[0].balance, 800);
        assert_eq!(accounts[0].overdraft, 200);
        assert_eq!(accounts[0].pin_hash, hash_pin("1234"));
    }

    #[test]
    fn test_read_accounts_rejects_negative_balance() {
        let data = "username, pin, balance, overdraft\nclint_west, 1234, -800, 200";
        assert!(read_accounts(data.as_bytes()).is_err());
    }

    #[test]
    fn test_read_denominations() {
        let data = "value, count\n50, 10\n20, 30";
        let denominations = read_denominations(data.as_bytes()).unwrap();
        assert_eq!(
            denominations,
            vec![Denomination::new(50, 10), Denomination::new(20, 30)]
        );
    }
}
