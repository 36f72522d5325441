use crate::domain::account::Account;
use crate::domain::ports::Authenticator;
use sha2::{Digest, Sha256};

/// Hex-encoded SHA-256 of a pin, as stored in [`Account::pin_hash`].
pub fn hash_pin(pin: &str) -> String {
    format!("{:x}", Sha256::digest(pin.as_bytes()))
}

/// Authenticates by comparing the SHA-256 digest of the supplied pin with the
/// hash stored on the account.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256PinAuthenticator;

impl Sha256PinAuthenticator {
    pub fn new() -> Self {
        Self
    }
}

impl Authenticator for Sha256PinAuthenticator {
    fn authenticate(&self, account: &Account, pin: &str) -> bool {
        let supplied = hash_pin(pin);
        let stored = account.pin_hash.as_bytes();
        // Compare every byte so the check takes the same time on mismatch.
        supplied.len() == stored.len()
            && supplied
                .as_bytes()
                .iter()
                .zip(stored)
                .fold(0u8, |acc, (a, b)| acc | (a ^ b))
                == 0
    }
}
