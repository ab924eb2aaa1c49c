//! Encrypted tier backed by the OS keyring.
//!
//! Each key becomes a service-scoped keyring entry. The keyring only holds
//! strings, so record bytes are base64-encoded on the way in.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use super::KeyValueStore;
use crate::error::StorageError;

/// Default keyring service name.
pub const SERVICE: &str = "stillwater";

/// Key-value store over the OS keyring (Keychain, Credential Manager,
/// Secret Service).
pub struct SecureKeyValueStore {
    service: String,
}

impl SecureKeyValueStore {
    /// Store scoped to the default service name.
    pub fn new() -> Self {
        Self::with_service(SERVICE)
    }

    /// Store scoped to a custom service name (used by the dev environment).
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, StorageError> {
        keyring::Entry::new(&self.service, key).map_err(StorageError::from)
    }
}

impl Default for SecureKeyValueStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for SecureKeyValueStore {
    fn tier_name(&self) -> &'static str {
        "secure"
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let entry = self.entry(key)?;
        match entry.get_password() {
            Ok(encoded) => {
                let bytes = BASE64.decode(encoded.as_bytes()).map_err(|e| {
                    StorageError::Deserialization(format!("keyring value is not base64: {e}"))
                })?;
                Ok(Some(bytes))
            }
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let entry = self.entry(key)?;
        entry
            .set_password(&BASE64.encode(value))
            .map_err(StorageError::from)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        let entry = self.entry(key)?;
        match entry.delete_credential() {
            Ok(()) => Ok(()),
            Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
