//! In-memory tier with failure injection.
//!
//! Backs the tiered-storage tests and the CLI's dry-run reminder planning;
//! never used as a durable tier.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::KeyValueStore;
use crate::error::StorageError;

/// HashMap-backed key-value store.
pub struct MemoryKeyValueStore {
    name: &'static str,
    map: Mutex<HashMap<String, Vec<u8>>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl MemoryKeyValueStore {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            map: Mutex::new(HashMap::new()),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make every subsequent `put` fail with `StorageError::Unavailable`.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent `get` fail with `StorageError::Unavailable`.
    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.map.lock().expect("store poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bytes under `key`, bypassing failure injection.
    pub fn raw(&self, key: &str) -> Option<Vec<u8>> {
        self.map.lock().expect("store poisoned").get(key).cloned()
    }

    /// Seed raw bytes under `key`, bypassing failure injection.
    pub fn seed(&self, key: &str, value: Vec<u8>) {
        self.map
            .lock()
            .expect("store poisoned")
            .insert(key.to_string(), value);
    }

    fn unavailable(&self) -> StorageError {
        StorageError::Unavailable {
            tier: self.name,
            message: "injected failure".to_string(),
        }
    }
}

// Tests hold an Arc to a tier they handed to the repository.
impl KeyValueStore for std::sync::Arc<MemoryKeyValueStore> {
    fn tier_name(&self) -> &'static str {
        self.as_ref().tier_name()
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        self.as_ref().get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.as_ref().put(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.as_ref().delete(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn tier_name(&self) -> &'static str {
        self.name
    }

    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(self.unavailable());
        }
        Ok(self.raw(key))
    }

    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(self.unavailable());
        }
        self.seed(key, value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.map.lock().expect("store poisoned").remove(key);
        Ok(())
    }
}
