//! Tiered persistent storage.
//!
//! Durable state lives in an ordered list of key-value tiers:
//! - [`SecureKeyValueStore`]: OS keyring, encrypted, the preferred tier
//! - [`LegacyKeyValueStore`]: unencrypted SQLite, migration source and
//!   last-resort write fallback
//!
//! [`TieredRepository`] orchestrates read-through with promotion-on-hit and
//! write-through with fallback, so callers only ever see typed records.

mod config;
pub mod codec;
pub mod legacy;
pub mod memory;
pub mod secure;
pub mod tiered;

pub use config::{AppConfig, RemindersConfig};
pub use legacy::LegacyKeyValueStore;
pub use memory::MemoryKeyValueStore;
pub use secure::SecureKeyValueStore;
pub use tiered::TieredRepository;

use std::path::PathBuf;

use crate::error::StorageError;

/// Storage key for the persisted stats aggregate.
pub const USER_STATS_KEY: &str = "UserStats";

/// Storage key for the profile record.
pub const USER_PROFILE_KEY: &str = "userProfile";

/// Flag key marking the one-time legacy migration as complete.
pub const MIGRATION_FLAG_KEY: &str = "legacyMigrationComplete";

/// A single storage tier: opaque bytes keyed by string.
///
/// Implementations use interior mutability so the repository can hold the
/// tiers behind shared references.
pub trait KeyValueStore: Send {
    /// Short tier name for diagnostics.
    fn tier_name(&self) -> &'static str;

    /// Fetch the bytes stored under `key`, `None` if absent.
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError>;

    /// Store `value` under `key`, replacing any previous value atomically.
    fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError>;

    /// Remove `key`. Removing an absent key is not an error.
    fn delete(&self, key: &str) -> Result<(), StorageError>;
}

/// Returns `~/.config/stillwater[-dev]/` based on STILLWATER_ENV.
///
/// Set STILLWATER_ENV=dev to use the development data directory.
///
/// # Errors
/// Returns an error if creating the config directory fails.
pub fn data_dir() -> Result<PathBuf, std::io::Error> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("STILLWATER_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("stillwater-dev")
    } else {
        base_dir.join("stillwater")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
