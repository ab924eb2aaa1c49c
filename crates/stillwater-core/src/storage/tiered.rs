//! Read-through/write-through repository across ordered storage tiers.
//!
//! Tier order is fixed at construction: secure first, legacy second. Loads
//! try tiers in order and promote hits into the primary tier; saves write
//! the primary tier and fall back down the list so data is never silently
//! lost. Promotion only deletes the source copy after the primary write
//! succeeded, so a crash mid-migration leaves at least one live copy.

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use super::{codec, KeyValueStore, LegacyKeyValueStore, SecureKeyValueStore, MIGRATION_FLAG_KEY};
use crate::error::StorageError;

/// Typed load/save over an ordered list of storage tiers.
pub struct TieredRepository {
    tiers: Vec<Box<dyn KeyValueStore>>,
}

impl TieredRepository {
    /// Build a repository over an explicit tier list. The first tier is the
    /// primary; later tiers are fallbacks and migration sources.
    pub fn new(tiers: Vec<Box<dyn KeyValueStore>>) -> Self {
        debug_assert!(!tiers.is_empty(), "repository needs at least one tier");
        Self { tiers }
    }

    /// Open the production tier stack: OS keyring over the legacy SQLite kv.
    ///
    /// # Errors
    /// Returns an error if the legacy database cannot be opened.
    pub fn open() -> Result<Self, StorageError> {
        Ok(Self::new(vec![
            Box::new(SecureKeyValueStore::new()),
            Box::new(LegacyKeyValueStore::open()?),
        ]))
    }

    /// Load the record under `key`, trying tiers in order.
    ///
    /// A hit in a non-primary tier is promoted: written into the primary
    /// tier, then deleted from the tier that had it. If the promotion write
    /// fails the source copy is kept so the next load can retry. Bytes that
    /// fail to decode are treated as absent, not as an error.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StorageError> {
        for (idx, tier) in self.tiers.iter().enumerate() {
            let bytes = match tier.get(key) {
                Ok(Some(bytes)) => bytes,
                Ok(None) => continue,
                Err(e) => {
                    warn!(tier = tier.tier_name(), key, error = %e, "tier read failed");
                    continue;
                }
            };
            match codec::decode(&bytes) {
                Ok(value) => {
                    if idx > 0 {
                        self.promote(key, &bytes, idx);
                    }
                    return Ok(Some(value));
                }
                Err(e) => {
                    // Forward recovery: a schema mismatch reads as "no data".
                    warn!(tier = tier.tier_name(), key, error = %e, "undecodable record ignored");
                    continue;
                }
            }
        }
        Ok(None)
    }

    /// Save the record under `key`, falling back down the tier list.
    ///
    /// The value is written to exactly one tier. A fallback write is not
    /// promoted back automatically; the next `load` handles that.
    ///
    /// # Errors
    /// `StorageError::AllTiersFailed` if every tier rejects the write.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StorageError> {
        let bytes = codec::encode(value)?;
        for tier in &self.tiers {
            match tier.put(key, &bytes) {
                Ok(()) => {
                    debug!(tier = tier.tier_name(), key, "record saved");
                    return Ok(());
                }
                Err(e) => {
                    warn!(tier = tier.tier_name(), key, error = %e, "tier write failed, falling back");
                }
            }
        }
        Err(StorageError::AllTiersFailed {
            key: key.to_string(),
        })
    }

    /// Delete `key` from every tier, best effort.
    pub fn delete(&self, key: &str) {
        for tier in &self.tiers {
            if let Err(e) = tier.delete(key) {
                warn!(tier = tier.tier_name(), key, error = %e, "tier delete failed");
            }
        }
    }

    /// One-time promotion of `keys` from fallback tiers into the primary.
    ///
    /// Gated by a persisted flag so it runs at most once per install.
    /// Promotion copies before it deletes, so a crash mid-pass leaves either
    /// the primary already populated (the repeat pass is a no-op) or the
    /// source copy intact (the repeat pass retries) -- never neither.
    /// The flag is only set after a pass with no failed promotions.
    ///
    /// Returns `true` if a migration pass actually ran.
    pub fn migrate_once(&self, keys: &[&str]) -> Result<bool, StorageError> {
        if let Some(true) = self.load::<bool>(MIGRATION_FLAG_KEY)? {
            return Ok(false);
        }
        let mut all_ok = true;
        for key in keys {
            if !self.promote_raw(key) {
                all_ok = false;
            }
        }
        if all_ok {
            self.save(MIGRATION_FLAG_KEY, &true)?;
        } else {
            warn!("legacy migration incomplete, will retry on next run");
        }
        Ok(true)
    }

    /// Copy `bytes` (already read from `tiers[source]`) into the primary
    /// tier, then delete the source copy.
    fn promote(&self, key: &str, bytes: &[u8], source: usize) {
        match self.tiers[0].put(key, bytes) {
            Ok(()) => {
                debug!(key, from = self.tiers[source].tier_name(), "record promoted");
                if let Err(e) = self.tiers[source].delete(key) {
                    // Both copies alive; the next load promotes again.
                    warn!(key, error = %e, "source copy not deleted after promotion");
                }
            }
            Err(e) => {
                // Source copy preserved; no data loss.
                warn!(key, error = %e, "promotion write failed, keeping source copy");
            }
        }
    }

    /// Raw byte-level promotion used by `migrate_once`. Returns `true` when
    /// the key needed no work or was promoted successfully.
    fn promote_raw(&self, key: &str) -> bool {
        match self.tiers[0].get(key) {
            Ok(Some(_)) => return true,
            Ok(None) => {}
            Err(e) => {
                warn!(key, error = %e, "primary tier unreadable during migration");
                return false;
            }
        }
        for (idx, tier) in self.tiers.iter().enumerate().skip(1) {
            match tier.get(key) {
                Ok(Some(bytes)) => {
                    self.promote(key, &bytes, idx);
                    // Success is "primary now has it"; promote() already
                    // preserved the source copy on failure.
                    return matches!(self.tiers[0].get(key), Ok(Some(_)));
                }
                Ok(None) => continue,
                Err(e) => {
                    warn!(tier = tier.tier_name(), key, error = %e, "tier read failed during migration");
                }
            }
        }
        // Nothing to migrate anywhere.
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{MoodEntry, UserStats};
    use crate::storage::MemoryKeyValueStore;
    use chrono::Utc;
    use std::sync::Arc;

    fn repo() -> (
        TieredRepository,
        Arc<MemoryKeyValueStore>,
        Arc<MemoryKeyValueStore>,
    ) {
        let secure = Arc::new(MemoryKeyValueStore::new("secure"));
        let legacy = Arc::new(MemoryKeyValueStore::new("legacy"));
        let repo = TieredRepository::new(vec![Box::new(secure.clone()), Box::new(legacy.clone())]);
        (repo, secure, legacy)
    }

    fn sample_stats() -> UserStats {
        UserStats {
            total_sessions: 4,
            current_streak: 2,
            longest_streak: 3,
            last_session_date: Some(Utc::now()),
            mood_entries: vec![MoodEntry::new(Utc::now(), 0.3, 2)],
            favorite_quote_category: "grounding".to_string(),
            favorite_exercises: [Some("box_breathing".to_string()), None, None],
        }
    }

    #[test]
    fn save_then_load_round_trips() {
        let (repo, _, _) = repo();
        let stats = sample_stats();
        repo.save("UserStats", &stats).unwrap();
        let back: UserStats = repo.load("UserStats").unwrap().unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn load_promotes_legacy_hit_and_empties_legacy() {
        let (repo, secure, legacy) = repo();
        let stats = sample_stats();
        legacy.seed("UserStats", codec::encode(&stats).unwrap());

        let back: UserStats = repo.load("UserStats").unwrap().unwrap();
        assert_eq!(back, stats);
        assert!(secure.raw("UserStats").is_some());
        assert!(legacy.raw("UserStats").is_none());

        // second load hits only the secure tier
        legacy.set_fail_reads(true);
        let again: UserStats = repo.load("UserStats").unwrap().unwrap();
        assert_eq!(again, stats);
    }

    #[test]
    fn failed_promotion_preserves_legacy_copy() {
        let (repo, secure, legacy) = repo();
        let stats = sample_stats();
        legacy.seed("UserStats", codec::encode(&stats).unwrap());
        secure.set_fail_writes(true);

        let back: UserStats = repo.load("UserStats").unwrap().unwrap();
        assert_eq!(back, stats);
        assert!(legacy.raw("UserStats").is_some());
    }

    #[test]
    fn save_falls_back_when_primary_unavailable() {
        let (repo, secure, legacy) = repo();
        secure.set_fail_writes(true);
        repo.save("UserStats", &sample_stats()).unwrap();
        assert!(secure.raw("UserStats").is_none());
        assert!(legacy.raw("UserStats").is_some());
    }

    #[test]
    fn save_fails_only_when_every_tier_fails() {
        let (repo, secure, legacy) = repo();
        secure.set_fail_writes(true);
        legacy.set_fail_writes(true);
        let err = repo.save("UserStats", &sample_stats());
        assert!(matches!(err, Err(StorageError::AllTiersFailed { .. })));
    }

    #[test]
    fn undecodable_bytes_read_as_absent() {
        let (repo, secure, _) = repo();
        secure.seed("UserStats", b"not a record".to_vec());
        let loaded: Option<UserStats> = repo.load("UserStats").unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn migrate_once_runs_once() {
        let (repo, secure, legacy) = repo();
        legacy.seed("UserStats", codec::encode(&sample_stats()).unwrap());

        assert!(repo.migrate_once(&["UserStats"]).unwrap());
        assert!(secure.raw("UserStats").is_some());
        assert!(legacy.raw("UserStats").is_none());

        // flag set: second call is a no-op
        assert!(!repo.migrate_once(&["UserStats"]).unwrap());
    }

    #[test]
    fn migrate_once_retries_after_partial_failure() {
        let (repo, secure, legacy) = repo();
        legacy.seed("UserStats", codec::encode(&sample_stats()).unwrap());
        secure.set_fail_writes(true);

        assert!(repo.migrate_once(&["UserStats"]).unwrap());
        assert!(legacy.raw("UserStats").is_some());

        // flag not set, so the next pass retries and succeeds
        secure.set_fail_writes(false);
        assert!(repo.migrate_once(&["UserStats"]).unwrap());
        assert!(secure.raw("UserStats").is_some());
        assert!(legacy.raw("UserStats").is_none());
    }
}
