//! Day-keyed lookup cache over the mood history.
//!
//! A pure function of `UserStats::mood_entries`, never a second source of
//! truth. The engine rebuilds it eagerly after every mutation; it must not
//! be read across a mutation without a rebuild.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::model::{day_key, MoodEntry};

/// O(1) day -> entry lookup, keyed by local start-of-day Unix seconds.
#[derive(Debug, Default)]
pub struct DayCache {
    by_day: HashMap<i64, MoodEntry>,
}

impl DayCache {
    /// Build the cache from scratch over the current entries.
    pub fn rebuild(&mut self, entries: &[MoodEntry]) {
        self.by_day.clear();
        self.by_day.reserve(entries.len());
        for entry in entries {
            self.by_day.insert(entry.day_key(), entry.clone());
        }
    }

    /// Entry for the day containing `instant`, if any.
    pub fn entry_for(&self, instant: DateTime<Utc>) -> Option<&MoodEntry> {
        self.by_day.get(&day_key(instant))
    }

    /// Entry for an already-computed day key.
    pub fn entry_for_key(&self, key: i64) -> Option<&MoodEntry> {
        self.by_day.get(&key)
    }

    pub fn len(&self) -> usize {
        self.by_day.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_day.is_empty()
    }
}
