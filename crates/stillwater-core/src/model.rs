//! Shared data model: mood history, the persisted stats aggregate, and the
//! user profile record.
//!
//! `UserStats` is the single unit of persistence -- it is always read and
//! written as a whole blob, never partially updated.

use chrono::{DateTime, Datelike, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One mood check-in, at most one per local calendar day.
///
/// `mood_value` is continuous: 0.0 = calm, 1.0 = anxious. It stays a float
/// (not an enum) so the UI can render gradients and bucket quotes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    /// Instant the entry was recorded; the day boundary is local midnight.
    pub recorded_at: DateTime<Utc>,
    /// Mood on the calm(0.0)..anxious(1.0) scale.
    pub mood_value: f64,
    /// Relief sessions completed on this day.
    pub session_count: u32,
}

impl MoodEntry {
    /// Create an entry for `recorded_at`, clamping the mood into [0, 1].
    pub fn new(recorded_at: DateTime<Utc>, mood_value: f64, session_count: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at,
            mood_value: mood_value.clamp(0.0, 1.0),
            session_count,
        }
    }

    /// Day-cache key for this entry (local start-of-day, Unix seconds).
    pub fn day_key(&self) -> i64 {
        day_key(self.recorded_at)
    }
}

/// Relief-session techniques offered by the app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Technique {
    BoxBreathing,
    FourSevenEight,
    CoherentBreathing,
    Grounding,
    BodyScan,
}

impl Technique {
    /// Stable identifier, also the favorite-exercise slot value.
    pub fn as_str(&self) -> &'static str {
        match self {
            Technique::BoxBreathing => "box_breathing",
            Technique::FourSevenEight => "four_seven_eight",
            Technique::CoherentBreathing => "coherent_breathing",
            Technique::Grounding => "grounding",
            Technique::BodyScan => "body_scan",
        }
    }

    /// Parse a stable identifier back into a technique.
    pub fn from_str_opt(s: &str) -> Option<Self> {
        match s {
            "box_breathing" => Some(Technique::BoxBreathing),
            "four_seven_eight" => Some(Technique::FourSevenEight),
            "coherent_breathing" => Some(Technique::CoherentBreathing),
            "grounding" => Some(Technique::Grounding),
            "body_scan" => Some(Technique::BodyScan),
            _ => None,
        }
    }
}

impl std::fmt::Display for Technique {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted engagement aggregate. Created empty on first launch,
/// mutated only through `StatisticsEngine`, deleted only by explicit reset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub total_sessions: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub last_session_date: Option<DateTime<Utc>>,
    /// Mood history; insertion order is irrelevant, per-day uniqueness is not.
    pub mood_entries: Vec<MoodEntry>,
    pub favorite_quote_category: String,
    /// Up to three preferred exercise identifiers chosen during onboarding.
    pub favorite_exercises: [Option<String>; 3],
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            total_sessions: 0,
            current_streak: 0,
            longest_streak: 0,
            last_session_date: None,
            mood_entries: Vec::new(),
            favorite_quote_category: String::new(),
            favorite_exercises: [None, None, None],
        }
    }
}

/// Profile-style record stored under the `"userProfile"` key.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub onboarding_complete: bool,
    #[serde(default)]
    pub preferred_technique: Option<Technique>,
}

/// Day key for an instant: local start-of-day as Unix seconds.
///
/// Two instants on the same local calendar day always produce the same key
/// regardless of their time-of-day component.
pub fn day_key(instant: DateTime<Utc>) -> i64 {
    day_key_for_date(instant.with_timezone(&Local).date_naive())
}

/// Day key for a calendar date (local midnight, Unix seconds).
pub fn day_key_for_date(date: NaiveDate) -> i64 {
    let midnight = date.and_time(NaiveTime::MIN);
    Local
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp())
        // DST gap at midnight: fall back to the UTC reading of the same wall time
        .unwrap_or_else(|| midnight.and_utc().timestamp())
}

/// Whole days between the Unix epoch and `date`.
pub fn days_since_epoch(date: NaiveDate) -> i64 {
    const UNIX_EPOCH_CE_DAYS: i64 = 719_163;
    i64::from(date.num_days_from_ce()) - UNIX_EPOCH_CE_DAYS
}
