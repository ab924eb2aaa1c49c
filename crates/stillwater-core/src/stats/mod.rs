//! Statistics engine for Stillwater.
//!
//! Owns the persisted `UserStats` aggregate and everything derived from it:
//! - streak computation (consecutive days with a mood entry)
//! - rolling-window weekly aggregates
//! - the day-keyed O(1) lookup cache
//!
//! All mutations flow through this engine; nothing else touches the
//! aggregate. Every successful mutation persists the whole aggregate
//! through the tiered repository and then publishes events to subscribers.

mod day_cache;

pub use day_cache::DayCache;

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Local, NaiveDate, Utc};
use tracing::{debug, warn};

use crate::error::{Result, StorageError};
use crate::events::{Event, EventSubscriber};
use crate::model::{day_key, MoodEntry, Technique, UserProfile, UserStats};
use crate::reminders::{Notifier, CHECKIN_REMINDER_ID};
use crate::storage::{TieredRepository, USER_PROFILE_KEY, USER_STATS_KEY};

/// Mood value assigned when a session is recorded on a day without an
/// explicit check-in, so sessions alone can sustain a streak.
pub const NEUTRAL_MOOD: f64 = 0.5;

/// Exclusive owner of the `UserStats` aggregate.
pub struct StatisticsEngine {
    repo: TieredRepository,
    stats: UserStats,
    cache: DayCache,
    subscribers: Vec<EventSubscriber>,
    notifier: Option<Arc<dyn Notifier>>,
}

impl StatisticsEngine {
    /// Load the aggregate (running the one-time legacy migration first) or
    /// start from an empty one.
    ///
    /// Undecodable stored bytes read as "no prior data"; a fresh aggregate
    /// is used and the failure is logged, never propagated.
    pub fn new(repo: TieredRepository) -> Self {
        if let Err(e) = repo.migrate_once(&[USER_STATS_KEY, USER_PROFILE_KEY]) {
            warn!(error = %e, "legacy migration pass failed");
        }
        let stats = match repo.load::<UserStats>(USER_STATS_KEY) {
            Ok(Some(stats)) => stats,
            Ok(None) => UserStats::default(),
            Err(e) => {
                warn!(error = %e, "stats load failed, starting empty");
                UserStats::default()
            }
        };
        let mut cache = DayCache::default();
        cache.rebuild(&stats.mood_entries);
        Self {
            repo,
            stats,
            cache,
            subscribers: Vec::new(),
            notifier: None,
        }
    }

    /// Attach the notification collaborator so a check-in can cancel the
    /// day's pending check-in reminder.
    pub fn attach_notifier(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifier = Some(notifier);
    }

    /// Subscribe to stats events. Subscribers run synchronously after each
    /// successful mutation.
    pub fn subscribe(&mut self, subscriber: EventSubscriber) {
        self.subscribers.push(subscriber);
    }

    /// Read access to the aggregate.
    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    // ---- inbound operations ------------------------------------------------

    /// Record (or update) today's mood check-in.
    pub fn record_mood_value(&mut self, value: f64) -> Result<()> {
        self.record_mood_value_at(value, Utc::now())
    }

    /// Date-parameterized variant of [`record_mood_value`].
    ///
    /// Upserts the entry for the day containing `at`, preserving any
    /// session count already recorded that day.
    ///
    /// [`record_mood_value`]: Self::record_mood_value
    pub fn record_mood_value_at(&mut self, value: f64, at: DateTime<Utc>) -> Result<()> {
        let key = day_key(at);
        match self.stats.mood_entries.iter_mut().find(|e| e.day_key() == key) {
            Some(entry) => {
                entry.mood_value = value.clamp(0.0, 1.0);
                entry.recorded_at = at;
            }
            None => self.stats.mood_entries.push(MoodEntry::new(at, value, 0)),
        }
        self.after_mutation(at)?;

        let day = at.with_timezone(&Local).date_naive();
        self.publish(Event::MoodRecorded {
            day,
            mood_value: value.clamp(0.0, 1.0),
            at,
        });
        self.publish_stats_changed(at);

        // Today's check-in reminder is now redundant.
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.cancel(CHECKIN_REMINDER_ID) {
                warn!(error = %e, "failed to cancel check-in reminder");
            }
        }
        Ok(())
    }

    /// Record a completed relief session.
    pub fn record_session(&mut self, technique: Technique) -> Result<()> {
        self.record_session_at(technique, Utc::now())
    }

    /// Date-parameterized variant of [`record_session`].
    ///
    /// Increments today's session count, creating a neutral-mood entry if
    /// the day has no check-in yet.
    ///
    /// [`record_session`]: Self::record_session
    pub fn record_session_at(&mut self, technique: Technique, at: DateTime<Utc>) -> Result<()> {
        self.stats.total_sessions += 1;
        self.stats.last_session_date = Some(at);

        let key = day_key(at);
        match self.stats.mood_entries.iter_mut().find(|e| e.day_key() == key) {
            Some(entry) => entry.session_count += 1,
            None => self
                .stats
                .mood_entries
                .push(MoodEntry::new(at, NEUTRAL_MOOD, 1)),
        }
        self.after_mutation(at)?;

        debug!(technique = %technique, total = self.stats.total_sessions, "session recorded");
        self.publish(Event::SessionRecorded {
            technique,
            total_sessions: self.stats.total_sessions,
            at,
        });
        self.publish_stats_changed(at);
        Ok(())
    }

    /// Update the favorite quote category (set by onboarding).
    pub fn set_favorite_quote_category(&mut self, category: impl Into<String>) -> Result<()> {
        self.stats.favorite_quote_category = category.into();
        self.persist()?;
        self.publish_stats_changed(Utc::now());
        Ok(())
    }

    /// Replace the three favorite-exercise slots (set by onboarding).
    pub fn set_favorite_exercises(&mut self, exercises: [Option<String>; 3]) -> Result<()> {
        self.stats.favorite_exercises = exercises;
        self.persist()?;
        self.publish_stats_changed(Utc::now());
        Ok(())
    }

    /// Explicit user reset: wipe the aggregate from every storage tier and
    /// start empty.
    pub fn reset(&mut self) {
        self.repo.delete(USER_STATS_KEY);
        self.stats = UserStats::default();
        self.cache.rebuild(&self.stats.mood_entries);
        self.publish(Event::StatsReset { at: Utc::now() });
    }

    // ---- read model --------------------------------------------------------

    /// Streak as of now. The persisted `current_streak` field is frozen at
    /// the last mutation; this recomputes against the current calendar day
    /// so a missed day reads as 0 without waiting for the next check-in.
    pub fn current_streak(&self) -> u32 {
        self.current_streak_at(Utc::now())
    }

    /// Streak with an explicit "today".
    pub fn current_streak_at(&self, now: DateTime<Utc>) -> u32 {
        streak_ending_at(
            &self.stats.mood_entries,
            now.with_timezone(&Local).date_naive(),
        )
    }

    /// Mood recorded today, if any.
    pub fn todays_mood(&self) -> Option<f64> {
        self.mood_for_date(Utc::now())
    }

    /// Mood recorded on the day containing `date`, if any. O(1).
    pub fn mood_for_date(&self, date: DateTime<Utc>) -> Option<f64> {
        self.cache.entry_for(date).map(|e| e.mood_value)
    }

    /// Whether the day containing `at` already has an entry.
    pub fn has_entry_for(&self, at: DateTime<Utc>) -> bool {
        self.cache.entry_for(at).is_some()
    }

    /// Entries in the rolling `[now - days, now]` window, oldest first.
    pub fn recent_moods(&self, days: i64) -> Vec<MoodEntry> {
        self.recent_moods_at(days, Utc::now())
    }

    fn recent_moods_at(&self, days: i64, now: DateTime<Utc>) -> Vec<MoodEntry> {
        let cutoff = now - Duration::days(days);
        let mut entries: Vec<MoodEntry> = self
            .stats
            .mood_entries
            .iter()
            .filter(|e| e.recorded_at >= cutoff && e.recorded_at <= now)
            .cloned()
            .collect();
        entries.sort_by_key(|e| e.recorded_at);
        entries
    }

    /// Relief sessions completed in the last 7 days.
    pub fn sessions_this_week(&self) -> u32 {
        self.sessions_this_week_at(Utc::now())
    }

    fn sessions_this_week_at(&self, now: DateTime<Utc>) -> u32 {
        self.recent_moods_at(7, now)
            .iter()
            .map(|e| e.session_count)
            .sum()
    }

    /// Arithmetic mean of mood values over the last 7 days, 0 if empty.
    pub fn average_mood_this_week(&self) -> f64 {
        self.average_mood_this_week_at(Utc::now())
    }

    fn average_mood_this_week_at(&self, now: DateTime<Utc>) -> f64 {
        let window = self.recent_moods_at(7, now);
        if window.is_empty() {
            return 0.0;
        }
        window.iter().map(|e| e.mood_value).sum::<f64>() / window.len() as f64
    }

    // ---- profile record ----------------------------------------------------

    /// Load the profile record, defaulting when absent.
    pub fn load_profile(&self) -> UserProfile {
        match self.repo.load::<UserProfile>(USER_PROFILE_KEY) {
            Ok(Some(profile)) => profile,
            Ok(None) => UserProfile::default(),
            Err(e) => {
                warn!(error = %e, "profile load failed, using defaults");
                UserProfile::default()
            }
        }
    }

    /// Persist the profile record.
    pub fn save_profile(&self, profile: &UserProfile) -> Result<(), StorageError> {
        self.repo.save(USER_PROFILE_KEY, profile)
    }

    // ---- internals ---------------------------------------------------------

    /// Streak recompute, cache rebuild, and persistence after any entry
    /// mutation. `at` defines "today" for the streak walk.
    fn after_mutation(&mut self, at: DateTime<Utc>) -> Result<()> {
        self.recompute_streak(at.with_timezone(&Local).date_naive());
        self.cache.rebuild(&self.stats.mood_entries);
        self.persist()?;
        Ok(())
    }

    /// Refresh the persisted streak fields. `longest_streak` only ever
    /// grows, even when the current streak later drops.
    fn recompute_streak(&mut self, today: NaiveDate) {
        let streak = streak_ending_at(&self.stats.mood_entries, today);
        self.stats.current_streak = streak;
        self.stats.longest_streak = self.stats.longest_streak.max(streak);
    }

    fn persist(&self) -> Result<(), StorageError> {
        self.repo.save(USER_STATS_KEY, &self.stats)
    }

    fn publish(&self, event: Event) {
        for subscriber in &self.subscribers {
            subscriber(&event);
        }
    }

    fn publish_stats_changed(&self, at: DateTime<Utc>) {
        self.publish(Event::StatsChanged {
            current_streak: self.stats.current_streak,
            longest_streak: self.stats.longest_streak,
            at,
        });
    }
}

/// Count of consecutive calendar days with an entry, walking backward from
/// `today`; an empty history is always 0.
fn streak_ending_at(entries: &[MoodEntry], today: NaiveDate) -> u32 {
    let days: HashSet<NaiveDate> = entries
        .iter()
        .map(|e| e.recorded_at.with_timezone(&Local).date_naive())
        .collect();

    let mut streak = 0u32;
    let mut expected = today;
    while days.contains(&expected) {
        streak += 1;
        match expected.pred_opt() {
            Some(prev) => expected = prev,
            None => break,
        }
    }
    streak
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryKeyValueStore;
    use chrono::TimeZone;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn memory_repo() -> (TieredRepository, Arc<MemoryKeyValueStore>) {
        let secure = Arc::new(MemoryKeyValueStore::new("secure"));
        let legacy = Arc::new(MemoryKeyValueStore::new("legacy"));
        let repo = TieredRepository::new(vec![Box::new(secure.clone()), Box::new(legacy)]);
        (repo, secure)
    }

    fn engine() -> StatisticsEngine {
        StatisticsEngine::new(memory_repo().0)
    }

    /// Local noon on 2025-06-`day`, as UTC.
    fn on_day(day: u32) -> DateTime<Utc> {
        Local
            .with_ymd_and_hms(2025, 6, day, 12, 0, 0)
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn mood_then_session_keeps_one_entry() {
        let mut engine = engine();
        engine.record_mood_value_at(0.2, on_day(1)).unwrap();
        engine
            .record_session_at(Technique::BoxBreathing, on_day(1))
            .unwrap();

        assert_eq!(engine.stats().mood_entries.len(), 1);
        let entry = &engine.stats().mood_entries[0];
        assert_eq!(entry.mood_value, 0.2);
        assert_eq!(entry.session_count, 1);
    }

    #[test]
    fn session_then_mood_keeps_session_count() {
        let mut engine = engine();
        engine
            .record_session_at(Technique::Grounding, on_day(1))
            .unwrap();
        engine
            .record_session_at(Technique::Grounding, on_day(1))
            .unwrap();
        engine.record_mood_value_at(0.8, on_day(1)).unwrap();

        assert_eq!(engine.stats().mood_entries.len(), 1);
        let entry = &engine.stats().mood_entries[0];
        assert_eq!(entry.session_count, 2);
        assert_eq!(entry.mood_value, 0.8);
        assert_eq!(engine.stats().total_sessions, 2);
    }

    #[test]
    fn session_without_checkin_gets_neutral_mood() {
        let mut engine = engine();
        engine
            .record_session_at(Technique::BodyScan, on_day(3))
            .unwrap();
        assert_eq!(engine.mood_for_date(on_day(3)), Some(NEUTRAL_MOOD));
        assert_eq!(engine.stats().last_session_date, Some(on_day(3)));
    }

    #[test]
    fn streak_counts_consecutive_days() {
        let mut engine = engine();
        engine.record_mood_value_at(0.3, on_day(1)).unwrap();
        engine.record_mood_value_at(0.4, on_day(2)).unwrap();
        engine.record_mood_value_at(0.5, on_day(3)).unwrap();
        assert_eq!(engine.stats().current_streak, 3);
        assert_eq!(engine.stats().longest_streak, 3);
    }

    #[test]
    fn streak_breaks_on_missing_day() {
        let mut engine = engine();
        engine.record_mood_value_at(0.3, on_day(1)).unwrap();
        engine.record_mood_value_at(0.4, on_day(2)).unwrap();
        // day 3 skipped; day 4 starts a new streak of 1
        engine.record_mood_value_at(0.5, on_day(4)).unwrap();
        assert_eq!(engine.stats().current_streak, 1);
        assert_eq!(engine.stats().longest_streak, 2);
    }

    #[test]
    fn longest_streak_never_decreases() {
        let mut engine = engine();
        for day in 1..=5 {
            engine.record_mood_value_at(0.5, on_day(day)).unwrap();
        }
        assert_eq!(engine.stats().longest_streak, 5);
        engine.record_mood_value_at(0.5, on_day(10)).unwrap();
        assert_eq!(engine.stats().current_streak, 1);
        assert_eq!(engine.stats().longest_streak, 5);
    }

    #[test]
    fn query_time_streak_sees_missed_days() {
        let mut engine = engine();
        engine.record_mood_value_at(0.3, on_day(1)).unwrap();
        engine.record_mood_value_at(0.9, on_day(2)).unwrap();

        // persisted field is frozen at the last mutation
        assert_eq!(engine.stats().current_streak, 2);
        // but a query two days later reads 0
        assert_eq!(engine.current_streak_at(on_day(2)), 2);
        assert_eq!(engine.current_streak_at(on_day(4)), 0);
    }

    #[test]
    fn empty_history_means_zero_streak() {
        let engine = engine();
        assert_eq!(engine.stats().current_streak, 0);
        assert_eq!(engine.stats().longest_streak, 0);
        assert!(engine.todays_mood().is_none());
    }

    #[test]
    fn weekly_window_aggregates() {
        let mut engine = engine();
        engine.record_mood_value_at(0.2, on_day(14)).unwrap();
        engine.record_mood_value_at(0.6, on_day(15)).unwrap();
        engine
            .record_session_at(Technique::BoxBreathing, on_day(15))
            .unwrap();
        // outside the 7-day window ending on day 20
        engine.record_mood_value_at(1.0, on_day(1)).unwrap();

        let now = on_day(20);
        assert_eq!(engine.sessions_this_week_at(now), 1);
        let avg = engine.average_mood_this_week_at(now);
        assert!((avg - 0.4).abs() < 1e-9);
        assert_eq!(engine.recent_moods_at(7, now).len(), 2);
    }

    #[test]
    fn average_mood_is_zero_for_empty_window() {
        let engine = engine();
        assert_eq!(engine.average_mood_this_week(), 0.0);
    }

    #[test]
    fn mutations_persist_and_reload() {
        let (repo, secure) = memory_repo();
        let mut engine = StatisticsEngine::new(repo);
        engine.record_mood_value_at(0.25, on_day(5)).unwrap();
        engine
            .record_session_at(Technique::FourSevenEight, on_day(5))
            .unwrap();
        let expected = engine.stats().clone();

        let legacy = Arc::new(MemoryKeyValueStore::new("legacy"));
        let reloaded =
            StatisticsEngine::new(TieredRepository::new(vec![Box::new(secure), Box::new(legacy)]));
        assert_eq!(reloaded.stats(), &expected);
    }

    #[test]
    fn reset_wipes_aggregate_and_storage() {
        let (repo, secure) = memory_repo();
        let mut engine = StatisticsEngine::new(repo);
        engine.record_mood_value_at(0.9, on_day(5)).unwrap();
        engine.reset();

        assert_eq!(engine.stats(), &UserStats::default());
        assert!(secure.raw(USER_STATS_KEY).is_none());
    }

    #[test]
    fn checkin_cancels_pending_reminder() {
        struct RecordingNotifier {
            cancelled: Mutex<Vec<String>>,
        }
        impl Notifier for RecordingNotifier {
            fn permission_granted(&self) -> bool {
                true
            }
            fn cancel(&self, id: &str) -> Result<(), crate::error::SchedulingError> {
                self.cancelled.lock().unwrap().push(id.to_string());
                Ok(())
            }
            fn cancel_all(&self, _ids: &[String]) -> Result<(), crate::error::SchedulingError> {
                Ok(())
            }
            fn schedule_recurring_daily(
                &self,
                _id: &str,
                _hour: u32,
                _minute: u32,
                _title: &str,
                _body: &str,
            ) -> Result<(), crate::error::SchedulingError> {
                Ok(())
            }
            fn schedule_one_shot(
                &self,
                _id: &str,
                _fire_at: DateTime<Local>,
                _title: &str,
                _body: &str,
            ) -> Result<(), crate::error::SchedulingError> {
                Ok(())
            }
            fn count_pending(&self, _prefix: &str) -> usize {
                0
            }
        }

        let notifier = Arc::new(RecordingNotifier {
            cancelled: Mutex::new(Vec::new()),
        });
        let mut engine = engine();
        engine.attach_notifier(notifier.clone());

        engine.record_mood_value(0.5).unwrap();
        assert_eq!(
            notifier.cancelled.lock().unwrap().as_slice(),
            [CHECKIN_REMINDER_ID.to_string()]
        );

        // sessions do not cancel the check-in reminder
        engine.record_session(Technique::Grounding).unwrap();
        assert_eq!(notifier.cancelled.lock().unwrap().len(), 1);
    }

    #[test]
    fn stats_changed_fires_after_each_mutation() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = count.clone();
        let mut engine = engine();
        engine.subscribe(Box::new(move |event| {
            if matches!(event, Event::StatsChanged { .. }) {
                seen.fetch_add(1, Ordering::SeqCst);
            }
        }));

        engine.record_mood_value_at(0.4, on_day(1)).unwrap();
        engine
            .record_session_at(Technique::BoxBreathing, on_day(1))
            .unwrap();
        engine.set_favorite_quote_category("grounding").unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 3);
    }

    #[test]
    fn favorites_round_trip() {
        let mut engine = engine();
        engine
            .set_favorite_exercises([Some("box_breathing".into()), None, Some("grounding".into())])
            .unwrap();
        assert_eq!(
            engine.stats().favorite_exercises,
            [Some("box_breathing".to_string()), None, Some("grounding".to_string())]
        );
    }

    #[test]
    fn profile_defaults_then_round_trips() {
        let engine = engine();
        assert_eq!(engine.load_profile(), UserProfile::default());

        let profile = UserProfile {
            display_name: Some("Ash".to_string()),
            onboarding_complete: true,
            preferred_technique: Some(Technique::CoherentBreathing),
        };
        engine.save_profile(&profile).unwrap();
        assert_eq!(engine.load_profile(), profile);
    }
}
