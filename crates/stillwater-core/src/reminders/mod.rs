//! Local reminder scheduling.
//!
//! Two reminder families:
//! - a single recurring daily mood check-in, suppressed when the user has
//!   already checked in today
//! - a rolling 30-day window of one-shot daily quotes whose content is a
//!   pure function of the calendar date
//!
//! This module decides *what and when*; delivery belongs to the external
//! [`Notifier`] collaborator. Individual scheduling failures are logged and
//! skipped -- the next maintenance pass self-heals.

pub mod notify;
pub mod quotes;

pub use notify::Notifier;
pub use quotes::{quote_for_date, Quote, QUOTES};

use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Local, NaiveDate, TimeZone, Utc};
use tracing::{debug, warn};

use crate::stats::StatisticsEngine;
use crate::storage::RemindersConfig;

/// Stable id of the recurring mood check-in reminder.
pub const CHECKIN_REMINDER_ID: &str = "mood-check-in";

/// Id prefix shared by all quote-window slots.
pub const QUOTE_ID_PREFIX: &str = "daily-quote";

/// Size of the rolling quote window.
pub const QUOTE_WINDOW_DAYS: usize = 30;

/// Remaining-quote floor below which the window is recreated.
pub const QUOTE_REFRESH_FLOOR: usize = 7;

/// Static deep link the widget uses to open the relief flow.
pub const RELIEF_DEEP_LINK: &str = "stillwater://relief";

/// Decides which local reminders exist and when they fire.
pub struct ReminderScheduler {
    notifier: Arc<dyn Notifier>,
    config: RemindersConfig,
    /// Single-flight guard: no two maintenance passes may overlap, or the
    /// window could end up half old, half new.
    maintenance: Mutex<()>,
    last_refresh_check: Mutex<Option<DateTime<Utc>>>,
}

impl ReminderScheduler {
    pub fn new(notifier: Arc<dyn Notifier>, config: RemindersConfig) -> Self {
        Self {
            notifier,
            config,
            maintenance: Mutex::new(()),
            last_refresh_check: Mutex::new(None),
        }
    }

    /// The fixed slot ids of the quote window.
    pub fn quote_slot_ids() -> Vec<String> {
        (0..QUOTE_WINDOW_DAYS)
            .map(|slot| format!("{QUOTE_ID_PREFIX}-{slot:02}"))
            .collect()
    }

    // ---- mood check-in -----------------------------------------------------

    /// (Re)schedule the recurring check-in reminder.
    ///
    /// Requires notification permission and no check-in recorded today; any
    /// existing instance is cancelled first so scheduling twice never
    /// double-fires. Returns whether a reminder is now scheduled.
    pub fn schedule_checkin(&self, engine: &StatisticsEngine) -> bool {
        self.schedule_checkin_at(engine, Utc::now())
    }

    fn schedule_checkin_at(&self, engine: &StatisticsEngine, now: DateTime<Utc>) -> bool {
        if !self.config.enabled || !self.notifier.permission_granted() {
            return false;
        }
        if engine.has_entry_for(now) {
            debug!("already checked in today, leaving check-in reminder unscheduled");
            return false;
        }
        if let Err(e) = self.notifier.cancel(CHECKIN_REMINDER_ID) {
            warn!(error = %e, "failed to cancel existing check-in reminder");
        }
        match self.notifier.schedule_recurring_daily(
            CHECKIN_REMINDER_ID,
            self.config.checkin_hour,
            self.config.checkin_minute,
            "Mood check-in",
            "Take a breath. How are you feeling today?",
        ) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "failed to schedule check-in reminder");
                false
            }
        }
    }

    /// Cancel the recurring check-in reminder.
    pub fn cancel_checkin(&self) {
        if let Err(e) = self.notifier.cancel(CHECKIN_REMINDER_ID) {
            warn!(error = %e, "failed to cancel check-in reminder");
        }
    }

    // ---- daily quote window ------------------------------------------------

    /// Full maintenance pass: cancel all window slots, then recreate
    /// one-shots for `[today, today+29]` at the configured time.
    ///
    /// Returns the number of reminders scheduled. A pass already in flight
    /// makes this call a no-op (single-flight).
    pub fn refresh_quote_window(&self) -> usize {
        self.refresh_quote_window_at(Local::now().date_naive())
    }

    fn refresh_quote_window_at(&self, today: NaiveDate) -> usize {
        let _guard = match self.maintenance.try_lock() {
            Ok(guard) => guard,
            Err(_) => {
                debug!("quote window maintenance already in flight, skipping");
                return 0;
            }
        };
        if !self.config.enabled || !self.notifier.permission_granted() {
            return 0;
        }

        let slot_ids = Self::quote_slot_ids();
        if let Err(e) = self.notifier.cancel_all(&slot_ids) {
            warn!(error = %e, "failed to cancel quote window, recreating anyway");
        }

        let mut scheduled = 0;
        for (slot, id) in slot_ids.iter().enumerate() {
            let date = today + Duration::days(slot as i64);
            let Some(fire_at) =
                local_fire_time(date, self.config.quote_hour, self.config.quote_minute)
            else {
                warn!(%date, "no valid local fire time, skipping slot");
                continue;
            };
            let quote = quote_for_date(date);
            match self
                .notifier
                .schedule_one_shot(id, fire_at, "A moment of calm", quote.text)
            {
                Ok(()) => scheduled += 1,
                // partial-window success is fine, the next pass heals it
                Err(e) => warn!(id = %id, error = %e, "failed to schedule quote reminder"),
            }
        }
        debug!(scheduled, "quote window refreshed");
        scheduled
    }

    /// App-foreground hook. At most once per 24h, counts the remaining
    /// future quote reminders and recreates the window when fewer than
    /// [`QUOTE_REFRESH_FLOOR`] remain. Returns whether a refresh ran.
    pub fn app_became_active(&self) -> bool {
        self.app_became_active_at(Utc::now(), Local::now().date_naive())
    }

    fn app_became_active_at(&self, now: DateTime<Utc>, today: NaiveDate) -> bool {
        {
            let mut last = self
                .last_refresh_check
                .lock()
                .expect("refresh-check lock poisoned");
            if let Some(prev) = *last {
                if now - prev < Duration::hours(24) {
                    return false;
                }
            }
            *last = Some(now);
        }
        let remaining = self.notifier.count_pending(QUOTE_ID_PREFIX);
        if remaining < QUOTE_REFRESH_FLOOR {
            debug!(remaining, "quote window low, refreshing");
            self.refresh_quote_window_at(today) > 0
        } else {
            false
        }
    }

    /// Static deep link for the widget collaborator; carries no content.
    pub fn relief_deep_link() -> &'static str {
        RELIEF_DEEP_LINK
    }
}

/// Local wall-clock fire time for `date` at `hour:minute`. `None` when the
/// combination does not exist (invalid time or DST gap).
fn local_fire_time(date: NaiveDate, hour: u32, minute: u32) -> Option<DateTime<Local>> {
    let naive = date.and_hms_opt(hour, minute, 0)?;
    Local.from_local_datetime(&naive).earliest()
}
