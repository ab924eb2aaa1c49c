use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::model::Technique;

/// Every successful stats mutation produces an Event.
/// UI layers subscribe through `StatisticsEngine::subscribe`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A mood check-in was recorded or updated for `day`.
    MoodRecorded {
        day: NaiveDate,
        mood_value: f64,
        at: DateTime<Utc>,
    },
    /// A relief session finished.
    SessionRecorded {
        technique: Technique,
        total_sessions: u64,
        at: DateTime<Utc>,
    },
    /// Emitted after every successful mutation, once persistence completed.
    StatsChanged {
        current_streak: u32,
        longest_streak: u32,
        at: DateTime<Utc>,
    },
    /// The aggregate was wiped by an explicit user reset.
    StatsReset { at: DateTime<Utc> },
}

/// Subscriber callback for stats events.
pub type EventSubscriber = Box<dyn Fn(&Event) + Send>;
