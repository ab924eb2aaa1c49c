//! Outbound capability surface for local notification delivery.
//!
//! The core never talks to OS notification APIs directly; it depends on
//! this trait, which platform shells implement and tests stub.

use chrono::{DateTime, Local};

use crate::error::SchedulingError;

/// Local notification delivery collaborator.
pub trait Notifier: Send + Sync {
    /// Whether the user has granted notification permission.
    fn permission_granted(&self) -> bool;

    /// Cancel a pending reminder by id. Cancelling an unknown id is a no-op.
    fn cancel(&self, id: &str) -> Result<(), SchedulingError>;

    /// Cancel every id in the list, best effort.
    fn cancel_all(&self, ids: &[String]) -> Result<(), SchedulingError>;

    /// Schedule a reminder that repeats every day at `hour:minute` local time.
    fn schedule_recurring_daily(
        &self,
        id: &str,
        hour: u32,
        minute: u32,
        title: &str,
        body: &str,
    ) -> Result<(), SchedulingError>;

    /// Schedule a one-shot reminder at an absolute local time.
    fn schedule_one_shot(
        &self,
        id: &str,
        fire_at: DateTime<Local>,
        title: &str,
        body: &str,
    ) -> Result<(), SchedulingError>;

    /// Number of pending reminders whose id starts with `prefix`.
    fn count_pending(&self, prefix: &str) -> usize;
}
