//! # Stillwater Core Library
//!
//! This library provides the on-device engagement-state engine for the
//! Stillwater wellness app. It implements a CLI-first philosophy where all
//! operations are available via a standalone CLI binary, with any GUI shell
//! being a thin layer over the same core library.
//!
//! ## Architecture
//!
//! - **Tiered Storage**: OS-keyring-backed secure store over a legacy
//!   SQLite store, with one-way promotion from legacy to secure
//! - **Statistics Engine**: the `UserStats` aggregate, streaks, weekly
//!   aggregates, and the day-keyed lookup cache
//! - **Reminder Scheduler**: the recurring mood check-in and the rolling
//!   30-day window of date-deterministic daily quotes
//!
//! ## Key Components
//!
//! - [`StatisticsEngine`]: exclusive owner of the stats aggregate
//! - [`TieredRepository`]: typed load/save across storage tiers
//! - [`ReminderScheduler`]: reminder window maintenance
//! - [`Notifier`]: capability surface for notification delivery

pub mod error;
pub mod events;
pub mod model;
pub mod reminders;
pub mod stats;
pub mod storage;

pub use error::{ConfigError, CoreError, SchedulingError, StorageError};
pub use events::Event;
pub use model::{MoodEntry, Technique, UserProfile, UserStats};
pub use reminders::{quote_for_date, Notifier, Quote, ReminderScheduler};
pub use stats::StatisticsEngine;
pub use storage::{AppConfig, RemindersConfig, TieredRepository};
