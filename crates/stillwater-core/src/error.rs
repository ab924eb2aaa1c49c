//! Core error types for stillwater-core.
//!
//! This module defines the error hierarchy using thiserror. Storage and
//! configuration get their own enums; everything rolls up into [`CoreError`].

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for stillwater-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Storage-related errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Reminder scheduling errors
    #[error("Scheduling error: {0}")]
    Scheduling(#[from] SchedulingError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic errors with context
    #[error("{0}")]
    Custom(String),
}

/// Storage-specific errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A single tier refused the operation (keystore locked, db missing, ...)
    #[error("Storage tier '{tier}' unavailable: {message}")]
    Unavailable { tier: &'static str, message: String },

    /// Stored bytes do not match the expected record schema.
    ///
    /// The tiered repository downgrades this to "absent" on load so a
    /// schema change never takes the app down; it only surfaces from the
    /// codec itself.
    #[error("Failed to decode stored record: {0}")]
    Deserialization(String),

    /// Record could not be encoded for storage.
    #[error("Failed to encode record: {0}")]
    Serialization(String),

    /// Every tier rejected the write. Fatal for that save, logged upstream.
    #[error("All storage tiers failed for key '{key}'")]
    AllTiersFailed { key: String },

    /// Legacy store (SQLite) failure
    #[error("Legacy store error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Secure store (OS keyring) failure
    #[error("Keyring error: {0}")]
    Keyring(String),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Reminder-scheduling errors.
///
/// Individual reminder failures are logged and skipped by the scheduler;
/// these only surface when a whole operation cannot proceed.
#[derive(Error, Debug)]
pub enum SchedulingError {
    /// Notification permission has not been granted.
    #[error("Notification permission not granted")]
    PermissionDenied,

    /// The delivery collaborator rejected a schedule/cancel call.
    #[error("Notification delivery failed for '{id}': {message}")]
    DeliveryFailed { id: String, message: String },
}

impl From<keyring::Error> for StorageError {
    fn from(err: keyring::Error) -> Self {
        StorageError::Keyring(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
