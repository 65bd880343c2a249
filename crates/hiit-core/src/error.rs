//! Core error types for hiit-core.
//!
//! This module defines the error hierarchy using thiserror. Sequencer errors
//! are local and synchronous; storage and configuration errors carry the path
//! that failed so the host can report it.

use std::path::PathBuf;
use thiserror::Error;

use crate::timer::RunState;

/// Core error type for hiit-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Sequencer rejected a call
    #[error("Sequencer error: {0}")]
    Sequencer(#[from] SequencerError),

    /// Template or history store errors
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors returned by [`IntervalSequencer`](crate::timer::IntervalSequencer).
///
/// A rejected call never changes the sequencer's state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    /// The plan handed to `configure` is malformed.
    #[error("invalid plan: {0}")]
    InvalidPlan(#[from] PlanError),

    /// The operation is not valid in the current run state.
    #[error("cannot {operation} while {state}")]
    InvalidTransition {
        operation: &'static str,
        state: RunState,
    },
}

/// Reasons a [`WorkoutPlan`](crate::timer::WorkoutPlan) is rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    #[error("plan has no intervals")]
    NoIntervals,

    #[error("plan must have at least one set")]
    NoSets,

    #[error("interval {index} has an empty name")]
    EmptyName { index: usize },

    #[error("interval {index} ('{name}') must last at least one second")]
    ZeroDuration { index: usize, name: String },

    #[error("workout is too long to time")]
    TooLong,
}

/// Workout template and history store errors.
#[derive(Error, Debug)]
pub enum StorageError {
    /// Store file exists but could not be read or written
    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Store file exists but does not hold the expected records
    #[error("Malformed data in {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// No saved workout under this name
    #[error("No saved workout named '{0}'")]
    NotFound(String),

    /// Template names must not be blank
    #[error("Workout name must not be empty")]
    EmptyName,

    /// Refused to save a plan the sequencer would reject
    #[error("Refusing to save invalid workout: {0}")]
    InvalidPlan(#[from] PlanError),

    /// Data directory could not be determined or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
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

    /// Key does not name a known setting
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
