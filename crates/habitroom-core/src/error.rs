//! Core error types for habitroom-core.
//!
//! The schedule, streak and reminder-planning algorithms are infallible.
//! Everything that touches storage, configuration or user input reports
//! through the hierarchy below.

use std::path::PathBuf;
use thiserror::Error;

use crate::habit::HabitId;

/// Core error type for habitroom-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Database-related errors
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Database-specific errors.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to open database connection
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Migration failed
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// A stored value could not be decoded
    #[error("Corrupt value in column '{column}': {value}")]
    CorruptValue { column: String, value: String },

    /// Database is locked
    #[error("Database is locked")]
    Locked,
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

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Unknown configuration key
    #[error("Unknown configuration key: {0}")]
    UnknownKey(String),

    /// Data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    /// Habit title is empty or whitespace
    #[error("Habit title must not be blank")]
    BlankTitle,

    /// Count target is zero or negative
    #[error("Target must be a positive integer, got {0}")]
    NonPositiveTarget(i64),

    /// Entry operation does not match the habit's unit type
    #[error("Habit {habit_id} tracks {expected} values; cannot apply a {attempted} update")]
    WrongUnitType {
        habit_id: HabitId,
        expected: &'static str,
        attempted: &'static str,
    },

    /// No habit with the given id
    #[error("Habit not found: {0}")]
    HabitNotFound(HabitId),

    /// Unparseable user input (days, times, modes)
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

impl From<rusqlite::Error> for DatabaseError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(inner, _)
                if inner.code == rusqlite::ErrorCode::DatabaseLocked =>
            {
                DatabaseError::Locked
            }
            // Column decoders report bad stored values as a boxed DatabaseError.
            rusqlite::Error::FromSqlConversionFailure(_, _, source) => {
                match source.downcast::<DatabaseError>() {
                    Ok(decoded) => *decoded,
                    Err(other) => DatabaseError::QueryFailed(other.to_string()),
                }
            }
            other => DatabaseError::QueryFailed(other.to_string()),
        }
    }
}

impl From<rusqlite::Error> for CoreError {
    fn from(err: rusqlite::Error) -> Self {
        CoreError::Database(err.into())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
