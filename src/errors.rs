//! Unified application error type.
//! Every layer (db, core, cli) returns AppError so the CLI and any other
//! caller can map failures onto a small set of stable error codes.

use rusqlite::ErrorCode;
use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    // ---------------------------
    // Business rules
    // ---------------------------
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Worker '{worker_id}' is already clocked in")]
    AlreadyClockedIn { worker_id: String },

    #[error("Worker '{worker_id}' has no open shift")]
    NoOpenShift { worker_id: String },

    #[error("Location is outside the work perimeter{}", describe_violation(.distance_m, .radius_m))]
    NotInPerimeter {
        distance_m: Option<f64>,
        radius_m: Option<f64>,
    },

    #[error("Operation not permitted: {0}")]
    Forbidden(String),

    // ---------------------------
    // Storage
    // ---------------------------
    #[error("Storage timed out, retry the operation: {0}")]
    StorageTimeout(String),

    #[error("Database error: {0}")]
    Db(rusqlite::Error),

    #[error("Database migration error: {0}")]
    Migration(String),

    // ---------------------------
    // IO / parsing
    // ---------------------------
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid date format: {0}")]
    InvalidDate(String),

    // ---------------------------
    // Config / export
    // ---------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Export error: {0}")]
    Export(String),

    // ---------------------------
    // Generic fallback
    // ---------------------------
    #[error("Internal error: {0}")]
    Other(String),
}

fn describe_violation(distance_m: &Option<f64>, radius_m: &Option<f64>) -> String {
    match (distance_m, radius_m) {
        (Some(d), Some(r)) => format!(" ({:.0} m from center, allowed {:.0} m)", d, r),
        _ => " (no perimeter configured)".to_string(),
    }
}

impl From<rusqlite::Error> for AppError {
    fn from(e: rusqlite::Error) -> Self {
        match e.sqlite_error_code() {
            Some(ErrorCode::DatabaseBusy) | Some(ErrorCode::DatabaseLocked) => {
                AppError::StorageTimeout(e.to_string())
            }
            _ => AppError::Db(e),
        }
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(e: serde_json::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl AppError {
    /// Stable code consumed by callers of the engine.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) | AppError::InvalidDate(_) => "VALIDATION",
            AppError::AlreadyClockedIn { .. } => "ALREADY_CLOCKED_IN",
            AppError::NoOpenShift { .. } => "NO_OPEN_SHIFT",
            AppError::NotInPerimeter { .. } => "NOT_IN_PERIMETER",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::StorageTimeout(_) => "STORAGE_TIMEOUT",
            AppError::Db(_) | AppError::Migration(_) => "STORAGE",
            AppError::Io(_) | AppError::Export(_) => "IO",
            AppError::Config(_) => "CONFIG",
            AppError::Other(_) => "INTERNAL",
        }
    }

    /// Only transient storage contention is worth retrying as a whole.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::StorageTimeout(_))
    }
}

pub type AppResult<T> = Result<T, AppError>;
