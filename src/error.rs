//! Custom error types for BudgetPilot
//!
//! This module defines the error hierarchy for the client using thiserror
//! for ergonomic error definitions.

use chrono::NaiveDate;
use thiserror::Error;

use crate::models::Stage;

/// The main error type for BudgetPilot operations
#[derive(Error, Debug)]
pub enum BudgetPilotError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Local store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Input rejected before any network call
    #[error("Validation error: {0}")]
    Validation(String),

    /// The budgeting service answered with a non-success status
    #[error("Service error ({status}): {message}")]
    Service { status: u16, message: String },

    /// The budgeting service could not be reached
    #[error("Network error: {0}")]
    Network(String),

    /// The same workflow stage is already running
    #[error("{0} is already in progress")]
    StageInFlight(Stage),
}

impl BudgetPilotError {
    /// Create the error raised when a stage needs a period id and none exists
    pub fn period_required() -> Self {
        Self::Validation("period required".into())
    }

    /// Create the error raised for a date range whose start is after its end
    pub fn invalid_range(start: NaiveDate, end: NaiveDate) -> Self {
        Self::Validation(format!(
            "period start {} is after period end {}",
            start.format("%Y-%m-%d"),
            end.format("%Y-%m-%d")
        ))
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation(_))
    }

    /// Check if this error came from the budgeting service or the network
    pub fn is_service(&self) -> bool {
        matches!(self, Self::Service { .. } | Self::Network(_))
    }

    /// Message suitable for a dismissible banner
    pub fn banner_message(&self) -> String {
        match self {
            Self::Service { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<std::io::Error> for BudgetPilotError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for BudgetPilotError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err.to_string())
    }
}

impl From<reqwest::Error> for BudgetPilotError {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err.to_string())
    }
}

/// Result type alias for BudgetPilot operations
pub type BudgetPilotResult<T> = Result<T, BudgetPilotError>;
