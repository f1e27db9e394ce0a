//! Error types for eventide.

use std::path::PathBuf;

use chrono::NaiveDate;
use thiserror::Error;

/// Errors that can occur in eventide operations.
#[derive(Error, Debug)]
pub enum EventideError {
    #[error("Invalid window: start {start} is after end {end}")]
    InvalidWindow { start: NaiveDate, end: NaiveDate },

    #[error("Template '{template}' has unsupported recurrence type '{kind}'")]
    UnsupportedRecurrenceType { template: String, kind: String },

    #[error("Template '{template}' has malformed recurrence config: {reason}")]
    MalformedConfig { template: String, reason: String },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template store error: {0}")]
    TemplateStore(String),

    #[error("Could not parse template {}: {reason}", .path.display())]
    TemplateParse { path: PathBuf, reason: String },

    #[error("ICS generation error: {0}")]
    IcsGenerate(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for eventide operations.
pub type EventideResult<T> = Result<T, EventideError>;
