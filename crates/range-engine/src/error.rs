//! Error types for range-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RangeError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid span: {0}")]
    InvalidSpan(String),

    #[error("Date overflow: {0}")]
    DateOverflow(String),

    #[error("Range '{0}' has no start date but a maximum date is set")]
    MissingRangeStart(String),

    #[error("Duplicate range label: '{0}'")]
    DuplicateLabel(String),

    #[error("Invalid locale: {0}")]
    InvalidLocale(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, RangeError>;
