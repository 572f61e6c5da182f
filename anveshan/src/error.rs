//! Error types for Anveshan.
//!
//! Only setup paths are fallible. The per-tick planning path degrades
//! instead of returning errors.

use thiserror::Error;

/// Anveshan error type
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid configuration: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: String,
    },

    #[error("Grid service unavailable")]
    MissingGrid,

    #[error("Area partition unavailable")]
    MissingPartition,

    #[error("Layout error: {0}")]
    Layout(String),
}

impl From<toml::de::Error> for SearchError {
    fn from(e: toml::de::Error) -> Self {
        SearchError::Config(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, SearchError>;
