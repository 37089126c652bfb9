//! Recoverable error types
//!
//! Data inconsistencies inside the core (duplicate ids, missing objects) are
//! logged and absorbed; only caller input that can be rejected up front is
//! surfaced as an error.

use thiserror::Error;

/// Invalid round configuration supplied by the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("button count {count} is outside 3..=7")]
    ButtonCountOutOfRange { count: i64 },
    #[error("button count is not a whole number")]
    NotANumber,
}

impl ConfigError {
    /// Message shown to the player for this error
    pub fn user_message(&self) -> &'static str {
        crate::text::INVALID_BUTTON_COUNT
    }
}

/// Failure to read an entity schema
#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("malformed schema: {0}")]
    Parse(#[from] serde_json::Error),
}
