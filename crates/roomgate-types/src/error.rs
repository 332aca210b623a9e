//! Error types for parsing identity values.
//!
//! These errors only arise at the edges, when text from a caller is
//! turned into a typed identifier. Once a value is typed it is valid.

/// Errors that can occur while parsing Roomgate identity types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeError {
    /// The text is not a valid room or user identifier (UUID).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// The join code is empty, too long, or contains characters
    /// outside `A-Z`, `0-9` and `-`.
    #[error("invalid join code: {0:?}")]
    InvalidJoinCode(String),

    /// The text does not name a known room status.
    #[error("unknown room status: {0}")]
    UnknownStatus(String),
}
