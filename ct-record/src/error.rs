//! Failures reported by a record store.

use thiserror::Error;

/// A list query failed. Recoverable: the caller keeps its previous records.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    /// The store answered with a non-success status
    #[error("list request failed with status {0}")]
    Status(u16),

    /// The request never produced a response
    #[error("list request failed: {0}")]
    Transport(String),

    /// The response body was not a JSON array of records
    #[error("could not decode list response: {0}")]
    Decode(String),
}

/// A create command failed. Does not affect list freshness.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CreateError {
    #[error("create request failed with status {0}")]
    Status(u16),

    #[error("create request failed: {0}")]
    Transport(String),
}
