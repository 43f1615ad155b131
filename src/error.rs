//! Error types for batchquery.

use thiserror::Error;

/// Result type for batchquery operations.
pub type Result<T> = core::result::Result<T, Error>;

/// Error type for batchquery.
#[derive(Debug, Error)]
pub enum Error {
    /// A guarded command was issued without a connected session
    #[error("Not connected")]
    NotConnected,

    /// Opening the session failed
    #[error("Connect failed: {0}")]
    Connect(String),

    /// A read, write, or procedure call failed at the accessor
    #[error("Execution failed: {0}")]
    Execution(String),

    /// Begin/Commit/Rollback failed at the accessor
    #[error("Transaction control failed: {0}")]
    Transaction(String),

    /// A cell value could not be converted to the requested type
    #[error("Decode error: {0}")]
    Decode(String),

    /// Invalid usage (e.g., malformed connection URL, bad checker index)
    #[error("Invalid usage: {0}")]
    InvalidUsage(String),
}

impl Error {
    /// Returns true if the error indicates the session itself is unusable,
    /// as opposed to a single statement failing.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::NotConnected | Error::Connect(_))
    }
}
