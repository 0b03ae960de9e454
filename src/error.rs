//! Error types for the royalty ledger.

use crate::money::Money;
use std::num::ParseIntError;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Reasons a ledger query or withdrawal is refused.
///
/// The display text is the message returned to API clients.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// Unknown or unparsable author id
    #[error("Author not found")]
    AuthorNotFound,

    /// Requested amount is under the payout floor
    #[error("Minimum withdrawal amount is ₹{minimum}")]
    BelowMinimum { minimum: Money },

    /// Requested amount exceeds earnings not yet withdrawn
    #[error("Insufficient balance")]
    InsufficientBalance { requested: Money, available: Money },
}

/// Invalid service configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid PORT value {value:?}: {source}")]
    InvalidPort {
        value: String,
        #[source]
        source: ParseIntError,
    },
}

/// Errors that stop the service from starting or serving.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Failed to bind or serve the listening socket
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),
}
