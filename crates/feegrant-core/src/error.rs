//! Error types for the fee grant core.

use thiserror::Error;

/// Errors produced while building or combining coin sets.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoinsError {
    #[error("invalid denomination: {0:?}")]
    InvalidDenom(String),

    #[error("duplicate denomination: {0}")]
    DuplicateDenom(String),

    #[error("coins are not sorted by denomination: {0} follows {1}")]
    Unsorted(String, String),

    #[error("zero amount for denomination {0}")]
    ZeroAmount(String),

    #[error("amount overflow for denomination {0}")]
    Overflow(String),

    #[error("cannot parse coin {0:?}")]
    Parse(String),
}

/// Result type for coin operations.
pub type Result<T> = std::result::Result<T, CoinsError>;
