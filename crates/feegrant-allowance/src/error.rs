//! Error types for fee allowances.

use thiserror::Error;

use feegrant_core::{Address, Coins, CoinsError, Timestamp};

/// Structural problems found by `validate`.
///
/// An allowance in any of these states must never be stored.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidAllowance {
    /// A coin set inside the allowance is malformed.
    #[error("invalid coins: {0}")]
    Coins(#[from] CoinsError),

    /// A present spend limit is empty.
    #[error("spend limit must be positive")]
    SpendLimitNotPositive,

    /// The expiration is at or before the Unix epoch.
    #[error("expiration must be after the Unix epoch, got {0}")]
    ExpirationNotPositive(Timestamp),

    /// The period is shorter than one millisecond.
    #[error("period must be positive")]
    PeriodNotPositive,

    /// A present period spend limit is empty.
    #[error("period spend limit must be positive")]
    PeriodSpendLimitNotPositive,

    /// The absolute and per-period limits name different denominations.
    #[error("period spend limit {period} has different denominations than spend limit {total}")]
    DenomMismatch { total: Coins, period: Coins },

    /// A message filter with nothing in it.
    #[error("allowed message list is empty")]
    NoAllowedMessages,

    /// A message filter entry that is the empty string.
    #[error("allowed message type URL is empty")]
    EmptyMessageType,

    /// Granter and grantee are the same account.
    #[error("cannot grant a fee allowance to self: {0}")]
    SelfGrant(Address),
}

/// Reasons a fee attempt is rejected by `accept`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AcceptError {
    /// The hard deadline has been reached. The grant must be deleted.
    #[error("fee allowance expired at {expiration}")]
    Expired { expiration: Timestamp },

    /// The fee is larger than what is left of a flat allowance.
    #[error("fee {fee} exceeds spend limit {limit}")]
    FeeExceedsLimit { fee: Coins, limit: Coins },

    /// The fee is larger than what is left in the current period.
    #[error("fee {fee} exceeds period allowance {available}")]
    PeriodLimitExceeded { fee: Coins, available: Coins },

    /// The fee fits the period but not the absolute limit of a periodic allowance.
    #[error("fee {fee} exceeds absolute spend limit {limit}")]
    AbsoluteLimitExceeded { fee: Coins, limit: Coins },

    /// A message in the attempt is outside the allowed list.
    #[error("message type {0} is not allowed by this fee allowance")]
    MessageNotAllowed(String),
}

impl AcceptError {
    /// Whether the grant can never be used again and must be deleted.
    pub fn removes_grant(&self) -> bool {
        matches!(self, AcceptError::Expired { .. })
    }
}

/// Errors that can occur while handling allowances and grant records.
#[derive(Debug, Error)]
pub enum AllowanceError {
    /// Structural validation failed.
    #[error("invalid allowance: {0}")]
    Invalid(#[from] InvalidAllowance),

    /// A fee attempt was rejected.
    #[error("fee rejected: {0}")]
    Rejected(#[from] AcceptError),

    /// Encoding or decoding a grant record failed.
    #[error("encoding error: {0}")]
    Encoding(String),
}

/// Result type for allowance operations.
pub type Result<T> = std::result::Result<T, AllowanceError>;
