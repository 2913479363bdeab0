//! Error types for the Keeper.

use feegrant_allowance::{AcceptError, InvalidAllowance};
use feegrant_core::{Address, Timestamp};
use feegrant_store::StoreError;
use thiserror::Error;

/// Errors that can occur during Keeper operations.
#[derive(Debug, Error)]
pub enum KeeperError {
    /// Storage error.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// The allowance failed structural validation.
    #[error("invalid allowance: {0}")]
    Invalid(#[from] InvalidAllowance),

    /// The allowance refused to pay the fee.
    #[error("fee rejected: {0}")]
    Rejected(#[from] AcceptError),

    /// No grant exists for the pair.
    #[error("fee allowance not found: granter {granter}, grantee {grantee}")]
    NotFound { granter: Address, grantee: Address },

    /// A grant already exists for the pair.
    #[error("fee allowance already exists: granter {granter}, grantee {grantee}")]
    AlreadyExists { granter: Address, grantee: Address },

    /// The allowance would be dead on arrival.
    #[error("expiration {expiration} is not after current time {now}")]
    ExpiredOnGrant { expiration: Timestamp, now: Timestamp },
}

impl KeeperError {
    /// Whether this is a fee rejection (as opposed to a storage or usage error).
    pub fn is_rejection(&self) -> bool {
        matches!(self, KeeperError::Rejected(_))
    }
}

/// Result type for Keeper operations.
pub type Result<T> = std::result::Result<T, KeeperError>;
