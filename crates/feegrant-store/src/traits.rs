//! GrantStore trait: the abstract interface for grant persistence.
//!
//! The driver owns persistence; this trait lets it stay storage-agnostic.
//! Implementations include SQLite (primary) and in-memory (for tests).

use async_trait::async_trait;

use feegrant_allowance::Grant;
use feegrant_core::{Address, Timestamp};

use crate::error::Result;

/// The GrantStore trait: async interface for grant persistence.
///
/// Grants are keyed by `(granter, grantee)`; at most one grant exists per
/// pair.
#[async_trait]
pub trait GrantStore: Send + Sync {
    /// Get the grant for a pair.
    async fn get_grant(&self, granter: &Address, grantee: &Address) -> Result<Option<Grant>>;

    /// Insert a grant, replacing any grant for the same pair.
    async fn put_grant(&self, grant: &Grant) -> Result<()>;

    /// Delete the grant for a pair. Returns whether one existed.
    async fn delete_grant(&self, granter: &Address, grantee: &Address) -> Result<bool>;

    /// All grants a grantee may use, ordered by granter.
    async fn grants_by_grantee(&self, grantee: &Address) -> Result<Vec<Grant>>;

    /// All grants a granter has issued, ordered by grantee.
    async fn grants_by_granter(&self, granter: &Address) -> Result<Vec<Grant>>;

    /// Keys of grants whose expiration is at or before `now`.
    ///
    /// Ordered by expiration (oldest first), then granter, then grantee.
    /// At most `limit` keys are returned.
    async fn expired_grants(&self, now: Timestamp, limit: usize) -> Result<Vec<(Address, Address)>>;
}
