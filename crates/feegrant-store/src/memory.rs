//! In-memory implementation of the GrantStore trait.
//!
//! This is primarily for testing. It has the same semantics as SQLite
//! but keeps everything in memory with no persistence.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use feegrant_allowance::Grant;
use feegrant_core::{Address, Timestamp};

use crate::error::{Result, StoreError};
use crate::traits::GrantStore;

const MIN_ADDRESS: Address = Address::from_bytes([0x00; 32]);
const MAX_ADDRESS: Address = Address::from_bytes([0xff; 32]);

/// In-memory store implementation.
///
/// All data is lost when the store is dropped. Thread-safe via RwLock.
#[derive(Default)]
pub struct MemoryStore {
    /// Grants keyed by (granter, grantee).
    grants: RwLock<BTreeMap<(Address, Address), Grant>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored grants.
    pub fn len(&self) -> usize {
        self.grants.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Whether the store holds no grants.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl GrantStore for MemoryStore {
    async fn get_grant(&self, granter: &Address, grantee: &Address) -> Result<Option<Grant>> {
        let grants = self.grants.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(grants.get(&(*granter, *grantee)).cloned())
    }

    async fn put_grant(&self, grant: &Grant) -> Result<()> {
        let mut grants = self.grants.write().map_err(|_| StoreError::LockPoisoned)?;
        grants.insert((grant.granter, grant.grantee), grant.clone());
        Ok(())
    }

    async fn delete_grant(&self, granter: &Address, grantee: &Address) -> Result<bool> {
        let mut grants = self.grants.write().map_err(|_| StoreError::LockPoisoned)?;
        Ok(grants.remove(&(*granter, *grantee)).is_some())
    }

    async fn grants_by_grantee(&self, grantee: &Address) -> Result<Vec<Grant>> {
        let grants = self.grants.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(grants
            .values()
            .filter(|g| g.grantee == *grantee)
            .cloned()
            .collect())
    }

    async fn grants_by_granter(&self, granter: &Address) -> Result<Vec<Grant>> {
        let grants = self.grants.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(grants
            .range((*granter, MIN_ADDRESS)..=(*granter, MAX_ADDRESS))
            .map(|(_, g)| g.clone())
            .collect())
    }

    async fn expired_grants(&self, now: Timestamp, limit: usize) -> Result<Vec<(Address, Address)>> {
        let grants = self.grants.read().map_err(|_| StoreError::LockPoisoned)?;

        let mut due: Vec<(Timestamp, Address, Address)> = grants
            .values()
            .filter_map(|g| {
                g.expiration()
                    .filter(|expiration| *expiration <= now)
                    .map(|expiration| (expiration, g.granter, g.grantee))
            })
            .collect();
        due.sort();

        Ok(due
            .into_iter()
            .take(limit)
            .map(|(_, granter, grantee)| (granter, grantee))
            .collect())
    }
}
