//! The Keeper: lifecycle driver for fee grants.
//!
//! The Keeper is the only component that loads, runs and persists
//! allowances. It applies the caller contract of
//! [`Allowance::accept`](feegrant_allowance::Allowance::accept): store on
//! success, delete on exhaustion or expiry, leave untouched on rejection.

use tokio::sync::Mutex;

use feegrant_allowance::{Allowance, Grant};
use feegrant_core::{Address, Coins, Timestamp};
use feegrant_store::GrantStore;

use crate::error::{KeeperError, Result};

/// Configuration for the Keeper.
#[derive(Debug, Clone)]
pub struct KeeperConfig {
    /// Refuse new grants whose expiration is not after the grant time.
    pub reject_expired_on_grant: bool,
    /// Maximum number of expired grants removed per `prune_expired` call.
    pub prune_limit: usize,
}

impl Default for KeeperConfig {
    fn default() -> Self {
        Self {
            reject_expired_on_grant: true,
            prune_limit: 200,
        }
    }
}

/// What happened to a grant that paid a fee.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UseResult {
    /// The fee was paid and the grant was stored with its new balance.
    Retained,
    /// The fee was paid and the grant is used up, so it was deleted.
    Removed,
}

/// The main Keeper struct.
///
/// Provides a unified API for:
/// - Granting and revoking fee allowances
/// - Paying fees from a grant
/// - Querying grants
/// - Pruning expired grants
pub struct Keeper<S: GrantStore> {
    /// The storage backend.
    store: S,
    /// Configuration.
    config: KeeperConfig,
    /// Serializes read-modify-write cycles on grants.
    write_lock: Mutex<()>,
}

impl<S: GrantStore> Keeper<S> {
    /// Create a new keeper.
    pub fn new(store: S, config: KeeperConfig) -> Self {
        Self {
            store,
            config,
            write_lock: Mutex::new(()),
        }
    }

    /// Get the store reference.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get the configuration.
    pub fn config(&self) -> &KeeperConfig {
        &self.config
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Grant Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Issue a new fee allowance from `granter` to `grantee`.
    pub async fn grant_allowance(
        &self,
        granter: Address,
        grantee: Address,
        allowance: impl Into<Allowance>,
        now: Timestamp,
    ) -> Result<()> {
        let grant = Grant::new(granter, grantee, allowance);
        grant.validate()?;

        if self.config.reject_expired_on_grant {
            if let Some(expiration) = grant.expiration().filter(|e| *e <= now) {
                return Err(KeeperError::ExpiredOnGrant { expiration, now });
            }
        }

        let _guard = self.write_lock.lock().await;

        if self.store.get_grant(&granter, &grantee).await?.is_some() {
            return Err(KeeperError::AlreadyExists { granter, grantee });
        }

        self.store.put_grant(&grant).await?;
        tracing::info!(
            %granter,
            %grantee,
            kind = grant.allowance.kind(),
            "fee allowance granted"
        );
        Ok(())
    }

    /// Remove the fee allowance from `granter` to `grantee`.
    pub async fn revoke_allowance(&self, granter: Address, grantee: Address) -> Result<()> {
        let _guard = self.write_lock.lock().await;

        if !self.store.delete_grant(&granter, &grantee).await? {
            return Err(KeeperError::NotFound { granter, grantee });
        }

        tracing::info!(%granter, %grantee, "fee allowance revoked");
        Ok(())
    }

    /// Pay `fee` for an attempt carrying `msgs` out of the grant from
    /// `granter` to `grantee`.
    ///
    /// On a rejected fee the stored grant is left exactly as it was, unless
    /// the grant has expired, in which case it is deleted.
    pub async fn use_grant_allowance(
        &self,
        granter: Address,
        grantee: Address,
        fee: &Coins,
        msgs: &[&str],
        now: Timestamp,
    ) -> Result<UseResult> {
        let _guard = self.write_lock.lock().await;

        let mut grant = self
            .store
            .get_grant(&granter, &grantee)
            .await?
            .ok_or(KeeperError::NotFound { granter, grantee })?;

        match grant.allowance.accept(now, fee, msgs) {
            Ok(false) => {
                self.store.put_grant(&grant).await?;
                tracing::debug!(%granter, %grantee, %fee, "fee paid from allowance");
                Ok(UseResult::Retained)
            }
            Ok(true) => {
                self.store.delete_grant(&granter, &grantee).await?;
                tracing::info!(%granter, %grantee, %fee, "fee allowance used up");
                Ok(UseResult::Removed)
            }
            Err(err) if err.removes_grant() => {
                self.store.delete_grant(&granter, &grantee).await?;
                tracing::warn!(%granter, %grantee, error = %err, "removed dead fee allowance");
                Err(err.into())
            }
            Err(err) => {
                tracing::debug!(%granter, %grantee, error = %err, "fee rejected by allowance");
                Err(err.into())
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// The allowance from `granter` to `grantee`, if any.
    pub async fn allowance(&self, granter: &Address, grantee: &Address) -> Result<Option<Allowance>> {
        Ok(self
            .store
            .get_grant(granter, grantee)
            .await?
            .map(|g| g.allowance))
    }

    /// Every grant `grantee` may draw on.
    pub async fn allowances(&self, grantee: &Address) -> Result<Vec<Grant>> {
        Ok(self.store.grants_by_grantee(grantee).await?)
    }

    /// Every grant `granter` has issued.
    pub async fn allowances_by_granter(&self, granter: &Address) -> Result<Vec<Grant>> {
        Ok(self.store.grants_by_granter(granter).await?)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Maintenance
    // ─────────────────────────────────────────────────────────────────────────

    /// Delete grants that have expired at `now`.
    ///
    /// Removes at most [`KeeperConfig::prune_limit`] grants and returns how
    /// many were removed.
    pub async fn prune_expired(&self, now: Timestamp) -> Result<usize> {
        let _guard = self.write_lock.lock().await;

        let due = self.store.expired_grants(now, self.config.prune_limit).await?;
        let mut removed = 0;
        for (granter, grantee) in &due {
            if self.store.delete_grant(granter, grantee).await? {
                removed += 1;
            }
        }

        if removed > 0 {
            tracing::info!(removed, %now, "pruned expired fee allowances");
        }
        Ok(removed)
    }
}
