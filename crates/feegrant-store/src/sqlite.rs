//! SQLite implementation of the GrantStore trait.
//!
//! This is the primary storage backend. It uses rusqlite with bundled
//! SQLite, wrapped in async via tokio::spawn_blocking.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rusqlite::{params, Connection, OptionalExtension};

use feegrant_allowance::Grant;
use feegrant_core::{Address, Timestamp};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::GrantStore;

/// SQLite-based store implementation.
///
/// Thread-safe via internal Mutex. All operations use spawn_blocking
/// to avoid blocking the async runtime.
pub struct SqliteStore {
    /// The SQLite connection, protected by a mutex.
    conn: Arc<Mutex<Connection>>,
}

impl SqliteStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Run `f` against the connection on the blocking thread pool.
    async fn blocking<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| StoreError::LockPoisoned)?;
            f(&conn)
        })
        .await
        .map_err(|e| StoreError::Task(e.to_string()))?
    }
}

// Helper to turn a key column back into an Address
fn address_from_blob(column: &str, bytes: &[u8]) -> Result<Address> {
    Address::try_from(bytes).map_err(|_| {
        StoreError::InvalidData(format!("{} is {} bytes, expected 32", column, bytes.len()))
    })
}

// Helper to decode a batch of grant blobs
fn decode_grants(blobs: Vec<Vec<u8>>) -> Result<Vec<Grant>> {
    blobs
        .iter()
        .map(|blob| Grant::from_bytes(blob).map_err(StoreError::from))
        .collect()
}

#[async_trait]
impl GrantStore for SqliteStore {
    async fn get_grant(&self, granter: &Address, grantee: &Address) -> Result<Option<Grant>> {
        let (granter, grantee) = (*granter, *grantee);

        self.blocking(move |conn| {
            let blob: Option<Vec<u8>> = conn
                .query_row(
                    "SELECT grant_cbor FROM grants WHERE granter = ?1 AND grantee = ?2",
                    params![granter.as_bytes().as_slice(), grantee.as_bytes().as_slice()],
                    |row| row.get(0),
                )
                .optional()?;

            blob.map(|b| Grant::from_bytes(&b).map_err(StoreError::from))
                .transpose()
        })
        .await
    }

    async fn put_grant(&self, grant: &Grant) -> Result<()> {
        let blob = grant.to_bytes()?;
        let (granter, grantee) = (grant.granter, grant.grantee);
        let expiration = grant.expiration().map(|t| t.as_unix_millis());

        self.blocking(move |conn| {
            conn.execute(
                "INSERT INTO grants (granter, grantee, grant_cbor, expiration, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(granter, grantee) DO UPDATE SET
                    grant_cbor = excluded.grant_cbor,
                    expiration = excluded.expiration,
                    updated_at = excluded.updated_at",
                params![
                    granter.as_bytes().as_slice(),
                    grantee.as_bytes().as_slice(),
                    blob,
                    expiration,
                    now_millis(),
                ],
            )?;

            tracing::debug!(%granter, %grantee, "stored fee grant");
            Ok(())
        })
        .await
    }

    async fn delete_grant(&self, granter: &Address, grantee: &Address) -> Result<bool> {
        let (granter, grantee) = (*granter, *grantee);

        self.blocking(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM grants WHERE granter = ?1 AND grantee = ?2",
                params![granter.as_bytes().as_slice(), grantee.as_bytes().as_slice()],
            )?;

            if deleted > 0 {
                tracing::debug!(%granter, %grantee, "deleted fee grant");
            }
            Ok(deleted > 0)
        })
        .await
    }

    async fn grants_by_grantee(&self, grantee: &Address) -> Result<Vec<Grant>> {
        let grantee = *grantee;

        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT grant_cbor FROM grants WHERE grantee = ?1 ORDER BY granter",
            )?;
            let blobs = stmt
                .query_map(params![grantee.as_bytes().as_slice()], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<Vec<u8>>>>()?;

            decode_grants(blobs)
        })
        .await
    }

    async fn grants_by_granter(&self, granter: &Address) -> Result<Vec<Grant>> {
        let granter = *granter;

        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT grant_cbor FROM grants WHERE granter = ?1 ORDER BY grantee",
            )?;
            let blobs = stmt
                .query_map(params![granter.as_bytes().as_slice()], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<Vec<u8>>>>()?;

            decode_grants(blobs)
        })
        .await
    }

    async fn expired_grants(&self, now: Timestamp, limit: usize) -> Result<Vec<(Address, Address)>> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);

        self.blocking(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT granter, grantee FROM grants
                 WHERE expiration IS NOT NULL AND expiration <= ?1
                 ORDER BY expiration, granter, grantee
                 LIMIT ?2",
            )?;
            let rows = stmt
                .query_map(params![now.as_unix_millis(), limit], |row| {
                    Ok((row.get::<_, Vec<u8>>(0)?, row.get::<_, Vec<u8>>(1)?))
                })?
                .collect::<rusqlite::Result<Vec<_>>>()?;

            rows.iter()
                .map(|(granter, grantee)| {
                    Ok((
                        address_from_blob("granter", granter)?,
                        address_from_blob("grantee", grantee)?,
                    ))
                })
                .collect()
        })
        .await
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}
