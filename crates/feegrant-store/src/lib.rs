//! # Fee Grant Store
//!
//! Storage abstraction for fee grants. Provides a trait-based interface
//! for grant persistence with SQLite and in-memory implementations.
//!
//! ## Overview
//!
//! The allowance engine never persists anything itself. The driver that
//! calls it loads a grant, runs `accept`, and writes back or deletes the
//! result through the [`GrantStore`] trait. The primary implementation is
//! [`SqliteStore`], with [`MemoryStore`] for testing.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feegrant_store::{GrantStore, SqliteStore};
//!
//! async fn example() {
//!     // Open a SQLite database
//!     let store = SqliteStore::open("grants.db").unwrap();
//!
//!     // Or use an in-memory database for testing
//!     let store = SqliteStore::open_memory().unwrap();
//!
//!     // let grant: Grant = ...;
//!     // store.put_grant(&grant).await.unwrap();
//! }
//! ```
//!
//! ## Design Notes
//!
//! - **One grant per pair**: `put_grant` overwrites the grant for the same
//!   (granter, grantee)
//! - **Opaque records**: grants are stored as CBOR; only the key and the
//!   expiration are lifted into columns
//! - **Pruning queue**: `expired_grants` walks grants by expiration

pub mod error;
pub mod memory;
pub mod migration;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use memory::MemoryStore;
pub use sqlite::SqliteStore;
pub use traits::GrantStore;
