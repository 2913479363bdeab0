//! # Fee Grants
//!
//! Let one account (the granter) pay another account's (the grantee's)
//! transaction fees, within a bounded allowance.
//!
//! ## Overview
//!
//! - **Allowances**: flat caps with deadlines, periodic budgets that refill
//!   on a fixed grid, and message-filtered wrappers
//! - **Store**: grant persistence behind an async trait, SQLite or in-memory
//! - **Keeper**: the lifecycle driver that grants, revokes, charges and
//!   prunes
//!
//! ## Key Concepts
//!
//! - **Grant**: at most one allowance per (granter, grantee) pair.
//! - **Exhausted**: a grant that can never pay again. The keeper deletes it.
//! - **Rejection**: a refused fee never changes the stored grant, except
//!   that an expired grant is deleted.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use feegrant::{Keeper, KeeperConfig};
//! use feegrant::allowance::BasicAllowance;
//! use feegrant::core::{Address, Coins, Timestamp};
//! use feegrant::store::SqliteStore;
//!
//! async fn example() {
//!     let store = SqliteStore::open("grants.db").unwrap();
//!     let keeper = Keeper::new(store, KeeperConfig::default());
//!
//!     let granter = Address::from_bytes([1; 32]);
//!     let grantee = Address::from_bytes([2; 32]);
//!     let now = Timestamp::from_unix_millis(1_700_000_000_000);
//!
//!     let limit: Coins = "555bnkt".parse().unwrap();
//!     keeper
//!         .grant_allowance(granter, grantee, BasicAllowance::with_spend_limit(limit), now)
//!         .await
//!         .unwrap();
//!
//!     let fee: Coins = "43bnkt".parse().unwrap();
//!     keeper
//!         .use_grant_allowance(granter, grantee, &fee, &["/cosmos.bank.v1beta1.MsgSend"], now)
//!         .await
//!         .unwrap();
//! }
//! ```
//!
//! ## Re-exports
//!
//! This crate re-exports the component crates for convenience:
//!
//! - `feegrant::core` - Primitives (Coins, Address, Timestamp)
//! - `feegrant::allowance` - Allowance kinds and the accept engine
//! - `feegrant::store` - Storage abstraction and SQLite

pub mod error;
pub mod keeper;

// Re-export component crates
pub use feegrant_allowance as allowance;
pub use feegrant_core as core;
pub use feegrant_store as store;

// Re-export main types for convenience
pub use error::{KeeperError, Result};
pub use keeper::{Keeper, KeeperConfig, UseResult};

// Re-export commonly used types
pub use feegrant_allowance::{
    AcceptError, Allowance, AllowedMsgAllowance, BasicAllowance, Grant, InvalidAllowance,
    PeriodicAllowance,
};
pub use feegrant_core::{Address, Coin, Coins, Timestamp};
