//! # Fee Grant Core
//!
//! Pure primitives shared by the fee-grant crates: coin sets, timestamps and
//! account addresses.
//!
//! This crate contains no I/O, no storage and no clock. Every function is a
//! deterministic computation over its arguments.
//!
//! ## Key Types
//!
//! - [`Coin`] - A single (denomination, amount) pair
//! - [`Coins`] - A sorted set of coins with unique denominations and no zero entries
//! - [`Timestamp`] - Unix milliseconds, supplied by the caller
//! - [`Address`] - A 32-byte account identifier

pub mod coins;
pub mod error;
pub mod time;
pub mod types;

pub use coins::{validate_denom, Coin, Coins};
pub use error::{CoinsError, Result};
pub use time::Timestamp;
pub use types::Address;
