//! # Fee Grant Allowances
//!
//! The accept/decrement engine behind fee grants.
//!
//! ## Overview
//!
//! A granter lets a grantee spend a bounded amount of the granter's tokens
//! on transaction fees. Each fee attempt calls [`Allowance::accept`], which
//! decides whether the grant covers the fee, shrinks what is left, and says
//! whether the grant is used up.
//!
//! ## Allowance Kinds
//!
//! - **Basic**: an absolute spend cap and an optional hard deadline
//! - **Periodic**: a basic allowance plus a budget that refills every period
//!   on a fixed grid
//! - **AllowedMsg**: any allowance, restricted to listed message type URLs
//!
//! ## Caller Contract
//!
//! The engine never persists, never reads a clock and never moves funds.
//! The caller passes the current time and owns the grant for the duration
//! of the call:
//!
//! | result                                  | caller action                  |
//! |-----------------------------------------|--------------------------------|
//! | `Ok(false)`                             | store the mutated allowance    |
//! | `Ok(true)`                              | delete the grant               |
//! | `Err(e)` where `e.removes_grant()`      | delete the grant, reject fee   |
//! | other `Err`                             | keep stored grant, reject fee  |
//!
//! ## Usage
//!
//! ```rust
//! use feegrant_allowance::{Allowance, BasicAllowance};
//! use feegrant_core::{Coins, Timestamp};
//!
//! let limit: Coins = "555bnkt".parse().unwrap();
//! let mut allowance = Allowance::from(BasicAllowance::with_spend_limit(limit));
//! allowance.validate().unwrap();
//!
//! let fee: Coins = "43bnkt".parse().unwrap();
//! let exhausted = allowance.accept(Timestamp(1_700_000_000_000), &fee, &[]).unwrap();
//! assert!(!exhausted);
//! ```

pub mod allowance;
pub mod basic;
pub mod error;
pub mod filtered;
pub mod grant;
pub mod periodic;

pub use allowance::Allowance;
pub use basic::BasicAllowance;
pub use error::{AcceptError, AllowanceError, InvalidAllowance, Result};
pub use filtered::AllowedMsgAllowance;
pub use grant::Grant;
pub use periodic::PeriodicAllowance;
