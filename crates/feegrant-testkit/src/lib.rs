//! # Fee Grant Testkit
//!
//! Testing utilities for fee grants.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for coins, instants, periods and
//!   valid allowances
//! - **Fixtures**: A keeper over an in-memory store with fixed parties and
//!   a fixed clock
//!
//! ## Property Testing
//!
//! Use the generators with proptest:
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use feegrant_testkit::generators::basic_allowance;
//!
//! proptest! {
//!     #[test]
//!     fn validate_is_pure(allowance in basic_allowance()) {
//!         let before = allowance.clone();
//!         prop_assert!(allowance.validate().is_ok());
//!         prop_assert_eq!(allowance, before);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! Quickly set up test scenarios:
//!
//! ```rust
//! use feegrant_testkit::fixtures::TestFixture;
//!
//! let fixture = TestFixture::new();
//! assert_ne!(fixture.granter, fixture.grantee);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{address, coins, multi_party_fixtures, TestFixture};
pub use generators::{basic_allowance, periodic_allowance, FeeSchedule};
