//! Test fixtures and helpers.
//!
//! Common setup code for integration tests.

use std::time::Duration;

use feegrant::{Keeper, KeeperConfig, Result, UseResult};
use feegrant_allowance::Allowance;
use feegrant_core::{Address, Coins, Timestamp};
use feegrant_store::MemoryStore;

/// Instant every fixture starts at: 2023-11-14T22:13:20Z.
pub const GENESIS: Timestamp = Timestamp(1_700_000_000_000);

/// Deterministic address from a one-byte seed.
pub fn address(seed: u8) -> Address {
    Address::from_bytes([seed; 32])
}

/// Parse a coin set such as `"10atom,555bnkt"`.
///
/// Panics on malformed input.
pub fn coins(s: &str) -> Coins {
    s.parse()
        .unwrap_or_else(|e| panic!("bad coin literal {:?}: {}", s, e))
}

/// A keeper over a memory store, with one granter/grantee pair.
pub struct TestFixture {
    pub keeper: Keeper<MemoryStore>,
    pub granter: Address,
    pub grantee: Address,
    pub genesis: Timestamp,
}

impl TestFixture {
    /// Create a new fixture with the default configuration.
    pub fn new() -> Self {
        Self::with_config(KeeperConfig::default())
    }

    /// Create with the given keeper configuration.
    pub fn with_config(config: KeeperConfig) -> Self {
        Self::with_parties(address(1), address(2), config)
    }

    fn with_parties(granter: Address, grantee: Address, config: KeeperConfig) -> Self {
        Self {
            keeper: Keeper::new(MemoryStore::new(), config),
            granter,
            grantee,
            genesis: GENESIS,
        }
    }

    /// The instant `offset` after genesis.
    pub fn at(&self, offset: Duration) -> Timestamp {
        self.genesis.saturating_add(offset)
    }

    /// Grant `allowance` from the fixture granter to the grantee at genesis.
    pub async fn grant(&self, allowance: impl Into<Allowance>) -> Result<()> {
        self.keeper
            .grant_allowance(self.granter, self.grantee, allowance, self.genesis)
            .await
    }

    /// Charge `fee` to the grant, `offset` after genesis.
    pub async fn pay(&self, fee: &str, offset: Duration) -> Result<UseResult> {
        self.keeper
            .use_grant_allowance(self.granter, self.grantee, &coins(fee), &[], self.at(offset))
            .await
    }

    /// The stored allowance of the fixture pair.
    pub async fn current(&self) -> Result<Option<Allowance>> {
        self.keeper.allowance(&self.granter, &self.grantee).await
    }
}

impl Default for TestFixture {
    fn default() -> Self {
        Self::new()
    }
}

/// Create fixtures for multi-party tests.
///
/// Fixture `i` pairs granter `2i + 1` with grantee `2i + 2`, each with its
/// own store.
pub fn multi_party_fixtures(count: usize) -> Vec<TestFixture> {
    (0..count)
        .map(|i| {
            let base = (i * 2) as u8;
            TestFixture::with_parties(
                address(base.wrapping_add(1)),
                address(base.wrapping_add(2)),
                KeeperConfig::default(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use feegrant::KeeperError;
    use feegrant_allowance::{BasicAllowance, PeriodicAllowance};

    const MINUTE: Duration = Duration::from_secs(60);

    #[tokio::test]
    async fn test_fixture_pays_and_persists() {
        let fixture = TestFixture::new();
        fixture
            .grant(BasicAllowance::with_spend_limit(coins("555bnkt")))
            .await
            .unwrap();

        assert_eq!(fixture.pay("43bnkt", MINUTE).await.unwrap(), UseResult::Retained);
        assert_eq!(
            fixture.current().await.unwrap(),
            Some(BasicAllowance::with_spend_limit(coins("512bnkt")).into())
        );
    }

    #[tokio::test]
    async fn test_fixture_periodic_lifecycle() {
        let fixture = TestFixture::new();
        fixture
            .grant(PeriodicAllowance::new(
                BasicAllowance::with_spend_limit(coins("20bnkt")),
                10 * MINUTE,
                Some(coins("15bnkt")),
            ))
            .await
            .unwrap();

        fixture.pay("15bnkt", Duration::ZERO).await.unwrap();
        assert!(matches!(
            fixture.pay("1bnkt", MINUTE).await,
            Err(KeeperError::Rejected(_))
        ));
        assert_eq!(
            fixture.pay("5bnkt", 10 * MINUTE).await.unwrap(),
            UseResult::Removed
        );
        assert_eq!(fixture.current().await.unwrap(), None);
    }

    #[test]
    fn test_multi_party_addresses_are_distinct() {
        let fixtures = multi_party_fixtures(3);
        let mut all: Vec<Address> = fixtures
            .iter()
            .flat_map(|f| [f.granter, f.grantee])
            .collect();
        all.sort();
        all.dedup();
        assert_eq!(all.len(), 6);
    }
}
