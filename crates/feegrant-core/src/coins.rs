//! Coin sets: the currency unit of every fee and limit.
//!
//! A [`Coins`] value always holds its invariants: denominations are valid,
//! unique and sorted, and no entry carries a zero amount. The constructor
//! and the serde path enforce them, so arithmetic never has to re-check.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::error::{CoinsError, Result};

/// Minimum denomination length.
pub const MIN_DENOM_LEN: usize = 3;

/// Maximum denomination length.
pub const MAX_DENOM_LEN: usize = 128;

/// Check a denomination string.
///
/// A denomination starts with an ASCII letter, followed by 2 to 127 ASCII
/// alphanumerics or any of `/ : . _ -`.
pub fn validate_denom(denom: &str) -> Result<()> {
    let mut chars = denom.chars();
    let first_ok = chars.next().is_some_and(|c| c.is_ascii_alphabetic());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || "/:._-".contains(c));
    let len_ok = (MIN_DENOM_LEN..=MAX_DENOM_LEN).contains(&denom.len());

    if first_ok && rest_ok && len_ok {
        Ok(())
    } else {
        Err(CoinsError::InvalidDenom(denom.to_string()))
    }
}

/// A single denomination-tagged amount.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coin {
    /// The denomination, e.g. `"bnkt"`.
    pub denom: String,
    /// The non-negative quantity.
    pub amount: u128,
}

impl Coin {
    /// Create a coin. Validation happens when it joins a [`Coins`] set.
    pub fn new(denom: impl Into<String>, amount: u128) -> Self {
        Self {
            denom: denom.into(),
            amount,
        }
    }

    /// Check the denomination of this coin.
    pub fn validate(&self) -> Result<()> {
        validate_denom(&self.denom)
    }

    /// Whether the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }
}

impl fmt::Display for Coin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.amount, self.denom)
    }
}

impl FromStr for Coin {
    type Err = CoinsError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s
            .find(|c: char| !c.is_ascii_digit())
            .ok_or_else(|| CoinsError::Parse(s.to_string()))?;
        let (amount, denom) = s.split_at(split);
        let amount = amount
            .parse::<u128>()
            .map_err(|_| CoinsError::Parse(s.to_string()))?;
        validate_denom(denom)?;
        Ok(Coin::new(denom, amount))
    }
}

/// A set of coins with unique denominations.
///
/// The empty set means "no coins". Where a limit may be absent, callers use
/// `Option<Coins>` with `None` for "unlimited".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "Vec<Coin>", into = "Vec<Coin>")]
pub struct Coins(Vec<Coin>);

impl Coins {
    /// Build a coin set from arbitrary coins.
    ///
    /// Zero entries are dropped and the result is sorted. Invalid or
    /// duplicate denominations are rejected.
    pub fn new(coins: Vec<Coin>) -> Result<Self> {
        let mut coins: Vec<Coin> = coins.into_iter().filter(|c| !c.is_zero()).collect();
        for coin in &coins {
            coin.validate()?;
        }
        coins.sort_by(|a, b| a.denom.cmp(&b.denom));
        if let Some(pair) = coins.windows(2).find(|w| w[0].denom == w[1].denom) {
            return Err(CoinsError::DuplicateDenom(pair[0].denom.clone()));
        }
        Ok(Self(coins))
    }

    /// The empty coin set.
    pub fn empty() -> Self {
        Self(Vec::new())
    }

    /// A coin set holding a single denomination.
    pub fn single(denom: impl Into<String>, amount: u128) -> Result<Self> {
        Self::new(vec![Coin::new(denom, amount)])
    }

    /// Check the set invariants.
    ///
    /// Always `Ok` for values built through [`Coins::new`] or deserialized;
    /// kept for callers validating structures end to end.
    pub fn validate(&self) -> Result<()> {
        for coin in &self.0 {
            coin.validate()?;
            if coin.is_zero() {
                return Err(CoinsError::ZeroAmount(coin.denom.clone()));
            }
        }
        for pair in self.0.windows(2) {
            match pair[0].denom.cmp(&pair[1].denom) {
                Ordering::Less => {}
                Ordering::Equal => return Err(CoinsError::DuplicateDenom(pair[0].denom.clone())),
                Ordering::Greater => {
                    return Err(CoinsError::Unsorted(
                        pair[1].denom.clone(),
                        pair[0].denom.clone(),
                    ))
                }
            }
        }
        Ok(())
    }

    /// Whether the set holds no coins.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether every amount is zero. Since zero entries are never kept this
    /// is the same as [`Coins::is_empty`].
    pub fn is_zero(&self) -> bool {
        self.0.iter().all(Coin::is_zero)
    }

    /// Whether the set is non-empty with every amount strictly positive.
    pub fn is_all_positive(&self) -> bool {
        !self.0.is_empty() && self.0.iter().all(|c| c.amount > 0)
    }

    /// Number of denominations.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate the coins in denomination order.
    pub fn iter(&self) -> std::slice::Iter<'_, Coin> {
        self.0.iter()
    }

    /// The denominations in order.
    pub fn denoms(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|c| c.denom.as_str())
    }

    /// The amount held of `denom`, zero when absent.
    pub fn amount_of(&self, denom: &str) -> u128 {
        self.position(denom).map_or(0, |i| self.0[i].amount)
    }

    /// Whether both sets hold exactly the same denominations.
    pub fn same_denoms(&self, other: &Coins) -> bool {
        self.denoms().eq(other.denoms())
    }

    /// Subtract `other`, failing if any denomination would go negative.
    ///
    /// A denomination present in `other` but absent from `self` counts as
    /// going negative. `self` is left untouched either way.
    pub fn safe_sub(&self, other: &Coins) -> Option<Coins> {
        let mut result = self.0.clone();
        for coin in &other.0 {
            let i = self.position(&coin.denom)?;
            result[i].amount = result[i].amount.checked_sub(coin.amount)?;
        }
        result.retain(|c| !c.is_zero());
        Some(Coins(result))
    }

    /// Add `other`, failing on overflow in any denomination.
    pub fn checked_add(&self, other: &Coins) -> Result<Coins> {
        let mut result = self.0.clone();
        for coin in &other.0 {
            match self.position(&coin.denom) {
                Some(i) => {
                    result[i].amount = result[i]
                        .amount
                        .checked_add(coin.amount)
                        .ok_or_else(|| CoinsError::Overflow(coin.denom.clone()))?;
                }
                None => result.push(coin.clone()),
            }
        }
        result.sort_by(|a, b| a.denom.cmp(&b.denom));
        Ok(Coins(result))
    }

    /// Per-denomination minimum of `self` and `other`, over the
    /// denominations of `self`. Denominations missing from `other` drop out.
    pub fn min_each(&self, other: &Coins) -> Coins {
        let coins = self
            .0
            .iter()
            .map(|c| Coin::new(c.denom.clone(), c.amount.min(other.amount_of(&c.denom))))
            .filter(|c| !c.is_zero())
            .collect();
        Coins(coins)
    }

    fn position(&self, denom: &str) -> Option<usize> {
        self.0
            .binary_search_by(|c| c.denom.as_str().cmp(denom))
            .ok()
    }
}

impl TryFrom<Vec<Coin>> for Coins {
    type Error = CoinsError;

    fn try_from(coins: Vec<Coin>) -> Result<Self> {
        let coins = Coins(coins);
        coins.validate()?;
        Ok(coins)
    }
}

impl From<Coins> for Vec<Coin> {
    fn from(coins: Coins) -> Self {
        coins.0
    }
}

impl<'a> IntoIterator for &'a Coins {
    type Item = &'a Coin;
    type IntoIter = std::slice::Iter<'a, Coin>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, coin) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{}", coin)?;
        }
        Ok(())
    }
}

impl FromStr for Coins {
    type Err = CoinsError;

    /// Parse `"43bnkt,10eth"`. The empty string is the empty set.
    fn from_str(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Ok(Coins::empty());
        }
        let coins = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<Coin>>>()?;
        Coins::new(coins)
    }
}
