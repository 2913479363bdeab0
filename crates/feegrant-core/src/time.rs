//! Caller-supplied time.
//!
//! Nothing in the fee grant crates reads a wall clock. The current time is
//! always passed in, which keeps every decision replayable.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// A point in time as Unix milliseconds.
///
/// [`Timestamp::ZERO`] doubles as the "unset" sentinel.
#[derive(Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp(pub i64);

impl Timestamp {
    /// The zero timestamp (used as a sentinel for "never set").
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from Unix milliseconds.
    pub const fn from_unix_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// Unix milliseconds.
    pub const fn as_unix_millis(&self) -> i64 {
        self.0
    }

    /// Whole Unix seconds, rounded towards negative infinity.
    pub const fn as_unix_seconds(&self) -> i64 {
        self.0.div_euclid(1000)
    }

    /// Whether this is the unset sentinel.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Add a duration, saturating at the largest representable instant.
    pub fn saturating_add(self, duration: Duration) -> Self {
        Self(self.0.saturating_add(duration_millis(duration)))
    }

    /// Subtract a duration, saturating at the smallest representable instant.
    pub fn saturating_sub(self, duration: Duration) -> Self {
        Self(self.0.saturating_sub(duration_millis(duration)))
    }

    /// The first instant on this timestamp's `period` grid that is strictly
    /// after `now`.
    ///
    /// Equivalent to adding `period` to `self` until the result exceeds
    /// `now`, computed in constant time. Returns `self` unchanged when it is
    /// already after `now` or when `period` is shorter than a millisecond.
    pub fn next_boundary_after(self, now: Timestamp, period: Duration) -> Self {
        let step = i128::from(duration_millis(period));
        if self > now || step == 0 {
            return self;
        }
        let elapsed = i128::from(now.0) - i128::from(self.0);
        let steps = elapsed / step + 1;
        let next = i128::from(self.0) + steps * step;
        Self(i64::try_from(next).unwrap_or(i64::MAX))
    }
}

/// Milliseconds in a duration, clamped to `i64::MAX`.
pub(crate) fn duration_millis(duration: Duration) -> i64 {
    i64::try_from(duration.as_millis()).unwrap_or(i64::MAX)
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

impl From<i64> for Timestamp {
    fn from(millis: i64) -> Self {
        Self(millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const MINUTE: Duration = Duration::from_secs(60);

    #[test]
    fn test_unix_seconds_floor() {
        assert_eq!(Timestamp(1_999).as_unix_seconds(), 1);
        assert_eq!(Timestamp(999).as_unix_seconds(), 0);
        assert_eq!(Timestamp(-1).as_unix_seconds(), -1);
    }

    #[test]
    fn test_saturating_add() {
        assert_eq!(Timestamp(1_000).saturating_add(MINUTE), Timestamp(61_000));
        assert_eq!(
            Timestamp(i64::MAX - 5).saturating_add(MINUTE),
            Timestamp(i64::MAX)
        );
    }

    #[test]
    fn test_next_boundary_exactly_on_boundary() {
        let anchor = Timestamp(0);
        assert_eq!(
            anchor.next_boundary_after(Timestamp(600_000), 10 * MINUTE),
            Timestamp(1_200_000)
        );
    }

    #[test]
    fn test_next_boundary_future_anchor_unchanged() {
        let anchor = Timestamp(5_000);
        assert_eq!(anchor.next_boundary_after(Timestamp(4_999), MINUTE), anchor);
    }

    #[test]
    fn test_next_boundary_clamps_instead_of_overflowing() {
        let anchor = Timestamp(i64::MAX - 10);
        assert_eq!(
            anchor.next_boundary_after(Timestamp(i64::MAX - 1), MINUTE),
            Timestamp(i64::MAX)
        );
    }

    proptest! {
        #[test]
        fn test_next_boundary_matches_repeated_addition(
            anchor in 1i64..1_000_000,
            period_ms in 1u64..10_000,
            offset in 0i64..200_000,
        ) {
            let period = Duration::from_millis(period_ms);
            let now = Timestamp(anchor + offset);

            let mut naive = Timestamp(anchor);
            while naive <= now {
                naive = naive.saturating_add(period);
            }

            prop_assert_eq!(Timestamp(anchor).next_boundary_after(now, period), naive);
        }
    }
}
