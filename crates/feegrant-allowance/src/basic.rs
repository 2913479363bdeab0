//! Flat allowance: an absolute spend cap plus an optional hard deadline.

use serde::{Deserialize, Serialize};

use feegrant_core::{Coins, Timestamp};

use crate::error::{AcceptError, InvalidAllowance};

/// A one-shot budget that shrinks with every accepted fee.
///
/// `spend_limit = None` means unlimited; `expiration = None` means the grant
/// never expires on its own.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasicAllowance {
    /// What is left to spend, if capped.
    pub spend_limit: Option<Coins>,

    /// The instant from which the grant is dead.
    pub expiration: Option<Timestamp>,
}

impl BasicAllowance {
    /// Create an allowance with the given cap and deadline.
    pub fn new(spend_limit: Option<Coins>, expiration: Option<Timestamp>) -> Self {
        Self {
            spend_limit,
            expiration,
        }
    }

    /// An allowance with no cap and no deadline.
    pub fn unlimited() -> Self {
        Self::default()
    }

    /// An allowance capped at `limit` with no deadline.
    pub fn with_spend_limit(limit: Coins) -> Self {
        Self {
            spend_limit: Some(limit),
            expiration: None,
        }
    }

    /// Add a deadline to this allowance.
    pub fn with_expiration(mut self, expiration: Timestamp) -> Self {
        self.expiration = Some(expiration);
        self
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), InvalidAllowance> {
        if let Some(ref limit) = self.spend_limit {
            limit.validate()?;
            if !limit.is_all_positive() {
                return Err(InvalidAllowance::SpendLimitNotPositive);
            }
        }

        // Malformed or default timestamps, not "already expired".
        if let Some(expiration) = self.expiration {
            if expiration.as_unix_seconds() <= 0 {
                return Err(InvalidAllowance::ExpirationNotPositive(expiration));
            }
        }

        Ok(())
    }

    /// The deadline, if `now` has reached it.
    pub fn expired_at(&self, now: Timestamp) -> Option<Timestamp> {
        self.expiration.filter(|expiration| now >= *expiration)
    }

    /// Try to pay `fee` at `now`.
    ///
    /// Returns `Ok(true)` when the allowance is used up and must be deleted,
    /// `Ok(false)` when it should be stored again. An expired allowance
    /// yields [`AcceptError::Expired`], which also means delete. Any other
    /// error leaves `self` unchanged.
    pub fn accept(&mut self, now: Timestamp, fee: &Coins, _msgs: &[&str]) -> Result<bool, AcceptError> {
        if let Some(expiration) = self.expired_at(now) {
            return Err(AcceptError::Expired { expiration });
        }

        let Some(ref limit) = self.spend_limit else {
            return Ok(false);
        };

        let left = limit
            .safe_sub(fee)
            .ok_or_else(|| AcceptError::FeeExceedsLimit {
                fee: fee.clone(),
                limit: limit.clone(),
            })?;

        let exhausted = left.is_zero();
        self.spend_limit = Some(left);
        Ok(exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOW: Timestamp = Timestamp(1_700_000_000_000);
    const HOUR_MS: i64 = 3_600_000;

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    struct Case {
        name: &'static str,
        allowance: BasicAllowance,
        fee: Coins,
        now: Timestamp,
        accept: bool,
        remove: bool,
        remains: Option<Coins>,
    }

    #[test]
    fn test_accept_table() {
        let one_hour = Timestamp(NOW.0 + HOUR_MS);

        let cases = vec![
            Case {
                name: "empty",
                allowance: BasicAllowance::unlimited(),
                fee: Coins::empty(),
                now: NOW,
                accept: true,
                remove: false,
                remains: None,
            },
            Case {
                name: "small fee without expire",
                allowance: BasicAllowance::with_spend_limit(coins("555bnkt")),
                fee: coins("43bnkt"),
                now: NOW,
                accept: true,
                remove: false,
                remains: Some(coins("512bnkt")),
            },
            Case {
                name: "all fee without expire",
                allowance: BasicAllowance::with_spend_limit(coins("43bnkt")),
                fee: coins("43bnkt"),
                now: NOW,
                accept: true,
                remove: true,
                remains: None,
            },
            Case {
                name: "wrong fee",
                allowance: BasicAllowance::with_spend_limit(coins("43bnkt")),
                fee: coins("10eth"),
                now: NOW,
                accept: false,
                remove: false,
                remains: None,
            },
            Case {
                name: "non-expired",
                allowance: BasicAllowance::with_spend_limit(coins("555bnkt"))
                    .with_expiration(one_hour),
                fee: coins("43bnkt"),
                now: NOW,
                accept: true,
                remove: false,
                remains: Some(coins("512bnkt")),
            },
            Case {
                name: "expired",
                allowance: BasicAllowance::with_spend_limit(coins("555bnkt")).with_expiration(NOW),
                fee: coins("43bnkt"),
                now: one_hour,
                accept: false,
                remove: true,
                remains: None,
            },
            Case {
                name: "fee more than allowed",
                allowance: BasicAllowance::with_spend_limit(coins("555bnkt"))
                    .with_expiration(one_hour),
                fee: coins("1000bnkt"),
                now: NOW,
                accept: false,
                remove: false,
                remains: None,
            },
            Case {
                name: "with out spend limit",
                allowance: BasicAllowance::unlimited().with_expiration(one_hour),
                fee: coins("1000bnkt"),
                now: NOW,
                accept: true,
                remove: false,
                remains: None,
            },
            Case {
                name: "expired no spend limit",
                allowance: BasicAllowance::unlimited().with_expiration(NOW),
                fee: coins("1000bnkt"),
                now: one_hour,
                accept: false,
                remove: true,
                remains: None,
            },
        ];

        for mut case in cases {
            case.allowance.validate().unwrap();
            let before = case.allowance.clone();

            match case.allowance.accept(case.now, &case.fee, &[]) {
                Ok(removed) => {
                    assert!(case.accept, "{}: unexpectedly accepted", case.name);
                    assert_eq!(removed, case.remove, "{}", case.name);
                    if !removed {
                        assert_eq!(case.allowance.spend_limit, case.remains, "{}", case.name);
                    }
                }
                Err(err) => {
                    assert!(!case.accept, "{}: unexpectedly rejected: {}", case.name, err);
                    assert_eq!(err.removes_grant(), case.remove, "{}", case.name);
                    assert_eq!(case.allowance, before, "{}: mutated on error", case.name);
                }
            }
        }
    }

    #[test]
    fn test_expiration_boundary() {
        let mut allowance = BasicAllowance::with_spend_limit(coins("100bnkt")).with_expiration(NOW);

        let before = Timestamp(NOW.0 - 1);
        assert_eq!(allowance.accept(before, &coins("1bnkt"), &[]), Ok(false));

        let err = allowance.accept(NOW, &coins("1bnkt"), &[]).unwrap_err();
        assert_eq!(err, AcceptError::Expired { expiration: NOW });
        assert!(err.removes_grant());
    }

    #[test]
    fn test_expired_after_one_hour() {
        let mut allowance = BasicAllowance::with_spend_limit(coins("555bnkt")).with_expiration(NOW);
        let err = allowance
            .accept(Timestamp(NOW.0 + HOUR_MS), &coins("43bnkt"), &[])
            .unwrap_err();
        assert!(matches!(err, AcceptError::Expired { .. }));
        assert!(err.removes_grant());
    }

    #[test]
    fn test_validate_rejects_bad_expiration() {
        let bad = BasicAllowance::unlimited().with_expiration(Timestamp(-86_400_000));
        assert_eq!(
            bad.validate(),
            Err(InvalidAllowance::ExpirationNotPositive(Timestamp(-86_400_000)))
        );
        assert!(BasicAllowance::unlimited()
            .with_expiration(Timestamp::ZERO)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rejects_empty_limit() {
        let bad = BasicAllowance::with_spend_limit(Coins::empty());
        assert_eq!(bad.validate(), Err(InvalidAllowance::SpendLimitNotPositive));
    }

    #[test]
    fn test_validate_is_idempotent() {
        let allowance = BasicAllowance::with_spend_limit(coins("5bnkt")).with_expiration(NOW);
        assert_eq!(allowance.validate(), allowance.validate());

        let bad = BasicAllowance::with_spend_limit(Coins::empty());
        assert_eq!(bad.validate(), bad.validate());
    }
}
