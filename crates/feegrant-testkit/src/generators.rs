//! Proptest generators for property-based testing.

use std::collections::BTreeMap;
use std::time::Duration;

use proptest::prelude::*;

use feegrant_allowance::{BasicAllowance, PeriodicAllowance};
use feegrant_core::{Address, Coin, Coins, Timestamp};

/// Generate a random Address.
pub fn address() -> impl Strategy<Value = Address> {
    any::<[u8; 32]>().prop_map(Address::from_bytes)
}

/// Generate a valid denomination.
pub fn denom() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{2,7}".prop_map(String::from)
}

/// Generate a positive amount.
pub fn amount() -> impl Strategy<Value = u128> {
    1u128..=1_000_000_000_000
}

/// Generate a valid, non-empty coin set with up to `max_denoms` entries.
pub fn coins(max_denoms: usize) -> impl Strategy<Value = Coins> {
    prop::collection::btree_map(denom(), amount(), 1..=max_denoms.max(1)).prop_map(from_map)
}

/// Generate a reasonable instant, well clear of the zero sentinel.
pub fn timestamp() -> impl Strategy<Value = Timestamp> {
    (1_000i64..=4_000_000_000_000).prop_map(Timestamp)
}

/// Generate a period between one millisecond and thirty days.
pub fn period() -> impl Strategy<Value = Duration> {
    (1u64..=30 * 24 * 3_600_000).prop_map(Duration::from_millis)
}

/// Generate a valid basic allowance.
pub fn basic_allowance() -> impl Strategy<Value = BasicAllowance> {
    (prop::option::of(coins(3)), prop::option::of(timestamp()))
        .prop_map(|(spend_limit, expiration)| BasicAllowance::new(spend_limit, expiration))
}

/// Generate a valid periodic allowance whose first window opens on first use.
///
/// The absolute and period limits share their denominations.
pub fn periodic_allowance() -> impl Strategy<Value = PeriodicAllowance> {
    (
        prop::collection::btree_map(denom(), (amount(), amount()), 1..=3),
        any::<bool>(),
        period(),
    )
        .prop_map(|(limits, capped, period)| {
            let period_limit = from_map(limits.iter().map(|(d, (p, _))| (d.clone(), *p)).collect());
            let total = from_map(limits.into_iter().map(|(d, (_, t))| (d, t)).collect());
            let basic = if capped {
                BasicAllowance::with_spend_limit(total)
            } else {
                BasicAllowance::unlimited()
            };
            PeriodicAllowance::new(basic, period, Some(period_limit))
        })
}

fn from_map(map: BTreeMap<String, u128>) -> Coins {
    let coins = map.into_iter().map(|(d, a)| Coin::new(d, a)).collect();
    // Keys are generated valid and distinct, amounts positive.
    Coins::new(coins).unwrap_or_else(|e| panic!("generator produced invalid coins: {}", e))
}

/// A single-denomination limit and a sequence of fees against it.
#[derive(Debug, Clone)]
pub struct FeeSchedule {
    pub limit: u128,
    pub fees: Vec<u128>,
}

impl Arbitrary for FeeSchedule {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        (1u128..=10_000, prop::collection::vec(1u128..=2_000, 0..32))
            .prop_map(|(limit, fees)| FeeSchedule { limit, fees })
            .boxed()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use feegrant_allowance::{AcceptError, Allowance};

    const DENOM: &str = "bnkt";

    fn fee(amount: u128) -> Coins {
        Coins::single(DENOM, amount).unwrap()
    }

    proptest! {
        #[test]
        fn test_flat_allowance_pays_at_most_its_limit(schedule: FeeSchedule) {
            let mut allowance = BasicAllowance::with_spend_limit(fee(schedule.limit));
            let mut paid = 0u128;

            for amount in &schedule.fees {
                let before = allowance.clone();
                match allowance.accept(Timestamp(1_000), &fee(*amount), &[]) {
                    Ok(exhausted) => {
                        paid += amount;
                        prop_assert_eq!(exhausted, paid == schedule.limit);
                        if exhausted {
                            break;
                        }
                    }
                    Err(err) => {
                        let is_limit = matches!(err, AcceptError::FeeExceedsLimit { .. });
                        prop_assert!(is_limit);
                        prop_assert_eq!(&allowance, &before);
                    }
                }
            }

            prop_assert!(paid <= schedule.limit);
            let left = allowance.spend_limit.as_ref().map(|l| l.amount_of(DENOM));
            prop_assert_eq!(left, Some(schedule.limit - paid));
        }

        #[test]
        fn test_balances_stay_well_formed(
            allowance in periodic_allowance(),
            start in timestamp(),
            steps in prop::collection::vec((0u64..=3_600_000, 1u128..=1_000_000_000_000), 1..16),
        ) {
            let denom = allowance
                .period_spend_limit
                .as_ref()
                .and_then(|l| l.denoms().next().map(String::from))
                .unwrap_or_else(|| DENOM.to_string());
            let mut allowance = Allowance::from(allowance);

            let mut now = start;
            for (gap, amount) in steps {
                now = now.saturating_add(Duration::from_millis(gap));
                let mut attempt = allowance.clone();
                let fee = Coins::single(denom.clone(), amount).unwrap();
                match attempt.accept(now, &fee, &[]) {
                    Ok(true) => break,
                    Ok(false) => allowance = attempt,
                    Err(_) => {}
                }

                let Allowance::Periodic(ref p) = allowance else {
                    unreachable!("kind never changes");
                };
                prop_assert!(p.period_can_spend.validate().is_ok());
                if let Some(total) = &p.basic.spend_limit {
                    prop_assert!(total.validate().is_ok());
                    prop_assert!(!total.is_zero());
                }
            }
        }

        #[test]
        fn test_validate_is_pure(allowance in basic_allowance(), periodic in periodic_allowance()) {
            let before = allowance.clone();
            prop_assert!(allowance.validate().is_ok());
            prop_assert!(allowance.validate().is_ok());
            prop_assert_eq!(&allowance, &before);

            let before = periodic.clone();
            prop_assert!(periodic.validate().is_ok());
            prop_assert_eq!(&periodic, &before);
        }

        #[test]
        fn test_expiration_boundary(deadline in timestamp(), offset in 1i64..=1_000_000) {
            let allowance = BasicAllowance::unlimited().with_expiration(deadline);

            let before = Timestamp(deadline.0 - offset.min(deadline.0 - 1));
            let mut early = allowance.clone();
            prop_assert_eq!(early.accept(before, &fee(1), &[]), Ok(false));

            for now in [deadline, Timestamp(deadline.0 + offset)] {
                let mut late = allowance.clone();
                let err = late.accept(now, &fee(1), &[]).unwrap_err();
                prop_assert!(err.removes_grant());
                prop_assert_eq!(err, AcceptError::Expired { expiration: deadline });
            }
        }

        #[test]
        fn test_period_reset_lands_on_grid(
            reset in timestamp(),
            period in period(),
            k in 0i64..=10_000,
            delta_frac in 0.0f64..1.0,
        ) {
            let p = period.as_millis() as i64;
            let delta = ((p as f64) * delta_frac) as i64;
            let delta = delta.min(p - 1);
            let now = Timestamp(reset.0 + k * p + delta);

            let mut allowance = PeriodicAllowance::new(
                BasicAllowance::unlimited(),
                period,
                Some(fee(10)),
            )
            .with_period_reset(reset);

            prop_assert!(allowance.try_reset_period(now));
            prop_assert_eq!(allowance.period_reset, Timestamp(reset.0 + (k + 1) * p));
            prop_assert_eq!(&allowance.period_can_spend, &fee(10));
        }

        #[test]
        fn test_window_never_exceeds_either_limit(allowance in periodic_allowance(), now in timestamp()) {
            let mut allowance = allowance;
            allowance.try_reset_period(now);

            let window = &allowance.period_can_spend;
            if let Some(period_limit) = &allowance.period_spend_limit {
                prop_assert!(period_limit.safe_sub(window).is_some());
            }
            if let Some(total) = &allowance.basic.spend_limit {
                prop_assert!(total.safe_sub(window).is_some());
            }
        }
    }
}
