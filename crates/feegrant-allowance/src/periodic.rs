//! Periodic allowance: a renewable per-period budget on top of a flat one.
//!
//! Period boundaries are anchored. Once the first window is opened, every
//! later boundary lies on the grid `first_reset + n * period`, no matter
//! how many periods pass without activity.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use feegrant_core::{Coins, Timestamp};

use crate::basic::BasicAllowance;
use crate::error::{AcceptError, InvalidAllowance};

/// A flat allowance plus a budget that refills every `period`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodicAllowance {
    /// Overall cap and hard deadline.
    pub basic: BasicAllowance,

    /// Length of one budget window.
    pub period: Duration,

    /// Nominal budget of one window. `None` leaves windows uncapped.
    pub period_spend_limit: Option<Coins>,

    /// What is left in the current window.
    pub period_can_spend: Coins,

    /// When the next window opens. [`Timestamp::ZERO`] until first use.
    pub period_reset: Timestamp,
}

impl PeriodicAllowance {
    /// Create an allowance whose first window opens on first use.
    pub fn new(basic: BasicAllowance, period: Duration, period_spend_limit: Option<Coins>) -> Self {
        Self {
            basic,
            period,
            period_spend_limit,
            period_can_spend: Coins::empty(),
            period_reset: Timestamp::ZERO,
        }
    }

    /// Open the first window at a chosen instant instead of on first use.
    pub fn with_period_reset(mut self, period_reset: Timestamp) -> Self {
        self.period_reset = period_reset;
        self
    }

    /// Check the structural invariants.
    pub fn validate(&self) -> Result<(), InvalidAllowance> {
        self.basic.validate()?;

        if self.period.as_millis() == 0 {
            return Err(InvalidAllowance::PeriodNotPositive);
        }

        if let Some(ref period_limit) = self.period_spend_limit {
            period_limit.validate()?;
            if !period_limit.is_all_positive() {
                return Err(InvalidAllowance::PeriodSpendLimitNotPositive);
            }

            if let Some(ref total) = self.basic.spend_limit {
                if !total.same_denoms(period_limit) {
                    return Err(InvalidAllowance::DenomMismatch {
                        total: total.clone(),
                        period: period_limit.clone(),
                    });
                }
            }
        }

        self.period_can_spend.validate()?;

        Ok(())
    }

    /// Try to pay `fee` at `now`.
    ///
    /// Order matters and is observable on rejection:
    ///
    /// 1. An expired allowance is rejected with [`AcceptError::Expired`].
    /// 2. A due period reset is applied and stays applied.
    /// 3. The fee is taken from the window budget, which stays taken.
    /// 4. The fee is taken from the absolute limit.
    ///
    /// A fee that passes step 3 but fails step 4 therefore still shrinks
    /// `period_can_spend`. Callers drop the mutated copy on any error, so
    /// stored state is unaffected.
    pub fn accept(&mut self, now: Timestamp, fee: &Coins, _msgs: &[&str]) -> Result<bool, AcceptError> {
        if let Some(expiration) = self.basic.expired_at(now) {
            return Err(AcceptError::Expired { expiration });
        }

        self.try_reset_period(now);

        if self.period_spend_limit.is_some() {
            match self.period_can_spend.safe_sub(fee) {
                Some(left) => self.period_can_spend = left,
                None => {
                    return Err(AcceptError::PeriodLimitExceeded {
                        fee: fee.clone(),
                        available: self.period_can_spend.clone(),
                    })
                }
            }
        }

        if let Some(ref total) = self.basic.spend_limit {
            let left = total
                .safe_sub(fee)
                .ok_or_else(|| AcceptError::AbsoluteLimitExceeded {
                    fee: fee.clone(),
                    limit: total.clone(),
                })?;
            self.basic.spend_limit = Some(left);
        }

        Ok(self
            .basic
            .spend_limit
            .as_ref()
            .is_some_and(Coins::is_zero))
    }

    /// Open a new window if `now` has reached `period_reset`.
    ///
    /// Returns whether a reset happened. The budget is refilled to the
    /// nominal window size (capped by the absolute limit), never carried
    /// over from skipped windows.
    pub fn try_reset_period(&mut self, now: Timestamp) -> bool {
        if now < self.period_reset {
            return false;
        }

        self.period_reset = if self.period_reset.is_zero() {
            now.saturating_add(self.period)
        } else {
            self.period_reset.next_boundary_after(now, self.period)
        };

        if let Some(ref period_limit) = self.period_spend_limit {
            self.period_can_spend = match self.basic.spend_limit {
                Some(ref total) => period_limit.min_each(total),
                None => period_limit.clone(),
            };
        }

        tracing::trace!(
            period_reset = %self.period_reset,
            period_can_spend = %self.period_can_spend,
            "fee allowance period reset"
        );

        true
    }
}
