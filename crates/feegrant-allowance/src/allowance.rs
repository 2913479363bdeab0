//! The closed set of allowance kinds.

use serde::{Deserialize, Serialize};

use feegrant_core::{Coins, Timestamp};

use crate::basic::BasicAllowance;
use crate::error::{AcceptError, InvalidAllowance};
use crate::filtered::AllowedMsgAllowance;
use crate::periodic::PeriodicAllowance;

/// Any fee allowance a granter can issue.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Allowance {
    /// Absolute cap and optional deadline.
    Basic(BasicAllowance),

    /// Absolute cap plus a renewable per-period budget.
    Periodic(PeriodicAllowance),

    /// Another allowance restricted to listed message types.
    AllowedMsg(AllowedMsgAllowance),
}

impl Allowance {
    /// Check the structural invariants of this allowance.
    pub fn validate(&self) -> Result<(), InvalidAllowance> {
        match self {
            Allowance::Basic(a) => a.validate(),
            Allowance::Periodic(a) => a.validate(),
            Allowance::AllowedMsg(a) => a.validate(),
        }
    }

    /// Try to pay `fee` at `now` for an attempt carrying `msgs`.
    ///
    /// - `Ok(false)`: paid; store the mutated allowance.
    /// - `Ok(true)`: paid; the allowance is used up and must be deleted.
    /// - `Err(e)` with [`AcceptError::removes_grant`]: not paid; delete.
    /// - any other `Err`: not paid; keep the stored allowance as it was.
    pub fn accept(&mut self, now: Timestamp, fee: &Coins, msgs: &[&str]) -> Result<bool, AcceptError> {
        match self {
            Allowance::Basic(a) => a.accept(now, fee, msgs),
            Allowance::Periodic(a) => a.accept(now, fee, msgs),
            Allowance::AllowedMsg(a) => a.accept(now, fee, msgs),
        }
    }

    /// The hard deadline, if any.
    pub fn expiration(&self) -> Option<Timestamp> {
        match self {
            Allowance::Basic(a) => a.expiration,
            Allowance::Periodic(a) => a.basic.expiration,
            Allowance::AllowedMsg(a) => a.allowance.expiration(),
        }
    }

    /// Short name of the allowance kind, for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Allowance::Basic(_) => "basic",
            Allowance::Periodic(_) => "periodic",
            Allowance::AllowedMsg(_) => "allowed_msg",
        }
    }
}

impl From<BasicAllowance> for Allowance {
    fn from(allowance: BasicAllowance) -> Self {
        Allowance::Basic(allowance)
    }
}

impl From<PeriodicAllowance> for Allowance {
    fn from(allowance: PeriodicAllowance) -> Self {
        Allowance::Periodic(allowance)
    }
}

impl From<AllowedMsgAllowance> for Allowance {
    fn from(allowance: AllowedMsgAllowance) -> Self {
        Allowance::AllowedMsg(allowance)
    }
}
