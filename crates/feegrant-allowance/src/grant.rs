//! Grant records.
//!
//! A grant binds an allowance to a (granter, grantee) pair. Grants are
//! encoded as CBOR for storage.

use serde::{Deserialize, Serialize};

use feegrant_core::{Address, Timestamp};

use crate::allowance::Allowance;
use crate::error::{AllowanceError, InvalidAllowance, Result};

/// A fee allowance issued by `granter` for `grantee`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grant {
    /// The account paying the fees.
    pub granter: Address,

    /// The account allowed to spend.
    pub grantee: Address,

    /// The remaining allowance.
    pub allowance: Allowance,
}

impl Grant {
    /// Create a new grant.
    pub fn new(granter: Address, grantee: Address, allowance: impl Into<Allowance>) -> Self {
        Self {
            granter,
            grantee,
            allowance: allowance.into(),
        }
    }

    /// Check the grant and its allowance.
    pub fn validate(&self) -> std::result::Result<(), InvalidAllowance> {
        if self.granter == self.grantee {
            return Err(InvalidAllowance::SelfGrant(self.granter));
        }
        self.allowance.validate()
    }

    /// The hard deadline of the allowance, if any.
    pub fn expiration(&self) -> Option<Timestamp> {
        self.allowance.expiration()
    }

    /// Serialize to CBOR bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        ciborium::into_writer(self, &mut buf)
            .map_err(|e| AllowanceError::Encoding(e.to_string()))?;
        Ok(buf)
    }

    /// Deserialize from CBOR bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        ciborium::from_reader(bytes).map_err(|e| AllowanceError::Encoding(e.to_string()))
    }
}
