//! Message-filtered allowance.

use serde::{Deserialize, Serialize};

use feegrant_core::{Coins, Timestamp};

use crate::allowance::Allowance;
use crate::error::{AcceptError, InvalidAllowance};

/// Wraps another allowance and only pays for attempts whose messages all
/// have an allowed type URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AllowedMsgAllowance {
    /// The allowance that actually pays.
    pub allowance: Box<Allowance>,

    /// Message type URLs this grant may pay for.
    pub allowed_messages: Vec<String>,
}

impl AllowedMsgAllowance {
    pub fn new(allowance: impl Into<Allowance>, allowed_messages: Vec<String>) -> Self {
        Self {
            allowance: Box::new(allowance.into()),
            allowed_messages,
        }
    }

    pub fn validate(&self) -> Result<(), InvalidAllowance> {
        if self.allowed_messages.is_empty() {
            return Err(InvalidAllowance::NoAllowedMessages);
        }
        if self.allowed_messages.iter().any(String::is_empty) {
            return Err(InvalidAllowance::EmptyMessageType);
        }
        self.allowance.validate()
    }

    /// Whether `type_url` is on the allowed list.
    pub fn allows(&self, type_url: &str) -> bool {
        self.allowed_messages.iter().any(|allowed| allowed == type_url)
    }

    /// Reject disallowed messages, then defer to the inner allowance.
    pub fn accept(&mut self, now: Timestamp, fee: &Coins, msgs: &[&str]) -> Result<bool, AcceptError> {
        if let Some(denied) = msgs.iter().find(|msg| !self.allows(msg)) {
            return Err(AcceptError::MessageNotAllowed(denied.to_string()));
        }
        self.allowance.accept(now, fee, msgs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::basic::BasicAllowance;

    const NOW: Timestamp = Timestamp(1_700_000_000_000);
    const MSG_SEND: &str = "/bank.v1.MsgSend";
    const MSG_VOTE: &str = "/gov.v1.MsgVote";

    fn coins(s: &str) -> Coins {
        s.parse().unwrap()
    }

    fn send_only(limit: &str) -> AllowedMsgAllowance {
        AllowedMsgAllowance::new(
            BasicAllowance::with_spend_limit(coins(limit)),
            vec![MSG_SEND.to_string()],
        )
    }

    #[test]
    fn test_allowed_messages_pay() {
        let mut allowance = send_only("100bnkt");
        assert_eq!(allowance.accept(NOW, &coins("30bnkt"), &[MSG_SEND, MSG_SEND]), Ok(false));
        assert_eq!(
            *allowance.allowance,
            Allowance::Basic(BasicAllowance::with_spend_limit(coins("70bnkt")))
        );
    }

    #[test]
    fn test_disallowed_message_leaves_inner_untouched() {
        let mut allowance = send_only("100bnkt");
        let before = allowance.clone();

        let err = allowance
            .accept(NOW, &coins("30bnkt"), &[MSG_SEND, MSG_VOTE])
            .unwrap_err();
        assert_eq!(err, AcceptError::MessageNotAllowed(MSG_VOTE.to_string()));
        assert!(!err.removes_grant());
        assert_eq!(allowance, before);
    }

    #[test]
    fn test_inner_expiry_propagates() {
        let mut allowance = AllowedMsgAllowance::new(
            BasicAllowance::unlimited().with_expiration(NOW),
            vec![MSG_SEND.to_string()],
        );
        let err = allowance.accept(NOW, &coins("1bnkt"), &[MSG_SEND]).unwrap_err();
        assert!(err.removes_grant());
    }

    #[test]
    fn test_validate() {
        assert!(send_only("1bnkt").validate().is_ok());

        let none = AllowedMsgAllowance::new(BasicAllowance::unlimited(), vec![]);
        assert_eq!(none.validate(), Err(InvalidAllowance::NoAllowedMessages));

        let blank = AllowedMsgAllowance::new(BasicAllowance::unlimited(), vec![String::new()]);
        assert_eq!(blank.validate(), Err(InvalidAllowance::EmptyMessageType));

        let bad_inner = AllowedMsgAllowance::new(
            BasicAllowance::with_spend_limit(Coins::empty()),
            vec![MSG_SEND.to_string()],
        );
        assert_eq!(bad_inner.validate(), Err(InvalidAllowance::SpendLimitNotPositive));
    }
}
