//! Wallet session as seen by the order flows.

use alloy_primitives::Address;

/// The connected account, if any. Read-only from the desk's perspective.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Session {
    account: Option<Address>,
}

impl Session {
    pub fn connected(account: Address) -> Self {
        Self {
            account: Some(account),
        }
    }

    pub fn disconnected() -> Self {
        Self::default()
    }

    pub fn account(&self) -> Option<Address> {
        self.account
    }

    pub fn is_connected(&self) -> bool {
        self.account.is_some()
    }
}

impl From<Option<Address>> for Session {
    fn from(account: Option<Address>) -> Self {
        Self { account }
    }
}
