//! Value-transfer instructions.

use super::{AccountId, Amount};
use serde::{Deserialize, Serialize};

/// Instruction moving value between two ledger accounts.
///
/// A payment into the custody account submitted together with task creation
/// is the fund lock; payments out of custody are payouts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Payment {
    sender: AccountId,
    receiver: AccountId,
    amount: Amount,
}

impl Payment {
    /// Creates a payment instruction.
    #[must_use]
    pub const fn new(sender: AccountId, receiver: AccountId, amount: Amount) -> Self {
        Self {
            sender,
            receiver,
            amount,
        }
    }

    /// Returns the debited account.
    #[must_use]
    pub const fn sender(&self) -> &AccountId {
        &self.sender
    }

    /// Returns the credited account.
    #[must_use]
    pub const fn receiver(&self) -> &AccountId {
        &self.receiver
    }

    /// Returns the transferred amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }
}
