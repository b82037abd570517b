//! Identifier and validated scalar types for the escrow domain.

use super::EscrowDomainError;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Sequential identifier of a task record.
///
/// Identifiers are allocated from a contiguous counter starting at
/// [`TaskId::FIRST`] and are never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(u64);

impl TaskId {
    /// Identifier allocated to the first task of an empty registry.
    pub const FIRST: Self = Self(0);

    /// Wraps a raw identifier value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns the identifier that follows this one, or `None` once the
    /// identifier space is exhausted.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self.0.checked_add(1) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identity of a ledger account: a client, a freelancer, or the custody
/// account.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    const MAX_LENGTH: usize = 64;
    const CUSTODY_PREFIX: &'static str = "ESCROW";
    const CUSTODY_DIGEST_BYTES: usize = 26;

    /// Creates a validated account identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowDomainError::InvalidAccount`] when the value is empty,
    /// longer than 64 bytes, or contains characters other than ASCII
    /// alphanumerics, `-` and `_`.
    pub fn new(value: impl Into<String>) -> Result<Self, EscrowDomainError> {
        let raw = value.into();
        let is_valid = !raw.is_empty()
            && raw.len() <= Self::MAX_LENGTH
            && raw
                .chars()
                .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_');

        if !is_valid {
            return Err(EscrowDomainError::InvalidAccount(raw));
        }
        Ok(Self(raw))
    }

    /// Derives the custody account controlled by the named board.
    ///
    /// The derivation is deterministic, so every process serving the same
    /// board agrees on where escrowed value is held.
    ///
    /// # Examples
    ///
    /// ```
    /// use bountyboard::escrow::domain::AccountId;
    ///
    /// let custody = AccountId::custody_for("bountyboard");
    /// assert_eq!(custody, AccountId::custody_for("bountyboard"));
    /// assert!(custody.as_str().starts_with("ESCROW"));
    /// assert_eq!(custody.as_str().len(), 58);
    /// ```
    #[must_use]
    pub fn custody_for(board_name: &str) -> Self {
        let digest = Sha256::new()
            .chain_update(b"bountyboard:custody:")
            .chain_update(board_name.as_bytes())
            .finalize();
        let encoded: String = digest
            .iter()
            .take(Self::CUSTODY_DIGEST_BYTES)
            .map(|byte| format!("{byte:02X}"))
            .collect();
        Self(format!("{}{encoded}", Self::CUSTODY_PREFIX))
    }

    /// Returns the identifier as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for AccountId {
    type Error = EscrowDomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl AsRef<str> for AccountId {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Quantity of ledger value in the smallest indivisible unit.
///
/// # Examples
///
/// ```
/// use bountyboard::escrow::domain::Amount;
///
/// let locked = Amount::new(1_000_000);
/// assert_eq!(locked.checked_sub(Amount::new(250_000)), Some(Amount::new(750_000)));
/// assert_eq!(Amount::ZERO.checked_sub(locked), None);
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// The empty amount.
    pub const ZERO: Self = Self(0);

    /// Wraps a raw amount.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the underlying numeric value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// Returns whether the amount is zero.
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Adds two amounts, returning `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Subtracts `other`, returning `None` when it exceeds `self`.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
