//! Service-level error taxonomy.

use thiserror::Error;

use crate::escrow::{
    domain::EscrowDomainError,
    ports::{LedgerError, RegistryError},
};

/// Errors returned by escrow lifecycle operations.
#[derive(Debug, Clone, Error)]
pub enum EscrowError {
    /// Domain validation or a transition guard failed.
    #[error(transparent)]
    Domain(#[from] EscrowDomainError),
    /// Registry lookup failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The ledger refused or failed the atomic unit.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Result type for escrow lifecycle operations.
pub type EscrowResult<T> = Result<T, EscrowError>;

/// Caller-facing classification of an [`EscrowError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EscrowErrorKind {
    /// Unknown task identifier.
    NotFound,
    /// The caller fails the transition's identity guard.
    Unauthorized,
    /// The task's status does not permit the operation.
    InvalidState,
    /// Malformed input.
    InvalidArgument,
    /// Storage could not be reserved for the record.
    StorageExhausted,
    /// The fund lock paired with a creation is missing or wrong.
    AtomicGroupViolation,
    /// Infrastructure failure in the ledger or registry, including a payout
    /// that custody cannot cover.
    LedgerFailure,
}

impl EscrowErrorKind {
    /// Returns the stable snake-case name of the kind.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::InvalidState => "invalid_state",
            Self::InvalidArgument => "invalid_argument",
            Self::StorageExhausted => "storage_exhausted",
            Self::AtomicGroupViolation => "atomic_group_violation",
            Self::LedgerFailure => "ledger_failure",
        }
    }
}

impl std::fmt::Display for EscrowErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EscrowError {
    /// Classifies the error.
    #[must_use]
    pub const fn kind(&self) -> EscrowErrorKind {
        match self {
            Self::Domain(err) => domain_kind(err),
            Self::Registry(err) => registry_kind(err),
            Self::Ledger(err) => ledger_kind(err),
        }
    }
}

const fn domain_kind(err: &EscrowDomainError) -> EscrowErrorKind {
    match err {
        EscrowDomainError::InvalidAccount(_)
        | EscrowDomainError::EmptyTitle
        | EscrowDomainError::TitleTooLong { .. }
        | EscrowDomainError::DescriptionTooLong { .. }
        | EscrowDomainError::EmptyProof
        | EscrowDomainError::ProofTooLong { .. }
        | EscrowDomainError::ZeroAmount
        | EscrowDomainError::DeadlineInPast { .. } => EscrowErrorKind::InvalidArgument,
        EscrowDomainError::MissingFundLock
        | EscrowDomainError::FundLockRecipientMismatch { .. }
        | EscrowDomainError::FundLockSenderMismatch { .. }
        | EscrowDomainError::FundLockFromCustody(_)
        | EscrowDomainError::UnfundedFundLock { .. }
        | EscrowDomainError::FundLockAmountMismatch { .. } => {
            EscrowErrorKind::AtomicGroupViolation
        }
        EscrowDomainError::InvalidState { .. }
        | EscrowDomainError::FreelancerAlreadyAssigned(_)
        | EscrowDomainError::MissingFreelancer(_) => EscrowErrorKind::InvalidState,
        EscrowDomainError::Unauthorized { .. } => EscrowErrorKind::Unauthorized,
    }
}

const fn registry_kind(err: &RegistryError) -> EscrowErrorKind {
    match err {
        RegistryError::NotFound(_) => EscrowErrorKind::NotFound,
        RegistryError::StatusConflict { .. } => EscrowErrorKind::InvalidState,
        RegistryError::RecordTooLarge { .. }
        | RegistryError::QuotaReached { .. }
        | RegistryError::IdSpaceExhausted => EscrowErrorKind::StorageExhausted,
        RegistryError::Rejected(inner) => domain_kind(inner),
        RegistryError::Persistence(_) => EscrowErrorKind::LedgerFailure,
    }
}

const fn ledger_kind(err: &LedgerError) -> EscrowErrorKind {
    match err {
        LedgerError::Registry(inner) => registry_kind(inner),
        LedgerError::InsufficientFunds { .. }
        | LedgerError::BalanceOverflow(_)
        | LedgerError::Runtime(_) => EscrowErrorKind::LedgerFailure,
    }
}
