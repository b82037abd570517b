//! Error types for escrow domain validation and transition guards.

use super::{AccountId, Amount, Operation, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors returned while constructing escrow values or evaluating
/// transitions.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EscrowDomainError {
    /// The account identifier is empty, too long, or contains characters
    /// outside `[A-Za-z0-9_-]`.
    #[error("malformed account identifier '{0}'")]
    InvalidAccount(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the configured character limit.
    #[error("task title has {length} characters, limit is {max}")]
    TitleTooLong {
        /// Character count of the rejected title.
        length: usize,
        /// Configured limit.
        max: usize,
    },

    /// The task description exceeds the configured character limit.
    #[error("task description has {length} characters, limit is {max}")]
    DescriptionTooLong {
        /// Character count of the rejected description.
        length: usize,
        /// Configured limit.
        max: usize,
    },

    /// The submitted proof reference is empty after trimming.
    #[error("proof reference must not be empty")]
    EmptyProof,

    /// The submitted proof reference exceeds the configured character limit.
    #[error("proof reference has {length} characters, limit is {max}")]
    ProofTooLong {
        /// Character count of the rejected proof.
        length: usize,
        /// Configured limit.
        max: usize,
    },

    /// Escrowed value must be strictly positive.
    #[error("locked amount must be greater than zero")]
    ZeroAmount,

    /// The deadline was already in the past at creation time.
    #[error("deadline {deadline} is not after the current time {now}")]
    DeadlineInPast {
        /// Requested deadline.
        deadline: DateTime<Utc>,
        /// Clock reading at creation time.
        now: DateTime<Utc>,
    },

    /// Task creation was submitted without a paired fund-lock payment.
    #[error("task creation requires a fund-lock payment in the same atomic group")]
    MissingFundLock,

    /// The fund-lock payment does not pay the custody account.
    #[error("fund-lock pays {found}, expected custody account {expected}")]
    FundLockRecipientMismatch {
        /// Custody account that must receive the lock.
        expected: AccountId,
        /// Recipient named by the submitted payment.
        found: AccountId,
    },

    /// The fund-lock payment is not paid by the creator.
    #[error("fund-lock is paid by {found}, expected the creator {expected}")]
    FundLockSenderMismatch {
        /// Creator who must pay the lock.
        expected: AccountId,
        /// Sender named by the submitted payment.
        found: AccountId,
    },

    /// The fund-lock payment is drawn from the custody account itself.
    #[error("fund-lock must not be drawn from custody account {0}")]
    FundLockFromCustody(AccountId),

    /// The creator cannot cover the fund lock.
    #[error("fund-lock needs {needed} from {account}, which holds {available}")]
    UnfundedFundLock {
        /// Paying account.
        account: AccountId,
        /// Amount the lock moves.
        needed: Amount,
        /// Balance held by the paying account.
        available: Amount,
    },

    /// The fund-lock payment amount differs from the declared escrow.
    #[error("fund-lock carries {locked}, task declares {declared}")]
    FundLockAmountMismatch {
        /// Amount declared by the create request.
        declared: Amount,
        /// Amount carried by the payment.
        locked: Amount,
    },

    /// The task is not in a status from which the operation may start.
    #[error("{operation} is not allowed for task {task_id} in status {status}")]
    InvalidState {
        /// Task identifier.
        task_id: TaskId,
        /// Rejected operation.
        operation: Operation,
        /// Current task status.
        status: TaskStatus,
    },

    /// The caller does not satisfy the operation's identity guard.
    #[error("{caller} is not authorised to {operation} task {task_id}")]
    Unauthorized {
        /// Task identifier.
        task_id: TaskId,
        /// Rejected operation.
        operation: Operation,
        /// Caller identity.
        caller: AccountId,
    },

    /// A freelancer has already been recorded for the task.
    #[error("task {0} already has a freelancer")]
    FreelancerAlreadyAssigned(TaskId),

    /// A payout to the freelancer was planned but none is recorded.
    #[error("task {0} has no freelancer to pay")]
    MissingFreelancer(TaskId),
}

/// Error returned while parsing task statuses from storage strings or codes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
