//! Task record and status types.

use super::{
    AccountId, Amount, EscrowDomainError, ParseTaskStatusError, ProofReference, TaskDescription,
    TaskId, TaskTitle,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Escrow lifecycle status of a task.
///
/// Numeric codes are stable and shared with external indexers.
///
/// # Examples
///
/// ```
/// use bountyboard::escrow::domain::TaskStatus;
///
/// assert_eq!(TaskStatus::Submitted.code(), 2);
/// assert_eq!(TaskStatus::try_from(5_u8), Ok(TaskStatus::Refunded));
/// assert_eq!(TaskStatus::try_from("claimed"), Ok(TaskStatus::Claimed));
/// assert!(TaskStatus::Approved.is_terminal());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Funded and waiting for a freelancer.
    Open,
    /// A freelancer has claimed the task.
    Claimed,
    /// Work has been submitted for review.
    Submitted,
    /// Work was approved and the escrow paid to the freelancer.
    Approved,
    /// Work was rejected. Never persisted: rejection returns the task to
    /// [`TaskStatus::Claimed`].
    Rejected,
    /// The escrow was returned to the client.
    Refunded,
}

impl TaskStatus {
    /// Every status in code order.
    pub const ALL: [Self; 6] = [
        Self::Open,
        Self::Claimed,
        Self::Submitted,
        Self::Approved,
        Self::Rejected,
        Self::Refunded,
    ];

    /// Returns the stable numeric code.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Claimed => 1,
            Self::Submitted => 2,
            Self::Approved => 3,
            Self::Rejected => 4,
            Self::Refunded => 5,
        }
    }

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::Claimed => "claimed",
            Self::Submitted => "submitted",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Refunded => "refunded",
        }
    }

    /// Returns a human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Open => "Open",
            Self::Claimed => "Claimed",
            Self::Submitted => "Submitted",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
            Self::Refunded => "Refunded",
        }
    }

    /// Returns whether no further transition is legal from this status.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Refunded)
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "claimed" => Ok(Self::Claimed),
            "submitted" => Ok(Self::Submitted),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            "refunded" => Ok(Self::Refunded),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl TryFrom<u8> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::ALL
            .into_iter()
            .find(|status| status.code() == code)
            .ok_or_else(|| ParseTaskStatusError(code.to_string()))
    }
}

/// Validated creation payload handed to the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Creator of the task.
    pub client: AccountId,
    /// Escrowed amount, taken from the paired fund lock.
    pub amount: Amount,
    /// Absolute deadline.
    pub deadline: DateTime<Utc>,
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
}

/// Single-field mutation applied by the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "snake_case")]
pub enum TaskFieldUpdate {
    /// Records the claimant.
    Freelancer(AccountId),
    /// Moves the task to a new status.
    Status(TaskStatus),
    /// Sets or clears the proof reference.
    Proof(Option<ProofReference>),
}

/// Task record.
///
/// `status` drives the escrow state machine. `title`, `description` and
/// `proof` are auxiliary payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    client: AccountId,
    freelancer: Option<AccountId>,
    amount: Amount,
    deadline: DateTime<Utc>,
    status: TaskStatus,
    title: TaskTitle,
    description: TaskDescription,
    proof: Option<ProofReference>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Bytes used by the fixed-width fields: id, amount, deadline, status.
    const FIXED_FOOTPRINT_BYTES: usize = 25;

    /// Creates an `open` task record under an allocated identifier.
    #[must_use]
    pub fn create(id: TaskId, draft: NewTask, created_at: DateTime<Utc>) -> Self {
        let NewTask {
            client,
            amount,
            deadline,
            title,
            description,
        } = draft;

        Self {
            id,
            client,
            freelancer: None,
            amount,
            deadline,
            status: TaskStatus::Open,
            title,
            description,
            proof: None,
            created_at,
            updated_at: created_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the creator.
    #[must_use]
    pub const fn client(&self) -> &AccountId {
        &self.client
    }

    /// Returns the claimant, if the task has been claimed.
    #[must_use]
    pub const fn freelancer(&self) -> Option<&AccountId> {
        self.freelancer.as_ref()
    }

    /// Returns the escrowed amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the submitted proof reference, if any.
    #[must_use]
    pub const fn proof(&self) -> Option<&ProofReference> {
        self.proof.as_ref()
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest mutation timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns the number of bytes this record occupies in ledger storage.
    #[must_use]
    pub fn storage_footprint(&self) -> usize {
        Self::FIXED_FOOTPRINT_BYTES
            + self.client.as_str().len()
            + self.freelancer.as_ref().map_or(0, |account| account.as_str().len())
            + self.title.as_str().len()
            + self.description.as_str().len()
            + self.proof.as_ref().map_or(0, |proof| proof.as_str().len())
    }

    /// Applies a single field mutation.
    ///
    /// Status and proof writes are unconditional; callers validate the
    /// transition beforehand.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowDomainError::FreelancerAlreadyAssigned`] when a
    /// freelancer is already recorded.
    pub fn apply_update(
        &mut self,
        update: TaskFieldUpdate,
        at: DateTime<Utc>,
    ) -> Result<(), EscrowDomainError> {
        match update {
            TaskFieldUpdate::Freelancer(account) => {
                if self.freelancer.is_some() {
                    return Err(EscrowDomainError::FreelancerAlreadyAssigned(self.id));
                }
                self.freelancer = Some(account);
            }
            TaskFieldUpdate::Status(status) => self.status = status,
            TaskFieldUpdate::Proof(proof) => self.proof = proof,
        }
        self.updated_at = at;
        Ok(())
    }
}
