//! Ledger runtime port.
//!
//! The ledger is the external collaborator that provides atomic multi-step
//! commits, persistent keyed storage, and value movement. Services describe
//! everything one operation does as an [`AtomicUnit`]; the ledger applies
//! all of its steps or none of them.

use super::RegistryError;
use crate::escrow::domain::{
    AccountId, Amount, NewTask, Payment, Task, TaskFieldUpdate, TaskId, TaskStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

/// Result type for ledger operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Guarded mutation of one task record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskUpdate {
    /// Record to mutate.
    pub task_id: TaskId,
    /// Status the record must still hold for the update to apply.
    pub expected_status: TaskStatus,
    /// Field writes, applied in order.
    pub updates: Vec<TaskFieldUpdate>,
}

/// One step of an atomic unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerStep {
    /// Moves value between accounts.
    Transfer(Payment),
    /// Allocates an identifier and stores a new task record.
    CreateTask(NewTask),
    /// Mutates an existing task record.
    UpdateTask(TaskUpdate),
}

/// Ordered steps that commit together or not at all.
///
/// # Examples
///
/// ```
/// use bountyboard::escrow::domain::{AccountId, Amount, Payment};
/// use bountyboard::escrow::ports::{AtomicUnit, LedgerStep};
/// use chrono::Utc;
///
/// let payer = AccountId::new("CLIENT").expect("valid account");
/// let custody = AccountId::custody_for("demo");
/// let unit = AtomicUnit::new(Utc::now()).transfer(Payment::new(payer, custody, Amount::new(5)));
/// assert!(matches!(unit.steps(), [LedgerStep::Transfer(_)]));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtomicUnit {
    committed_at: DateTime<Utc>,
    steps: Vec<LedgerStep>,
}

impl AtomicUnit {
    /// Creates an empty unit stamped with the commit time.
    #[must_use]
    pub const fn new(committed_at: DateTime<Utc>) -> Self {
        Self {
            committed_at,
            steps: Vec::new(),
        }
    }

    /// Appends a value transfer.
    #[must_use]
    pub fn transfer(mut self, payment: Payment) -> Self {
        self.steps.push(LedgerStep::Transfer(payment));
        self
    }

    /// Appends a task creation.
    #[must_use]
    pub fn create_task(mut self, draft: NewTask) -> Self {
        self.steps.push(LedgerStep::CreateTask(draft));
        self
    }

    /// Appends a guarded task mutation.
    #[must_use]
    pub fn update_task(mut self, update: TaskUpdate) -> Self {
        self.steps.push(LedgerStep::UpdateTask(update));
        self
    }

    /// Returns the commit timestamp.
    #[must_use]
    pub const fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    /// Returns the steps in application order.
    #[must_use]
    pub fn steps(&self) -> &[LedgerStep] {
        &self.steps
    }

    /// Consumes the unit, yielding its steps.
    #[must_use]
    pub fn into_steps(self) -> Vec<LedgerStep> {
        self.steps
    }
}

/// Outcome of a committed unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitReceipt {
    commit_id: Uuid,
    committed_at: DateTime<Utc>,
    created: Option<TaskId>,
    tasks: Vec<Task>,
}

impl CommitReceipt {
    /// Creates a receipt.
    #[must_use]
    pub const fn new(
        commit_id: Uuid,
        committed_at: DateTime<Utc>,
        created: Option<TaskId>,
        tasks: Vec<Task>,
    ) -> Self {
        Self {
            commit_id,
            committed_at,
            created,
            tasks,
        }
    }

    /// Returns the ledger-assigned commit identifier.
    #[must_use]
    pub const fn commit_id(&self) -> Uuid {
        self.commit_id
    }

    /// Returns the commit timestamp.
    #[must_use]
    pub const fn committed_at(&self) -> DateTime<Utc> {
        self.committed_at
    }

    /// Returns the identifier allocated by a creation step, if any.
    #[must_use]
    pub const fn created(&self) -> Option<TaskId> {
        self.created
    }

    /// Returns post-commit snapshots of every task the unit touched.
    #[must_use]
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Takes the post-commit snapshot of `task_id` out of the receipt.
    #[must_use]
    pub fn into_task(self, task_id: TaskId) -> Option<Task> {
        self.tasks.into_iter().find(|task| task.id() == task_id)
    }
}

/// Ledger runtime contract.
#[async_trait]
pub trait LedgerRuntime: Send + Sync {
    /// Applies every step of `unit` atomically.
    ///
    /// # Errors
    ///
    /// Returns the first failing step's error. No step of a failed unit is
    /// observable afterwards.
    async fn commit(&self, unit: AtomicUnit) -> LedgerResult<CommitReceipt>;

    /// Returns the committed balance of `account`.
    async fn balance(&self, account: &AccountId) -> LedgerResult<Amount>;
}

/// Errors returned by ledger implementations.
#[derive(Debug, Clone, Error)]
pub enum LedgerError {
    /// A transfer exceeds the sender's balance.
    #[error("account {account} holds {available}, transfer needs {needed}")]
    InsufficientFunds {
        /// Debited account.
        account: AccountId,
        /// Amount requested.
        needed: Amount,
        /// Balance available.
        available: Amount,
    },

    /// A transfer would overflow the receiver's balance.
    #[error("balance overflow on account {0}")]
    BalanceOverflow(AccountId),

    /// A registry step failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// Runtime failure outside the unit's control.
    #[error("ledger runtime error: {0}")]
    Runtime(Arc<dyn std::error::Error + Send + Sync>),
}

impl LedgerError {
    /// Wraps a runtime error from the ledger adapter.
    pub fn runtime(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Runtime(Arc::new(err))
    }
}
