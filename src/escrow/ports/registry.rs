//! Registry ports for task storage and lookup.
//!
//! [`TaskStore`] is the write side. Its operations run inside a ledger
//! atomic unit, so they are synchronous and act on state staged by the
//! ledger. [`TaskRegistry`] is the asynchronous read side used by services.
//! Neither performs authorization or state-machine validation.

use crate::escrow::domain::{
    AccountId, EscrowDomainError, NewTask, Task, TaskFieldUpdate, TaskId, TaskStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for registry operations.
pub type RegistryResult<T> = Result<T, RegistryError>;

/// Keyed task storage with identifier allocation.
pub trait TaskStore {
    /// Reads the next identifier, advances the counter, and stores a new
    /// `open` record under the read identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::RecordTooLarge`], [`RegistryError::QuotaReached`]
    /// or [`RegistryError::IdSpaceExhausted`] when storage cannot be reserved.
    /// On error neither the counter nor the records change.
    fn allocate_and_create(
        &mut self,
        draft: NewTask,
        created_at: DateTime<Utc>,
    ) -> RegistryResult<TaskId>;

    /// Returns the record stored under `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no record exists.
    fn get(&self, task_id: TaskId) -> RegistryResult<&Task>;

    /// Mutates one field of the record stored under `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no record exists,
    /// [`RegistryError::RecordTooLarge`] when the mutated record no longer
    /// fits, or [`RegistryError::Rejected`] when the record refuses the write.
    fn update_field(
        &mut self,
        task_id: TaskId,
        update: TaskFieldUpdate,
        at: DateTime<Utc>,
    ) -> RegistryResult<()>;
}

/// Selection criteria for task listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TaskFilter {
    /// Every task.
    #[default]
    All,
    /// Tasks in the given status.
    Status(TaskStatus),
    /// Tasks created by the given client.
    Client(AccountId),
    /// Tasks claimed by the given freelancer.
    Freelancer(AccountId),
}

impl TaskFilter {
    /// Returns whether `task` satisfies the filter.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            Self::All => true,
            Self::Status(status) => task.status() == *status,
            Self::Client(client) => task.client() == client,
            Self::Freelancer(freelancer) => task.freelancer() == Some(freelancer),
        }
    }
}

/// Read access to committed task records.
#[async_trait]
pub trait TaskRegistry: Send + Sync {
    /// Returns the committed record for `task_id`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no record exists.
    async fn get(&self, task_id: TaskId) -> RegistryResult<Task>;

    /// Returns matching records ordered by ascending identifier.
    async fn list(&self, filter: &TaskFilter) -> RegistryResult<Vec<Task>>;

    /// Returns the identifier the next creation will receive.
    async fn next_task_id(&self) -> RegistryResult<TaskId>;
}

/// Errors returned by registry implementations.
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    /// No record exists for the identifier.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// The stored status differs from the one the writer observed.
    #[error("task {task_id} status is {found}, expected {expected}")]
    StatusConflict {
        /// Task identifier.
        task_id: TaskId,
        /// Status the writer planned against.
        expected: TaskStatus,
        /// Status actually stored.
        found: TaskStatus,
    },

    /// The record does not fit in its storage slot.
    #[error("task record needs {footprint} bytes, capacity is {capacity}")]
    RecordTooLarge {
        /// Bytes required by the record.
        footprint: usize,
        /// Bytes available per record.
        capacity: usize,
    },

    /// The storage quota has no room for another record.
    #[error("task storage quota of {max_records} records reached")]
    QuotaReached {
        /// Configured record quota.
        max_records: u64,
    },

    /// The identifier counter cannot advance any further.
    #[error("task identifier space exhausted")]
    IdSpaceExhausted,

    /// The record refused the mutation.
    #[error(transparent)]
    Rejected(#[from] EscrowDomainError),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl RegistryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
