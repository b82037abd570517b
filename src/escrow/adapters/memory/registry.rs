//! In-memory task table used as the ledger's keyed storage.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::escrow::{
    domain::{NewTask, Task, TaskFieldUpdate, TaskId},
    ports::{RegistryError, RegistryResult, TaskFilter, TaskStore},
};

/// Per-record capacity reserved for each task.
pub const DEFAULT_RECORD_CAPACITY_BYTES: usize = 512;

/// Storage limits enforced by the in-memory ledger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageLimits {
    /// Bytes available to each task record.
    pub record_capacity_bytes: usize,
    /// Maximum number of task records, unbounded when `None`.
    pub max_records: Option<u64>,
}

impl Default for StorageLimits {
    fn default() -> Self {
        Self {
            record_capacity_bytes: DEFAULT_RECORD_CAPACITY_BYTES,
            max_records: None,
        }
    }
}

impl StorageLimits {
    /// Limits with a record quota.
    #[must_use]
    pub const fn with_max_records(mut self, max_records: u64) -> Self {
        self.max_records = Some(max_records);
        self
    }

    /// Limits with a different per-record capacity.
    #[must_use]
    pub const fn with_record_capacity(mut self, record_capacity_bytes: usize) -> Self {
        self.record_capacity_bytes = record_capacity_bytes;
        self
    }

    fn check_footprint(&self, task: &Task) -> RegistryResult<()> {
        let footprint = task.storage_footprint();
        if footprint > self.record_capacity_bytes {
            return Err(RegistryError::RecordTooLarge {
                footprint,
                capacity: self.record_capacity_bytes,
            });
        }
        Ok(())
    }
}

/// Task records keyed by identifier plus the identifier counter.
#[derive(Debug, Clone)]
pub struct TaskTable {
    tasks: BTreeMap<TaskId, Task>,
    next_id: TaskId,
    limits: StorageLimits,
}

impl Default for TaskTable {
    fn default() -> Self {
        Self::new(StorageLimits::default())
    }
}

impl TaskTable {
    /// Creates an empty table whose counter starts at [`TaskId::FIRST`].
    #[must_use]
    pub const fn new(limits: StorageLimits) -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_id: TaskId::FIRST,
            limits,
        }
    }

    /// Returns the identifier the next creation will receive.
    #[must_use]
    pub const fn next_id(&self) -> TaskId {
        self.next_id
    }

    /// Returns matching records in ascending identifier order.
    pub fn select<'a>(&'a self, filter: &'a TaskFilter) -> impl Iterator<Item = &'a Task> + 'a {
        self.tasks.values().filter(move |task| filter.matches(task))
    }

    /// Puts back a record captured before a failed commit step touched it.
    pub(super) fn restore(&mut self, task: Task) {
        self.tasks.insert(task.id(), task);
    }

    /// Drops a record created by a failed commit and hands its identifier
    /// back to the counter.
    pub(super) fn discard(&mut self, task_id: TaskId) {
        if self.tasks.remove(&task_id).is_some() {
            self.next_id = task_id;
        }
    }

    fn ensure_quota(&self) -> RegistryResult<()> {
        let Some(max_records) = self.limits.max_records else {
            return Ok(());
        };
        let stored = u64::try_from(self.tasks.len()).unwrap_or(u64::MAX);
        if stored >= max_records {
            return Err(RegistryError::QuotaReached { max_records });
        }
        Ok(())
    }
}

impl TaskStore for TaskTable {
    fn allocate_and_create(
        &mut self,
        draft: NewTask,
        created_at: DateTime<Utc>,
    ) -> RegistryResult<TaskId> {
        self.ensure_quota()?;
        let task_id = self.next_id;
        let following = task_id.next().ok_or(RegistryError::IdSpaceExhausted)?;
        let task = Task::create(task_id, draft, created_at);
        self.limits.check_footprint(&task)?;

        self.tasks.insert(task_id, task);
        self.next_id = following;
        Ok(task_id)
    }

    fn get(&self, task_id: TaskId) -> RegistryResult<&Task> {
        self.tasks.get(&task_id).ok_or(RegistryError::NotFound(task_id))
    }

    fn update_field(
        &mut self,
        task_id: TaskId,
        update: TaskFieldUpdate,
        at: DateTime<Utc>,
    ) -> RegistryResult<()> {
        let stored = self
            .tasks
            .get_mut(&task_id)
            .ok_or(RegistryError::NotFound(task_id))?;
        let mut updated = stored.clone();
        updated.apply_update(update, at)?;
        self.limits.check_footprint(&updated)?;
        *stored = updated;
        Ok(())
    }
}
