//! In-memory ledger runtime.
//!
//! Commits apply steps to the live state under the write lock, journalling
//! the prior value of every balance and record they touch. A failing step
//! replays the journal backwards, so a failed unit leaves no trace.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use uuid::Uuid;

use super::registry::{StorageLimits, TaskTable};
use crate::escrow::{
    domain::{AccountId, Amount, Payment, Task, TaskId},
    ports::{
        AtomicUnit, CommitReceipt, LedgerError, LedgerResult, LedgerRuntime, LedgerStep,
        RegistryError, RegistryResult, TaskFilter, TaskRegistry, TaskStore, TaskUpdate,
    },
};

/// Thread-safe in-memory ledger holding balances and task records.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLedger {
    state: Arc<RwLock<LedgerState>>,
}

#[derive(Debug, Default)]
struct LedgerState {
    balances: HashMap<AccountId, Amount>,
    tasks: TaskTable,
}

/// Prior value of one piece of state changed by a commit step.
#[derive(Debug)]
enum Undo {
    Balance(AccountId, Option<Amount>),
    Record(Task),
    Creation(TaskId),
}

#[derive(Debug, Default)]
struct Journal {
    undo: Vec<Undo>,
    created: Option<TaskId>,
    touched: BTreeSet<TaskId>,
}

impl InMemoryLedger {
    /// Creates an empty ledger with default storage limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty ledger with the given storage limits.
    #[must_use]
    pub fn with_limits(limits: StorageLimits) -> Self {
        let state = LedgerState {
            balances: HashMap::new(),
            tasks: TaskTable::new(limits),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    /// Credits `amount` to `account` outside of any task operation.
    ///
    /// # Errors
    ///
    /// Returns [`LedgerError::BalanceOverflow`] when the credit overflows, or
    /// [`LedgerError::Runtime`] when the state lock is poisoned.
    pub fn fund(&self, account: &AccountId, amount: Amount) -> LedgerResult<()> {
        let mut state = self
            .state
            .write()
            .map_err(|err| LedgerError::runtime(std::io::Error::other(err.to_string())))?;
        state.credit(account, amount)
    }
}

impl LedgerState {
    fn balance_of(&self, account: &AccountId) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    fn credit(&mut self, account: &AccountId, amount: Amount) -> LedgerResult<()> {
        let credited = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or_else(|| LedgerError::BalanceOverflow(account.clone()))?;
        self.balances.insert(account.clone(), credited);
        Ok(())
    }

    fn remember_balance(&self, account: &AccountId, journal: &mut Journal) {
        let prior = self.balances.get(account).copied();
        journal.undo.push(Undo::Balance(account.clone(), prior));
    }

    fn transfer(&mut self, payment: &Payment, journal: &mut Journal) -> LedgerResult<()> {
        let sender = payment.sender();
        let available = self.balance_of(sender);
        let debited = available.checked_sub(payment.amount()).ok_or_else(|| {
            LedgerError::InsufficientFunds {
                account: sender.clone(),
                needed: payment.amount(),
                available,
            }
        })?;
        self.remember_balance(sender, journal);
        self.remember_balance(payment.receiver(), journal);
        self.balances.insert(sender.clone(), debited);
        self.credit(payment.receiver(), payment.amount())
    }

    fn update_task(
        &mut self,
        update: TaskUpdate,
        at: chrono::DateTime<chrono::Utc>,
        journal: &mut Journal,
    ) -> RegistryResult<()> {
        let TaskUpdate {
            task_id,
            expected_status,
            updates,
        } = update;
        let stored = self.tasks.get(task_id)?;
        if stored.status() != expected_status {
            return Err(RegistryError::StatusConflict {
                task_id,
                expected: expected_status,
                found: stored.status(),
            });
        }
        journal.undo.push(Undo::Record(stored.clone()));
        for field in updates {
            self.tasks.update_field(task_id, field, at)?;
        }
        journal.touched.insert(task_id);
        Ok(())
    }

    fn apply(&mut self, unit: AtomicUnit, journal: &mut Journal) -> LedgerResult<()> {
        let at = unit.committed_at();
        for step in unit.into_steps() {
            match step {
                LedgerStep::Transfer(payment) => self.transfer(&payment, journal)?,
                LedgerStep::CreateTask(draft) => {
                    let task_id = self.tasks.allocate_and_create(draft, at)?;
                    journal.undo.push(Undo::Creation(task_id));
                    journal.created = Some(task_id);
                    journal.touched.insert(task_id);
                }
                LedgerStep::UpdateTask(update) => self.update_task(update, at, journal)?,
            }
        }
        Ok(())
    }

    fn roll_back(&mut self, journal: Journal) {
        for undo in journal.undo.into_iter().rev() {
            match undo {
                Undo::Balance(account, Some(prior)) => {
                    self.balances.insert(account, prior);
                }
                Undo::Balance(account, None) => {
                    self.balances.remove(&account);
                }
                Undo::Record(task) => self.tasks.restore(task),
                Undo::Creation(task_id) => self.tasks.discard(task_id),
            }
        }
    }
}

#[async_trait]
impl LedgerRuntime for InMemoryLedger {
    async fn commit(&self, unit: AtomicUnit) -> LedgerResult<CommitReceipt> {
        let committed_at = unit.committed_at();
        let mut state = self
            .state
            .write()
            .map_err(|err| LedgerError::runtime(std::io::Error::other(err.to_string())))?;

        let mut journal = Journal::default();
        if let Err(err) = state.apply(unit, &mut journal) {
            state.roll_back(journal);
            return Err(err);
        }
        let tasks = journal
            .touched
            .iter()
            .filter_map(|task_id| state.tasks.get(*task_id).ok().cloned())
            .collect();

        Ok(CommitReceipt::new(
            Uuid::new_v4(),
            committed_at,
            journal.created,
            tasks,
        ))
    }

    async fn balance(&self, account: &AccountId) -> LedgerResult<Amount> {
        let state = self
            .state
            .read()
            .map_err(|err| LedgerError::runtime(std::io::Error::other(err.to_string())))?;
        Ok(state.balance_of(account))
    }
}

#[async_trait]
impl TaskRegistry for InMemoryLedger {
    async fn get(&self, task_id: TaskId) -> RegistryResult<Task> {
        let state = self.state.read().map_err(|err| {
            RegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        state.tasks.get(task_id).cloned()
    }

    async fn list(&self, filter: &TaskFilter) -> RegistryResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| {
            RegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.select(filter).cloned().collect())
    }

    async fn next_task_id(&self) -> RegistryResult<TaskId> {
        let state = self.state.read().map_err(|err| {
            RegistryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.tasks.next_id())
    }
}
