//! Service layer for escrow task lifecycle orchestration.
//!
//! Each operation reads the committed task, plans the transition against
//! the current clock reading, and submits everything the transition does as
//! one ledger atomic unit. Events are published only after the unit commits.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mockable::Clock;
use tracing::{debug, info, warn};

use super::error::{EscrowError, EscrowResult};
use crate::escrow::{
    config::EscrowConfig,
    domain::{
        AccountId, Amount, EscrowDomainError, NewTask, Operation, Payment, ProofReference, Task,
        TaskCommand, TaskDescription, TaskEvent, TaskId, TaskTitle,
    },
    ports::{
        AtomicUnit, CommitReceipt, LedgerError, LedgerRuntime, TaskEventPublisher, TaskFilter,
        TaskRegistry, TaskUpdate,
    },
};

/// Request payload for creating an escrowed task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: String,
    deadline: DateTime<Utc>,
    locked_funds: Amount,
    fund_lock: Option<Payment>,
}

impl CreateTaskRequest {
    /// Creates a request with an empty description and no fund lock.
    #[must_use]
    pub fn new(title: impl Into<String>, deadline: DateTime<Utc>, locked_funds: Amount) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            deadline,
            locked_funds,
            fund_lock: None,
        }
    }

    /// Sets the task description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Pairs the request with the payment that locks its funds.
    #[must_use]
    pub fn with_fund_lock(mut self, fund_lock: Payment) -> Self {
        self.fund_lock = Some(fund_lock);
        self
    }

    /// Returns the declared escrow amount.
    #[must_use]
    pub const fn locked_funds(&self) -> Amount {
        self.locked_funds
    }

    /// Returns the deadline.
    #[must_use]
    pub const fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }
}

/// Escrow lifecycle orchestration service.
#[derive(Clone)]
pub struct EscrowLifecycleService<R, L, P, C>
where
    R: TaskRegistry,
    L: LedgerRuntime,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    registry: Arc<R>,
    ledger: Arc<L>,
    publisher: Arc<P>,
    clock: Arc<C>,
    config: EscrowConfig,
}

impl<R, L, P, C> EscrowLifecycleService<R, L, P, C>
where
    R: TaskRegistry,
    L: LedgerRuntime,
    P: TaskEventPublisher,
    C: Clock + Send + Sync,
{
    /// Creates a service with default configuration.
    #[must_use]
    pub fn new(registry: Arc<R>, ledger: Arc<L>, publisher: Arc<P>, clock: Arc<C>) -> Self {
        Self {
            registry,
            ledger,
            publisher,
            clock,
            config: EscrowConfig::default(),
        }
    }

    /// Replaces the service configuration.
    #[must_use]
    pub fn with_config(mut self, config: EscrowConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &EscrowConfig {
        &self.config
    }

    /// Returns the account holding escrowed funds.
    #[must_use]
    pub const fn custody_account(&self) -> &AccountId {
        self.config.custody_account()
    }

    /// Creates a task together with its fund lock.
    ///
    /// The fund lock and the record creation commit as one unit; when either
    /// fails no record exists and the identifier counter is unchanged.
    ///
    /// # Errors
    ///
    /// Returns an [`EscrowError`] classified as `InvalidArgument` for malformed
    /// input, `AtomicGroupViolation` when the fund lock is missing, not paid
    /// by the caller from outside custody, mis-sized or unfunded, and
    /// `StorageExhausted` when the record cannot be stored.
    pub async fn create_task(
        &self,
        caller: &AccountId,
        request: CreateTaskRequest,
    ) -> EscrowResult<Task> {
        let now = self.clock.utc();
        let (draft, fund_lock) = self.validate_creation(caller, request, now)?;
        let unit = AtomicUnit::new(now).transfer(fund_lock).create_task(draft);
        let receipt = self.ledger.commit(unit).await.map_err(unfunded_lock)?;
        let commit_id = receipt.commit_id();

        let task_id = receipt.created().ok_or_else(|| {
            LedgerError::runtime(std::io::Error::other("commit receipt lacks created task"))
        })?;
        let task = take_snapshot(receipt, task_id)?;
        info!(
            task_id = task.id().value(),
            operation = Operation::CreateTask.name(),
            amount = task.amount().value(),
            %commit_id,
            "escrow task created"
        );
        self.emit(TaskEvent::new(Operation::CreateTask, task_id, caller.clone(), now))
            .await;
        Ok(task)
    }

    /// Claims an open task for `caller`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidState` unless the task is open, or
    /// `Unauthorized` when the caller is the task's client.
    pub async fn claim_task(&self, caller: &AccountId, task_id: TaskId) -> EscrowResult<Task> {
        self.transition(caller, task_id, TaskCommand::Claim).await
    }

    /// Records the freelancer's proof of completed work.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for an empty or oversized proof, `NotFound`,
    /// `InvalidState` unless the task is claimed, or `Unauthorized` when the
    /// caller is not the freelancer.
    pub async fn submit_work(
        &self,
        caller: &AccountId,
        task_id: TaskId,
        proof: impl Into<String>,
    ) -> EscrowResult<Task> {
        let proof_reference = ProofReference::new(proof, self.config.max_proof_chars())?;
        self.transition(caller, task_id, TaskCommand::SubmitWork(proof_reference))
            .await
    }

    /// Approves submitted work and pays the freelancer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidState` unless the task is submitted, or
    /// `Unauthorized` when the caller is not the client.
    pub async fn approve_task(&self, caller: &AccountId, task_id: TaskId) -> EscrowResult<Task> {
        self.transition(caller, task_id, TaskCommand::Approve).await
    }

    /// Rejects submitted work, returning the task to the freelancer.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidState` unless the task is submitted, or
    /// `Unauthorized` when the caller is not the client.
    pub async fn reject_task(&self, caller: &AccountId, task_id: TaskId) -> EscrowResult<Task> {
        self.transition(caller, task_id, TaskCommand::Reject).await
    }

    /// Refunds the escrow to the client.
    ///
    /// Anyone may refund once the deadline has passed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `InvalidState` unless the task is open or claimed,
    /// or `Unauthorized` when a non-client calls before the deadline.
    pub async fn refund_task(&self, caller: &AccountId, task_id: TaskId) -> EscrowResult<Task> {
        self.transition(caller, task_id, TaskCommand::Refund).await
    }

    /// Returns the committed task record.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` when no task has the identifier.
    pub async fn get_task(&self, task_id: TaskId) -> EscrowResult<Task> {
        Ok(self.registry.get(task_id).await?)
    }

    /// Lists tasks matching `filter` in ascending identifier order.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn list_tasks(&self, filter: &TaskFilter) -> EscrowResult<Vec<Task>> {
        Ok(self.registry.list(filter).await?)
    }

    /// Returns the identifier the next created task will receive.
    ///
    /// # Errors
    ///
    /// Returns registry failures.
    pub async fn next_task_id(&self) -> EscrowResult<TaskId> {
        Ok(self.registry.next_task_id().await?)
    }

    /// Returns the balance held in custody.
    ///
    /// # Errors
    ///
    /// Returns ledger failures.
    pub async fn custody_balance(&self) -> EscrowResult<Amount> {
        self.balance(self.config.custody_account()).await
    }

    /// Returns the balance of `account`.
    ///
    /// # Errors
    ///
    /// Returns ledger failures.
    pub async fn balance(&self, account: &AccountId) -> EscrowResult<Amount> {
        Ok(self.ledger.balance(account).await?)
    }

    fn validate_creation(
        &self,
        caller: &AccountId,
        request: CreateTaskRequest,
        now: DateTime<Utc>,
    ) -> EscrowResult<(NewTask, Payment)> {
        let CreateTaskRequest {
            title,
            description,
            deadline,
            locked_funds,
            fund_lock,
        } = request;

        let validated_title = TaskTitle::new(title, self.config.max_title_chars())?;
        let validated_description =
            TaskDescription::new(description, self.config.max_description_chars())?;
        if locked_funds.is_zero() {
            return Err(EscrowDomainError::ZeroAmount.into());
        }
        if self.config.reject_past_deadlines() && deadline <= now {
            return Err(EscrowDomainError::DeadlineInPast { deadline, now }.into());
        }

        let payment = fund_lock.ok_or(EscrowDomainError::MissingFundLock)?;
        let custody = self.config.custody_account();
        if payment.sender() == custody {
            return Err(EscrowDomainError::FundLockFromCustody(custody.clone()).into());
        }
        if payment.sender() != caller {
            return Err(EscrowDomainError::FundLockSenderMismatch {
                expected: caller.clone(),
                found: payment.sender().clone(),
            }
            .into());
        }
        if payment.receiver() != custody {
            return Err(EscrowDomainError::FundLockRecipientMismatch {
                expected: custody.clone(),
                found: payment.receiver().clone(),
            }
            .into());
        }
        if payment.amount() != locked_funds {
            return Err(EscrowDomainError::FundLockAmountMismatch {
                declared: locked_funds,
                locked: payment.amount(),
            }
            .into());
        }

        let draft = NewTask {
            client: caller.clone(),
            amount: locked_funds,
            deadline,
            title: validated_title,
            description: validated_description,
        };
        Ok((draft, payment))
    }

    async fn transition(
        &self,
        caller: &AccountId,
        task_id: TaskId,
        command: TaskCommand,
    ) -> EscrowResult<Task> {
        let operation = command.transition().operation();
        let now = self.clock.utc();
        let task = self.registry.get(task_id).await?;
        let custody = self.config.custody_account();
        let plan = task.plan(command, caller, custody, now).inspect_err(|err| {
            debug!(
                task_id = task_id.value(),
                operation = operation.name(),
                caller = caller.as_str(),
                error = %err,
                "escrow transition refused"
            );
        })?;

        let expected_status = plan.expected_status();
        let (updates, payout) = plan.into_parts();
        let mut unit = AtomicUnit::new(now).update_task(TaskUpdate {
            task_id,
            expected_status,
            updates,
        });
        let payment = payout.map(|released| {
            Payment::new(
                custody.clone(),
                released.receiver().clone(),
                released.amount(),
            )
        });
        if let Some(released) = payment.clone() {
            unit = unit.transfer(released);
        }

        let receipt = self.ledger.commit(unit).await?;
        let commit_id = receipt.commit_id();
        let updated = take_snapshot(receipt, task_id)?;
        info!(
            task_id = task_id.value(),
            operation = operation.name(),
            status = updated.status().as_str(),
            %commit_id,
            "escrow task updated"
        );

        let event = TaskEvent::new(operation, task_id, caller.clone(), now);
        let event_with_payout = match payment {
            Some(released) => event.with_payout(released),
            None => event,
        };
        self.emit(event_with_payout).await;
        Ok(updated)
    }

    async fn emit(&self, event: TaskEvent) {
        if let Err(err) = self.publisher.publish(&event).await {
            warn!(
                task_id = event.task_id().value(),
                event = event.event_name(),
                error = %err,
                "failed to publish escrow event"
            );
        }
    }
}

/// Reports a creation the caller cannot pay for as a fund-lock fault.
fn unfunded_lock(err: LedgerError) -> EscrowError {
    match err {
        LedgerError::InsufficientFunds {
            account,
            needed,
            available,
        } => EscrowDomainError::UnfundedFundLock {
            account,
            needed,
            available,
        }
        .into(),
        other => other.into(),
    }
}

fn take_snapshot(receipt: CommitReceipt, task_id: TaskId) -> EscrowResult<Task> {
    receipt.into_task(task_id).ok_or_else(|| {
        LedgerError::runtime(std::io::Error::other(format!(
            "commit receipt lacks snapshot of task {task_id}"
        )))
        .into()
    })
}
