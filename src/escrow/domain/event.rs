//! Structured events emitted after successful operations.

use super::{AccountId, Operation, Payment, TaskId};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Record of a committed operation, consumed by off-system observers.
///
/// # Examples
///
/// ```
/// use bountyboard::escrow::domain::{AccountId, Operation, TaskEvent, TaskId};
/// use chrono::Utc;
///
/// let actor = AccountId::new("FREELANCER").expect("valid account");
/// let event = TaskEvent::new(Operation::ClaimTask, TaskId::new(0), actor, Utc::now());
/// let json = serde_json::to_value(&event).expect("serializable event");
/// assert_eq!(json["operation_name"], "claim_task");
/// assert_eq!(json["event_name"], "task_claimed");
/// assert_eq!(json["task_id"], 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskEvent {
    operation_name: Operation,
    event_name: &'static str,
    task_id: TaskId,
    actor: AccountId,
    occurred_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    payout: Option<Payment>,
}

impl TaskEvent {
    /// Creates an event for `operation` on `task_id` performed by `actor`.
    #[must_use]
    pub const fn new(
        operation: Operation,
        task_id: TaskId,
        actor: AccountId,
        occurred_at: DateTime<Utc>,
    ) -> Self {
        Self {
            operation_name: operation,
            event_name: operation.event_name(),
            task_id,
            actor,
            occurred_at,
            payout: None,
        }
    }

    /// Attaches the payment released by a terminal transition.
    #[must_use]
    pub fn with_payout(mut self, payout: Payment) -> Self {
        self.payout = Some(payout);
        self
    }

    /// Returns the operation that produced the event.
    #[must_use]
    pub const fn operation(&self) -> Operation {
        self.operation_name
    }

    /// Returns the event name.
    #[must_use]
    pub const fn event_name(&self) -> &'static str {
        self.event_name
    }

    /// Returns the affected task.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the caller that performed the operation.
    #[must_use]
    pub const fn actor(&self) -> &AccountId {
        &self.actor
    }

    /// Returns the commit timestamp.
    #[must_use]
    pub const fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }

    /// Returns the released payment, if any.
    #[must_use]
    pub const fn payout(&self) -> Option<&Payment> {
        self.payout.as_ref()
    }
}
