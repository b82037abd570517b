//! Escrow state machine.
//!
//! Each [`TaskTransition`] is one row of the transition table: the statuses it
//! may start from, the identity [`Guard`] the caller must satisfy, the status
//! it produces, and whether it releases the escrow. [`Task::plan`] evaluates a
//! row against a task without mutating it and yields a [`TransitionPlan`]
//! describing the field writes and optional payout to commit.

use super::{
    AccountId, Amount, EscrowDomainError, Operation, ProofReference, Task, TaskFieldUpdate,
    TaskId, TaskStatus,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post-creation transitions of the escrow state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskTransition {
    /// `open` to `claimed`.
    Claim,
    /// `claimed` to `submitted`.
    SubmitWork,
    /// `submitted` to `approved`, paying the freelancer.
    Approve,
    /// `submitted` back to `claimed`, clearing the proof.
    Reject,
    /// `open` or `claimed` to `refunded`, repaying the client.
    Refund,
}

impl TaskTransition {
    /// Every transition in table order.
    pub const ALL: [Self; 5] = [
        Self::Claim,
        Self::SubmitWork,
        Self::Approve,
        Self::Reject,
        Self::Refund,
    ];

    /// Returns the operation that triggers this transition.
    #[must_use]
    pub const fn operation(self) -> Operation {
        match self {
            Self::Claim => Operation::ClaimTask,
            Self::SubmitWork => Operation::SubmitWork,
            Self::Approve => Operation::ApproveTask,
            Self::Reject => Operation::RejectTask,
            Self::Refund => Operation::RefundTask,
        }
    }

    /// Returns whether the transition may start from `status`.
    #[must_use]
    pub const fn accepts(self, status: TaskStatus) -> bool {
        matches!(
            (self, status),
            (Self::Claim, TaskStatus::Open)
                | (Self::SubmitWork, TaskStatus::Claimed)
                | (Self::Approve | Self::Reject, TaskStatus::Submitted)
                | (Self::Refund, TaskStatus::Open | TaskStatus::Claimed)
        )
    }

    /// Returns the status the task holds after the transition.
    #[must_use]
    pub const fn target(self) -> TaskStatus {
        match self {
            Self::Claim | Self::Reject => TaskStatus::Claimed,
            Self::SubmitWork => TaskStatus::Submitted,
            Self::Approve => TaskStatus::Approved,
            Self::Refund => TaskStatus::Refunded,
        }
    }

    /// Returns the identity guard the caller must satisfy.
    #[must_use]
    pub const fn guard(self) -> Guard {
        match self {
            Self::Claim => Guard::NotClient,
            Self::SubmitWork => Guard::Freelancer,
            Self::Approve | Self::Reject => Guard::Client,
            Self::Refund => Guard::ClientOrDeadlinePassed,
        }
    }

    /// Returns whether the transition moves the escrow out of custody.
    #[must_use]
    pub const fn releases_escrow(self) -> bool {
        matches!(self, Self::Approve | Self::Refund)
    }
}

/// Identity predicate attached to a transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Guard {
    /// Anyone except the task's client or the custody account.
    NotClient,
    /// Only the recorded freelancer.
    Freelancer,
    /// Only the task's client.
    Client,
    /// The client at any time, anyone once the deadline has passed.
    ClientOrDeadlinePassed,
}

impl Guard {
    /// Returns whether `caller` satisfies the guard for `task` at `now`.
    ///
    /// `custody` is the account holding escrowed funds; it never satisfies
    /// [`Guard::NotClient`].
    #[must_use]
    pub fn permits(
        self,
        task: &Task,
        caller: &AccountId,
        custody: &AccountId,
        now: DateTime<Utc>,
    ) -> bool {
        match self {
            Self::NotClient => task.client() != caller && caller != custody,
            Self::Freelancer => task.freelancer() == Some(caller),
            Self::Client => task.client() == caller,
            Self::ClientOrDeadlinePassed => task.client() == caller || now > task.deadline(),
        }
    }
}

/// Caller request for a post-creation transition, with its payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskCommand {
    /// Claim the task for the caller.
    Claim,
    /// Submit the given proof of work.
    SubmitWork(ProofReference),
    /// Approve the submitted work.
    Approve,
    /// Reject the submitted work.
    Reject,
    /// Refund the escrow to the client.
    Refund,
}

impl TaskCommand {
    /// Returns the table row this command exercises.
    #[must_use]
    pub const fn transition(&self) -> TaskTransition {
        match self {
            Self::Claim => TaskTransition::Claim,
            Self::SubmitWork(_) => TaskTransition::SubmitWork,
            Self::Approve => TaskTransition::Approve,
            Self::Reject => TaskTransition::Reject,
            Self::Refund => TaskTransition::Refund,
        }
    }
}

/// Outbound transfer of a task's escrow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payout {
    receiver: AccountId,
    amount: Amount,
}

impl Payout {
    /// Returns the credited account.
    #[must_use]
    pub const fn receiver(&self) -> &AccountId {
        &self.receiver
    }

    /// Returns the paid amount.
    #[must_use]
    pub const fn amount(&self) -> Amount {
        self.amount
    }
}

/// Validated effect of a transition, ready to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionPlan {
    task_id: TaskId,
    transition: TaskTransition,
    expected_status: TaskStatus,
    updates: Vec<TaskFieldUpdate>,
    payout: Option<Payout>,
}

impl TransitionPlan {
    /// Returns the task identifier.
    #[must_use]
    pub const fn task_id(&self) -> TaskId {
        self.task_id
    }

    /// Returns the transition that was evaluated.
    #[must_use]
    pub const fn transition(&self) -> TaskTransition {
        self.transition
    }

    /// Returns the status observed when the guards passed.
    ///
    /// Committing the plan must fail if the stored status no longer matches.
    #[must_use]
    pub const fn expected_status(&self) -> TaskStatus {
        self.expected_status
    }

    /// Returns the field writes, status first.
    #[must_use]
    pub fn updates(&self) -> &[TaskFieldUpdate] {
        &self.updates
    }

    /// Returns the escrow release, if the transition is terminal.
    #[must_use]
    pub const fn payout(&self) -> Option<&Payout> {
        self.payout.as_ref()
    }

    /// Splits the plan into its field writes and payout.
    #[must_use]
    pub fn into_parts(self) -> (Vec<TaskFieldUpdate>, Option<Payout>) {
        (self.updates, self.payout)
    }
}

impl Task {
    /// Evaluates `command` for `caller` at `now` without mutating the task.
    ///
    /// `custody` names the account holding escrowed funds.
    ///
    /// The precondition status is checked before the identity guard.
    ///
    /// # Errors
    ///
    /// Returns [`EscrowDomainError::InvalidState`] when the task's status is
    /// not accepted by the transition, [`EscrowDomainError::Unauthorized`]
    /// when the caller fails the guard, and
    /// [`EscrowDomainError::MissingFreelancer`] when an approval finds no
    /// freelancer to pay.
    pub fn plan(
        &self,
        command: TaskCommand,
        caller: &AccountId,
        custody: &AccountId,
        now: DateTime<Utc>,
    ) -> Result<TransitionPlan, EscrowDomainError> {
        let transition = command.transition();
        if !transition.accepts(self.status()) {
            return Err(EscrowDomainError::InvalidState {
                task_id: self.id(),
                operation: transition.operation(),
                status: self.status(),
            });
        }
        if !transition.guard().permits(self, caller, custody, now) {
            return Err(EscrowDomainError::Unauthorized {
                task_id: self.id(),
                operation: transition.operation(),
                caller: caller.clone(),
            });
        }

        let status_update = TaskFieldUpdate::Status(transition.target());
        let updates = match command {
            TaskCommand::Claim => vec![status_update, TaskFieldUpdate::Freelancer(caller.clone())],
            TaskCommand::SubmitWork(proof) => {
                vec![status_update, TaskFieldUpdate::Proof(Some(proof))]
            }
            TaskCommand::Reject => vec![status_update, TaskFieldUpdate::Proof(None)],
            TaskCommand::Approve | TaskCommand::Refund => vec![status_update],
        };

        let payout = match transition {
            TaskTransition::Approve => {
                let freelancer = self
                    .freelancer()
                    .ok_or(EscrowDomainError::MissingFreelancer(self.id()))?;
                Some(Payout {
                    receiver: freelancer.clone(),
                    amount: self.amount(),
                })
            }
            TaskTransition::Refund => Some(Payout {
                receiver: self.client().clone(),
                amount: self.amount(),
            }),
            TaskTransition::Claim | TaskTransition::SubmitWork | TaskTransition::Reject => None,
        };

        Ok(TransitionPlan {
            task_id: self.id(),
            transition,
            expected_status: self.status(),
            updates,
            payout,
        })
    }
}
