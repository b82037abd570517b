//! Named operations exposed by the board.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the six operations a caller can invoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Creates a task with escrowed funds.
    CreateTask,
    /// Claims an open task.
    ClaimTask,
    /// Submits proof of work for a claimed task.
    SubmitWork,
    /// Approves submitted work and pays the freelancer.
    ApproveTask,
    /// Rejects submitted work so it can be resubmitted.
    RejectTask,
    /// Returns the escrow to the client.
    RefundTask,
}

/// Wire type of an operation argument or return value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ValueKind {
    /// UTF-8 text.
    #[serde(rename = "string")]
    Text,
    /// Unsigned 64-bit integer.
    #[serde(rename = "uint64")]
    Uint64,
    /// Unix timestamp in seconds.
    #[serde(rename = "timestamp")]
    Timestamp,
    /// Fund-lock payment submitted in the same atomic group.
    #[serde(rename = "pay")]
    Payment,
    /// No value.
    #[serde(rename = "void")]
    Void,
}

/// Named, typed operation argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct OperationArgument {
    /// Argument name.
    pub name: &'static str,
    /// Argument wire type.
    #[serde(rename = "type")]
    pub kind: ValueKind,
}

const fn argument(name: &'static str, kind: ValueKind) -> OperationArgument {
    OperationArgument { name, kind }
}

const CREATE_TASK_ARGUMENTS: &[OperationArgument] = &[
    argument("title", ValueKind::Text),
    argument("description", ValueKind::Text),
    argument("deadline", ValueKind::Timestamp),
    argument("payment", ValueKind::Payment),
];
const TASK_ID_ARGUMENTS: &[OperationArgument] = &[argument("task_id", ValueKind::Uint64)];
const SUBMIT_WORK_ARGUMENTS: &[OperationArgument] = &[
    argument("task_id", ValueKind::Uint64),
    argument("proof_hash", ValueKind::Text),
];

impl Operation {
    /// Every operation in declaration order.
    pub const ALL: [Self; 6] = [
        Self::CreateTask,
        Self::ClaimTask,
        Self::SubmitWork,
        Self::ApproveTask,
        Self::RejectTask,
        Self::RefundTask,
    ];

    /// Returns the operation name used on the wire.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::CreateTask => "create_task",
            Self::ClaimTask => "claim_task",
            Self::SubmitWork => "submit_work",
            Self::ApproveTask => "approve_task",
            Self::RejectTask => "reject_task",
            Self::RefundTask => "refund_task",
        }
    }

    /// Returns the name of the event emitted on success.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::CreateTask => "task_created",
            Self::ClaimTask => "task_claimed",
            Self::SubmitWork => "work_submitted",
            Self::ApproveTask => "task_approved",
            Self::RejectTask => "task_rejected",
            Self::RefundTask => "task_refunded",
        }
    }

    /// Returns a one-line description.
    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::CreateTask => "Create a new task with escrow payment",
            Self::ClaimTask => "Claim an open task",
            Self::SubmitWork => "Submit work proof for a claimed task",
            Self::ApproveTask => "Approve completed task and release payment",
            Self::RejectTask => "Reject submitted work",
            Self::RefundTask => "Refund task if deadline passed or by client",
        }
    }

    /// Returns the explicit arguments. The caller identity is implicit.
    #[must_use]
    pub const fn arguments(self) -> &'static [OperationArgument] {
        match self {
            Self::CreateTask => CREATE_TASK_ARGUMENTS,
            Self::SubmitWork => SUBMIT_WORK_ARGUMENTS,
            Self::ClaimTask | Self::ApproveTask | Self::RejectTask | Self::RefundTask => {
                TASK_ID_ARGUMENTS
            }
        }
    }

    /// Returns the wire type of the result.
    #[must_use]
    pub const fn returns(self) -> ValueKind {
        match self {
            Self::CreateTask => ValueKind::Uint64,
            _ => ValueKind::Void,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}
