//! Machine-readable description of the board's external interface.
//!
//! The description is derived from [`Operation`] and [`TaskStatus`] so that
//! integrators and the implementation cannot drift apart.

use super::{AccountId, Operation, OperationArgument, TaskStatus, ValueKind};
use serde::Serialize;
use std::collections::BTreeMap;

/// Contract name published in interface descriptions.
pub const CONTRACT_NAME: &str = "BountyBoard";

/// Keys of the per-task record exposed to external indexers.
pub const RECORD_FIELDS: [&str; 8] = [
    "client",
    "freelancer",
    "amount",
    "deadline",
    "status",
    "title",
    "description",
    "proof",
];

/// Description of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationDescriptor {
    /// Operation name.
    pub name: &'static str,
    /// One-line description.
    pub desc: &'static str,
    /// Explicit arguments.
    pub args: &'static [OperationArgument],
    /// Result type.
    pub returns: ValueKind,
    /// Event emitted on success.
    pub emits: &'static str,
}

impl From<Operation> for OperationDescriptor {
    fn from(operation: Operation) -> Self {
        Self {
            name: operation.name(),
            desc: operation.summary(),
            args: operation.arguments(),
            returns: operation.returns(),
            emits: operation.event_name(),
        }
    }
}

/// Complete interface description.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDescription {
    name: &'static str,
    version: &'static str,
    custody_account: AccountId,
    methods: Vec<OperationDescriptor>,
    task_status: BTreeMap<&'static str, u8>,
    record_fields: [&'static str; 8],
    notes: BTreeMap<&'static str, &'static str>,
}

impl InterfaceDescription {
    /// Describes the board whose escrow is held by `custody_account`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bountyboard::escrow::domain::{AccountId, InterfaceDescription};
    ///
    /// let description = InterfaceDescription::describe(AccountId::custody_for("demo"));
    /// let json = description.to_json().expect("serializable description");
    /// assert_eq!(json["methods"][0]["name"], "create_task");
    /// assert_eq!(json["task_status"]["REFUNDED"], 5);
    /// ```
    #[must_use]
    pub fn describe(custody_account: AccountId) -> Self {
        let task_status = TaskStatus::ALL
            .into_iter()
            .map(|status| (status_key(status), status.code()))
            .collect();
        let notes = BTreeMap::from([
            (
                "create_task",
                "Requires an atomic group with a payment to the custody account",
            ),
            ("deadline", "Unix timestamp in seconds"),
            ("amounts", "Integer amounts in the ledger's smallest unit"),
        ]);

        Self {
            name: CONTRACT_NAME,
            version: env!("CARGO_PKG_VERSION"),
            custody_account,
            methods: Operation::ALL
                .into_iter()
                .map(OperationDescriptor::from)
                .collect(),
            task_status,
            record_fields: RECORD_FIELDS,
            notes,
        }
    }

    /// Returns the custody account named by the description.
    #[must_use]
    pub const fn custody_account(&self) -> &AccountId {
        &self.custody_account
    }

    /// Returns the operation descriptors.
    #[must_use]
    pub fn methods(&self) -> &[OperationDescriptor] {
        &self.methods
    }

    /// Renders the description as a JSON value.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the description cannot be encoded.
    pub fn to_json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// Renders the description as pretty-printed JSON text.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if the description cannot be encoded.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

const fn status_key(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Open => "OPEN",
        TaskStatus::Claimed => "CLAIMED",
        TaskStatus::Submitted => "SUBMITTED",
        TaskStatus::Approved => "APPROVED",
        TaskStatus::Rejected => "REJECTED",
        TaskStatus::Refunded => "REFUNDED",
    }
}
