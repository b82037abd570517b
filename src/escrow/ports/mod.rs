//! Port contracts for escrow task management.
//!
//! Ports define infrastructure-agnostic interfaces used by escrow services.

pub mod events;
pub mod ledger;
pub mod registry;

pub use events::{EventPublishError, EventPublishResult, TaskEventPublisher};
pub use ledger::{
    AtomicUnit, CommitReceipt, LedgerError, LedgerResult, LedgerRuntime, LedgerStep, TaskUpdate,
};
pub use registry::{RegistryError, RegistryResult, TaskFilter, TaskRegistry, TaskStore};
