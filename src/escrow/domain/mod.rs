//! Domain model for escrow-backed tasks.
//!
//! The domain holds the task record, its status machine, and the value types
//! exchanged with the ledger. It performs no I/O.

mod error;
mod event;
mod ids;
mod interface;
mod operation;
mod payment;
mod task;
mod text;
mod transition;

pub use error::{EscrowDomainError, ParseTaskStatusError};
pub use event::TaskEvent;
pub use ids::{AccountId, Amount, TaskId};
pub use interface::{CONTRACT_NAME, InterfaceDescription, OperationDescriptor, RECORD_FIELDS};
pub use operation::{Operation, OperationArgument, ValueKind};
pub use payment::Payment;
pub use task::{NewTask, Task, TaskFieldUpdate, TaskStatus};
pub use text::{ProofReference, TaskDescription, TaskTitle};
pub use transition::{Guard, Payout, TaskCommand, TaskTransition, TransitionPlan};
