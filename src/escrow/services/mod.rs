//! Application services for escrow task orchestration.

mod error;
mod lifecycle;

pub use error::{EscrowError, EscrowErrorKind, EscrowResult};
pub use lifecycle::{CreateTaskRequest, EscrowLifecycleService};
