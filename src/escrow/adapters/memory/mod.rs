//! In-memory adapters for escrow tests and embedding.

mod clock;
mod events;
mod ledger;
mod registry;

pub use clock::ManualClock;
pub use events::RecordingEventPublisher;
pub use ledger::InMemoryLedger;
pub use registry::{DEFAULT_RECORD_CAPACITY_BYTES, StorageLimits, TaskTable};
