//! Shared world state for escrow lifecycle BDD scenarios.

use std::sync::Arc;

use bountyboard::escrow::{
    adapters::memory::{InMemoryLedger, ManualClock, RecordingEventPublisher},
    domain::{AccountId, Task},
    services::{EscrowError, EscrowLifecycleService},
};
use chrono::{TimeZone, Utc};
use rstest::fixture;

/// Service type used by the BDD world.
pub type TestEscrowService =
    EscrowLifecycleService<InMemoryLedger, InMemoryLedger, RecordingEventPublisher, ManualClock>;

/// Scenario world for escrow lifecycle behaviour tests.
pub struct EscrowWorld {
    pub service: TestEscrowService,
    pub ledger: Arc<InMemoryLedger>,
    pub clock: Arc<ManualClock>,
    pub current_task: Option<Task>,
    pub last_result: Option<Result<Task, EscrowError>>,
}

impl EscrowWorld {
    /// Creates a world with an empty ledger and a fixed clock.
    #[must_use]
    pub fn new() -> Self {
        let ledger = Arc::new(InMemoryLedger::new());
        let start = Utc
            .with_ymd_and_hms(2026, 1, 1, 0, 0, 0)
            .single()
            .unwrap_or_else(Utc::now);
        let clock = Arc::new(ManualClock::new(start));
        let service = EscrowLifecycleService::new(
            Arc::clone(&ledger),
            Arc::clone(&ledger),
            Arc::new(RecordingEventPublisher::new()),
            Arc::clone(&clock),
        );

        Self {
            service,
            ledger,
            clock,
            current_task: None,
            last_result: None,
        }
    }

    /// Returns the identifier of the task the scenario is working on.
    ///
    /// # Errors
    ///
    /// Returns an error when no task has been created yet.
    pub fn current_task_id(&self) -> Result<bountyboard::escrow::domain::TaskId, eyre::Report> {
        self.current_task
            .as_ref()
            .map(Task::id)
            .ok_or_else(|| eyre::eyre!("missing current task in scenario world"))
    }

    /// Records an operation result, tracking the task on success.
    pub fn record(&mut self, result: Result<Task, EscrowError>) {
        if let Ok(ref updated) = result {
            self.current_task = Some(updated.clone());
        }
        self.last_result = Some(result);
    }
}

impl Default for EscrowWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses a scenario account name.
///
/// # Errors
///
/// Returns an error when the name is not a valid account identifier.
pub fn account(name: &str) -> Result<AccountId, eyre::Report> {
    AccountId::new(name).map_err(|err| eyre::eyre!("invalid account {name:?}: {err}"))
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> EscrowWorld {
    EscrowWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
