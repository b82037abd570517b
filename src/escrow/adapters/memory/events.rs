//! Event publisher that keeps every event in memory.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::escrow::{
    domain::TaskEvent,
    ports::{EventPublishError, EventPublishResult, TaskEventPublisher},
};

/// Thread-safe publisher recording events in publication order.
#[derive(Debug, Clone, Default)]
pub struct RecordingEventPublisher {
    events: Arc<RwLock<Vec<TaskEvent>>>,
}

impl RecordingEventPublisher {
    /// Creates an empty publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the recorded events.
    ///
    /// A poisoned lock yields the events recorded before the poisoning.
    #[must_use]
    pub fn events(&self) -> Vec<TaskEvent> {
        match self.events.read() {
            Ok(events) => events.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

#[async_trait]
impl TaskEventPublisher for RecordingEventPublisher {
    async fn publish(&self, event: &TaskEvent) -> EventPublishResult<()> {
        let mut events = self
            .events
            .write()
            .map_err(|err| EventPublishError::sink(std::io::Error::other(err.to_string())))?;
        events.push(event.clone());
        Ok(())
    }
}
