//! Event publication port.

use crate::escrow::domain::TaskEvent;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for event publication.
pub type EventPublishResult<T> = Result<T, EventPublishError>;

/// Sink for events describing committed operations.
#[async_trait]
pub trait TaskEventPublisher: Send + Sync {
    /// Publishes one event.
    ///
    /// # Errors
    ///
    /// Returns [`EventPublishError`] when the sink cannot accept the event.
    async fn publish(&self, event: &TaskEvent) -> EventPublishResult<()>;
}

/// Errors returned by event publishers.
#[derive(Debug, Clone, Error)]
pub enum EventPublishError {
    /// The sink refused or lost the event.
    #[error("event sink error: {0}")]
    Sink(Arc<dyn std::error::Error + Send + Sync>),
}

impl EventPublishError {
    /// Wraps a sink error.
    pub fn sink(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Sink(Arc::new(err))
    }
}
