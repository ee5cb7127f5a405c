//! Event system infrastructure for Todo Live.
//!
//! This crate provides the event system that enables loose coupling between
//! domain logic and infrastructure concerns (like SSE notifications).
//!
//! # Architecture
//!
//! - **DomainEvent**: Enum representing all business events in the system
//! - **EventHandler**: Trait for implementing event handlers
//! - **EventPublisher**: Publishes events to registered handlers
//!
//! This crate has no dependencies on internal crates (entity, domain, etc.),
//! avoiding circular dependencies. Entity data is carried as serialized JSON values.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

/// A type alias that represents any Entity's internal id field data type.
/// This matches the definition in the entity crate to maintain compatibility.
pub type Id = i64;

/// Domain events that represent business-level changes in the system.
/// These events are emitted when domain operations complete successfully.
///
/// Entity data is carried as `serde_json::Value` to avoid dependencies on
/// the entity crate.
#[derive(Debug, Clone)]
pub enum DomainEvent {
    /// Emitted when a new todo is created.
    TodoCreated {
        /// Complete serialized todo record, sent to connected clients so the
        /// frontend can update without a separate API call.
        todo: Value,
    },
    /// Emitted when a todo's fields are overwritten via a full update.
    TodoUpdated { todo: Value },
    /// Emitted when only a todo's completed flag changes.
    TodoCompleted { todo: Value },
    /// Emitted when a todo is permanently removed.
    /// Carries only the id since the record no longer exists.
    TodoDeleted { todo_id: Id },
}

/// Trait for handling domain events.
/// Implementations can perform side effects like sending notifications,
/// updating caches, logging, etc.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle(&self, event: &DomainEvent);
}

/// Publishes domain events to registered handlers.
/// Handlers are called sequentially in registration order.
#[derive(Clone)]
pub struct EventPublisher {
    handlers: Arc<Vec<Arc<dyn EventHandler>>>,
}

impl EventPublisher {
    pub fn new() -> Self {
        Self {
            handlers: Arc::new(Vec::new()),
        }
    }

    /// Register a new event handler.
    /// Note: This creates a new publisher instance with the additional handler.
    /// Store the returned publisher in your application state.
    pub fn with_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        let mut handlers = (*self.handlers).clone();
        handlers.push(handler);
        self.handlers = Arc::new(handlers);
        self
    }

    /// Publish an event to all registered handlers.
    /// Handlers are called sequentially and are expected to be infallible;
    /// a handler that fails internally must log and swallow its own error.
    pub async fn publish(&self, event: DomainEvent) {
        for handler in self.handlers.iter() {
            handler.handle(&event).await;
        }
    }
}

impl Default for EventPublisher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;

    struct RecordingHandler {
        label: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            let kind = match event {
                DomainEvent::TodoCreated { .. } => "created",
                DomainEvent::TodoUpdated { .. } => "updated",
                DomainEvent::TodoCompleted { .. } => "completed",
                DomainEvent::TodoDeleted { .. } => "deleted",
            };
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{kind}", self.label));
        }
    }

    #[tokio::test]
    async fn publish_calls_handlers_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new()
            .with_handler(Arc::new(RecordingHandler {
                label: "first",
                seen: seen.clone(),
            }))
            .with_handler(Arc::new(RecordingHandler {
                label: "second",
                seen: seen.clone(),
            }));

        publisher
            .publish(DomainEvent::TodoCreated {
                todo: json!({"id": 1, "title": "write tests"}),
            })
            .await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first:created".to_owned(), "second:created".to_owned()]
        );
    }

    #[tokio::test]
    async fn publish_with_no_handlers_is_a_no_op() {
        let publisher = EventPublisher::new();
        publisher
            .publish(DomainEvent::TodoDeleted { todo_id: 42 })
            .await;
    }
}
