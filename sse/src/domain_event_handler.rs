use crate::message::Notification;
use crate::Hub;
use async_trait::async_trait;
use events::{DomainEvent, EventHandler};
use log::*;

/// Handles domain events by converting them to notification envelopes and
/// broadcasting them through the hub.
///
/// Push-path failures end here: a serialization problem is logged and the
/// event skipped, never surfaced to the CRUD request that triggered it.
pub struct SseDomainEventHandler {
    hub: Hub,
}

impl SseDomainEventHandler {
    pub fn new(hub: Hub) -> Self {
        Self { hub }
    }

    fn broadcast(&self, notification: Notification) {
        match serde_json::to_string(&notification) {
            Ok(payload) => self.hub.broadcast(payload),
            Err(e) => error!("Failed to serialize SSE notification: {e}"),
        }
    }
}

#[async_trait]
impl EventHandler for SseDomainEventHandler {
    async fn handle(&self, event: &DomainEvent) {
        match event {
            DomainEvent::TodoCreated { todo } => {
                debug!("Handling TodoCreated event");
                self.broadcast(Notification::TodoCreated { todo: todo.clone() });
            }
            DomainEvent::TodoUpdated { todo } => {
                debug!("Handling TodoUpdated event");
                self.broadcast(Notification::TodoUpdated { todo: todo.clone() });
            }
            DomainEvent::TodoCompleted { todo } => {
                debug!("Handling TodoCompleted event");
                self.broadcast(Notification::TodoCompleted { todo: todo.clone() });
            }
            DomainEvent::TodoDeleted { todo_id } => {
                debug!("Handling TodoDeleted event for todo {todo_id}");
                self.broadcast(Notification::TodoDeleted { id: *todo_id });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Subscriber;
    use serde_json::json;
    use tokio::time::{sleep, timeout, Duration};

    #[tokio::test]
    async fn domain_event_is_broadcast_as_an_envelope() {
        let hub = Hub::spawn();
        let (subscriber, mut rx) = Subscriber::new("test");
        hub.register(subscriber);
        sleep(Duration::from_millis(20)).await;

        let handler = SseDomainEventHandler::new(hub.clone());
        handler
            .handle(&DomainEvent::TodoCreated {
                todo: json!({"id": 1, "title": "ship it"}),
            })
            .await;

        let payload = timeout(Duration::from_secs(1), rx.recv())
            .await
            .expect("timed out waiting for the notification")
            .expect("queue closed unexpectedly");

        let value: serde_json::Value = serde_json::from_str(&payload).unwrap();
        assert_eq!(value["type"], "todo.created");
        assert_eq!(value["todo"]["title"], "ship it");
    }
}
