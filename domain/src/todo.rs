use crate::error::Error;
use crate::todos::Model;
use crate::Id;
use entity_api::todo;
use events::{DomainEvent, EventPublisher};
use log::*;
use sea_orm::DatabaseConnection;
use serde_json::Value;

pub use entity_api::todo::{find_all, find_by_id};

pub async fn create(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    todo_model: Model,
) -> Result<Model, Error> {
    validate_title(&todo_model.title)?;

    let todo = todo::create(db, todo_model).await?;

    publish_with_record(event_publisher, &todo, |todo| DomainEvent::TodoCreated {
        todo,
    })
    .await;

    Ok(todo)
}

pub async fn update(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    id: Id,
    todo_model: Model,
) -> Result<Model, Error> {
    validate_title(&todo_model.title)?;

    let todo = todo::update(db, id, todo_model).await?;

    publish_with_record(event_publisher, &todo, |todo| DomainEvent::TodoUpdated {
        todo,
    })
    .await;

    Ok(todo)
}

pub async fn set_completed(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    id: Id,
    completed: bool,
) -> Result<Model, Error> {
    let todo = todo::set_completed(db, id, completed).await?;

    publish_with_record(event_publisher, &todo, |todo| DomainEvent::TodoCompleted {
        todo,
    })
    .await;

    Ok(todo)
}

pub async fn delete_by_id(
    db: &DatabaseConnection,
    event_publisher: &EventPublisher,
    id: Id,
) -> Result<(), Error> {
    todo::delete_by_id(db, id).await?;

    event_publisher
        .publish(DomainEvent::TodoDeleted { todo_id: id })
        .await;

    Ok(())
}

fn validate_title(title: &str) -> Result<(), Error> {
    if title.trim().is_empty() {
        return Err(Error::invalid());
    }
    Ok(())
}

/// Publishes an event carrying the full serialized record. A serialization
/// failure is logged and the event skipped: push-path problems never reach
/// the CRUD caller.
async fn publish_with_record(
    event_publisher: &EventPublisher,
    todo: &Model,
    build: impl FnOnce(Value) -> DomainEvent,
) {
    match serde_json::to_value(todo) {
        Ok(value) => event_publisher.publish(build(value)).await,
        Err(e) => warn!(
            "Skipping event for todo {}: failed to serialize record: {e}",
            todo.id
        ),
    }
}

#[cfg(test)]
// We need to gate seaORM's mock feature behind conditional compilation because
// the feature removes the Clone trait implementation from seaORM's DatabaseConnection.
// see https://github.com/SeaQL/sea-orm/issues/830
#[cfg(feature = "mock")]
mod tests {
    use super::*;
    use crate::error::{DomainErrorKind, EntityErrorKind, InternalErrorKind};
    use async_trait::async_trait;
    use events::EventHandler;
    use sea_orm::{DatabaseBackend, MockDatabase};
    use std::sync::{Arc, Mutex};

    struct RecordingHandler {
        seen: Arc<Mutex<Vec<DomainEvent>>>,
    }

    #[async_trait]
    impl EventHandler for RecordingHandler {
        async fn handle(&self, event: &DomainEvent) {
            self.seen.lock().unwrap().push(event.clone());
        }
    }

    fn recording_publisher() -> (EventPublisher, Arc<Mutex<Vec<DomainEvent>>>) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let publisher = EventPublisher::new().with_handler(Arc::new(RecordingHandler {
            seen: seen.clone(),
        }));
        (publisher, seen)
    }

    fn todo_model(id: Id, title: &str) -> Model {
        let now = chrono::Utc::now();

        Model {
            id,
            title: title.to_owned(),
            description: Some("details".to_owned()),
            category: Some("work".to_owned()),
            priority: 1,
            due_at: None,
            completed: false,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn create_rejects_an_empty_title_before_touching_the_store() {
        let db = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
        let (publisher, seen) = recording_publisher();

        let result = create(&db, &publisher, todo_model(0, "   ")).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::Invalid))
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_publishes_a_todo_created_event() {
        let model = todo_model(1, "Write the report");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()]])
            .into_connection();
        let (publisher, seen) = recording_publisher();

        let created = create(&db, &publisher, model.clone()).await.unwrap();

        assert_eq!(created.title, model.title);

        let events = seen.lock().unwrap();
        assert_eq!(events.len(), 1);
        match &events[0] {
            DomainEvent::TodoCreated { todo } => {
                assert_eq!(todo["title"], "Write the report");
            }
            other => panic!("expected TodoCreated, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn set_completed_publishes_a_todo_completed_event() {
        let model = todo_model(1, "Write the report");
        let mut completed_model = model.clone();
        completed_model.completed = true;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model], vec![completed_model]])
            .into_connection();
        let (publisher, seen) = recording_publisher();

        let todo = set_completed(&db, &publisher, 1, true).await.unwrap();

        assert!(todo.completed);
        assert!(matches!(
            seen.lock().unwrap()[0],
            DomainEvent::TodoCompleted { .. }
        ));
    }

    #[tokio::test]
    async fn delete_publishes_a_todo_deleted_event_with_the_id() {
        let model = todo_model(9, "Obsolete");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .append_exec_results(vec![sea_orm::MockExecResult {
                last_insert_id: 0,
                rows_affected: 1,
            }])
            .into_connection();
        let (publisher, seen) = recording_publisher();

        delete_by_id(&db, &publisher, 9).await.unwrap();

        assert!(matches!(
            seen.lock().unwrap()[0],
            DomainEvent::TodoDeleted { todo_id: 9 }
        ));
    }

    #[tokio::test]
    async fn failed_mutation_publishes_no_event() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<Model>::new()])
            .into_connection();
        let (publisher, seen) = recording_publisher();

        let result = update(&db, &publisher, 5, todo_model(5, "Still valid")).await;

        assert_eq!(
            result.unwrap_err().error_kind,
            DomainErrorKind::Internal(InternalErrorKind::Entity(EntityErrorKind::NotFound))
        );
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn create_then_read_returns_identical_fields() {
        let model = todo_model(3, "Round trip");
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model.clone()], vec![model.clone()]])
            .into_connection();
        let (publisher, _seen) = recording_publisher();

        let created = create(&db, &publisher, model.clone()).await.unwrap();
        let read = find_by_id(&db, created.id).await.unwrap();

        assert_eq!(read.title, model.title);
        assert_eq!(read.description, model.description);
        assert_eq!(read.category, model.category);
        assert_eq!(read.priority, model.priority);
    }
}
