use events::Id;
use serde::Serialize;
use serde_json::Value;

/// JSON envelope announced to stream clients after each todo mutation.
///
/// Serialized exactly once by the event handler; from there on the hub and
/// the stream endpoints treat the payload as an opaque string. Create,
/// update, and complete carry the full serialized record so clients can
/// refresh without a follow-up API call; delete carries only the id since
/// the record no longer exists.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Notification {
    #[serde(rename = "todo.created")]
    TodoCreated { todo: Value },
    #[serde(rename = "todo.updated")]
    TodoUpdated { todo: Value },
    #[serde(rename = "todo.completed")]
    TodoCompleted { todo: Value },
    #[serde(rename = "todo.deleted")]
    TodoDeleted { id: Id },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn created_envelope_carries_the_full_record() {
        let notification = Notification::TodoCreated {
            todo: json!({"id": 3, "title": "buy milk"}),
        };

        let value: Value = serde_json::to_value(&notification).unwrap();
        assert_eq!(
            value,
            json!({"type": "todo.created", "todo": {"id": 3, "title": "buy milk"}})
        );
    }

    #[test]
    fn deleted_envelope_carries_only_the_id() {
        let notification = Notification::TodoDeleted { id: 7 };

        let value: Value = serde_json::to_value(&notification).unwrap();
        assert_eq!(value, json!({"type": "todo.deleted", "id": 7}));
    }
}
