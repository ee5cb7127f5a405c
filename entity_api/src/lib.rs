use chrono::{Days, Utc};
use sea_orm::{ActiveModelTrait, DatabaseConnection, Set};

pub use entity::{todos, Id};

pub mod error;
pub mod todo;

/// Populates a development database with a handful of sample todos.
pub async fn seed_database(db: &DatabaseConnection) {
    let now = Utc::now();

    todos::ActiveModel {
        title: Set("Water the plants".to_owned()),
        description: Set(None),
        category: Set(Some("home".to_owned())),
        priority: Set(0),
        due_at: Set(None),
        completed: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    todos::ActiveModel {
        title: Set("File the expense report".to_owned()),
        description: Set(Some("Receipts are in the shared drive".to_owned())),
        category: Set(Some("work".to_owned())),
        priority: Set(2),
        due_at: Set(Some(
            (now + chrono::Duration::days(3)).into(),
        )),
        completed: Set(false),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();

    todos::ActiveModel {
        title: Set("Renew the domain".to_owned()),
        description: Set(None),
        category: Set(Some("ops".to_owned())),
        priority: Set(1),
        due_at: Set(now.checked_add_days(Days::new(30)).map(Into::into)),
        completed: Set(true),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    }
    .save(db)
    .await
    .unwrap();
}
