use sea_orm::{
    entity::prelude::*,
    ActiveValue::{Set, Unchanged},
    DatabaseConnection, QueryOrder, TryIntoModel,
};

use super::error::{EntityApiErrorKind, Error};
use entity::todos::{ActiveModel, Column, Entity, Model};
use entity::Id;
use log::*;

pub async fn create(db: &DatabaseConnection, todo_model: Model) -> Result<Model, Error> {
    debug!("New Todo Model to be inserted: {todo_model:?}");

    let now = chrono::Utc::now();

    let todo_active_model: ActiveModel = ActiveModel {
        title: Set(todo_model.title),
        description: Set(todo_model.description),
        category: Set(todo_model.category),
        priority: Set(todo_model.priority),
        due_at: Set(todo_model.due_at),
        completed: Set(todo_model.completed),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
        ..Default::default()
    };

    Ok(todo_active_model.save(db).await?.try_into_model()?)
}

/// All todos, newest first.
pub async fn find_all(db: &DatabaseConnection) -> Result<Vec<Model>, Error> {
    Ok(Entity::find()
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await?)
}

pub async fn find_by_id(db: &DatabaseConnection, id: Id) -> Result<Model, Error> {
    Entity::find_by_id(id).one(db).await?.ok_or_else(|| Error {
        source: None,
        error_kind: EntityApiErrorKind::RecordNotFound,
    })
}

pub async fn update(db: &DatabaseConnection, id: Id, model: Model) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(todo) => {
            debug!("Existing Todo model to be Updated: {todo:?}");

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(todo.id),
                title: Set(model.title),
                description: Set(model.description),
                category: Set(model.category),
                priority: Set(model.priority),
                due_at: Set(model.due_at),
                completed: Set(model.completed),
                created_at: Unchanged(todo.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => {
            error!("Todo with id {id} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

/// Partial update of only the completed flag; all other fields are untouched.
pub async fn set_completed(
    db: &DatabaseConnection,
    id: Id,
    completed: bool,
) -> Result<Model, Error> {
    let result = Entity::find_by_id(id).one(db).await?;

    match result {
        Some(todo) => {
            debug!("Existing Todo model to set completed={completed}: {todo:?}");

            let active_model: ActiveModel = ActiveModel {
                id: Unchanged(todo.id),
                title: Unchanged(todo.title),
                description: Unchanged(todo.description),
                category: Unchanged(todo.category),
                priority: Unchanged(todo.priority),
                due_at: Unchanged(todo.due_at),
                completed: Set(completed),
                created_at: Unchanged(todo.created_at),
                updated_at: Set(chrono::Utc::now().into()),
            };

            Ok(active_model.update(db).await?.try_into_model()?)
        }
        None => {
            error!("Todo with id {id} not found");

            Err(Error {
                source: None,
                error_kind: EntityApiErrorKind::RecordNotFound,
            })
        }
    }
}

pub async fn delete_by_id(db: &DatabaseConnection, id: Id) -> Result<(), Error> {
    let result = find_by_id(db, id).await?;

    result.delete(db).await?;

    Ok(())
}
