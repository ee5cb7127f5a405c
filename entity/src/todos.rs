//! SeaORM Entity for the todos table.

use crate::Id;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[schema(as = entity::todos::Model)]
#[sea_orm(table_name = "todos")]
pub struct Model {
    #[serde(skip_deserializing)]
    #[sea_orm(primary_key)]
    pub id: Id,

    /// Short label for the task. Must be non-empty; enforced in the domain layer.
    pub title: String,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,

    /// Free-form grouping label (e.g. "work", "home")
    pub category: Option<String>,

    /// Relative importance; higher is more urgent
    #[serde(default)]
    pub priority: i32,

    /// Optional deadline
    #[schema(value_type = Option<String>, format = DateTime)]
    pub due_at: Option<DateTimeWithTimeZone>,

    #[serde(default)]
    pub completed: bool,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: DateTimeWithTimeZone,

    #[serde(skip_deserializing)]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
