//! Business layer between the HTTP surface (`web`) and the persistence layer
//! (`entity_api`). Validates input, delegates CRUD to `entity_api`, and
//! publishes domain events after successful mutations.
//!
//! Items from `entity_api` are re-exported here so that `web` does not need a
//! direct dependency on the persistence crates.

pub use entity_api::{todos, Id};

pub mod error;
pub mod todo;
