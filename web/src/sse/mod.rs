//! SSE HTTP handler for the web layer.
//!
//! This module contains only the Axum handler for the stream endpoint.
//! The core SSE infrastructure (Hub, Subscriber, Notification types)
//! lives in the `sse` crate to avoid circular dependencies.

pub mod handler;
