//! Server-Sent Events (SSE) infrastructure for real-time todo updates.
//!
//! This crate owns the broadcast hub: the in-process pub/sub broker that fans
//! event notifications out to every connected stream client.
//!
//! # Architecture
//!
//! - **Single coordinator**: one dedicated task owns the subscriber registry
//!   and services register / unregister / broadcast commands strictly in
//!   sequence, so the registry is never mutated concurrently with a fan-out
//!   pass.
//! - **Best-effort broadcast**: `Hub::broadcast` never blocks. The hub's
//!   inbound queue is bounded; so is every subscriber's outbound queue. When
//!   either is full the message is dropped — for the hub as a whole in the
//!   first case, for that one subscriber in the second. A stalled or dead
//!   client can therefore never stall an API request or another client, and
//!   memory stays bounded no matter how slow consumers are.
//! - **Ephemeral messages**: there is no durability or replay. A client that
//!   is offline (or whose queue overflowed) simply misses the event and sees
//!   fresh data on its next fetch.
//!
//! # Message Flow
//!
//! 1. Browser establishes a connection via the `/sse` endpoint (token
//!    required), which registers a [`Subscriber`] with the [`Hub`]
//! 2. A CRUD handler mutates a todo and publishes a domain event
//! 3. [`SseDomainEventHandler`] serializes the matching
//!    [`message::Notification`] envelope and hands it to `Hub::broadcast`
//! 4. The coordinator fans the payload out to every subscriber queue
//! 5. Each connection's relay loop writes the payload as an SSE `data:` frame
//!
//! # Modules
//!
//! - `hub`: the coordinator task and the cloneable [`Hub`] handle
//! - `subscriber`: [`Subscriber`] handles and collision-free ids
//! - `message`: the JSON notification envelope announced to clients
//! - `domain_event_handler`: bridges `events::DomainEvent` into broadcasts

pub mod domain_event_handler;
pub mod hub;
pub mod message;
pub mod subscriber;

pub use domain_event_handler::SseDomainEventHandler;
pub use hub::Hub;
pub use subscriber::{Subscriber, SubscriberId};
