use crate::{AppState, Error};
use async_stream::stream;
use axum::extract::{Query, State};
use axum::http::header;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::IntoResponse;
use log::*;
use serde::Deserialize;
use sse::{Hub, Subscriber, SubscriberId};
use std::convert::Infallible;
use std::time::Duration;

/// Interval between keep-alive comment frames. Prevents intermediary proxies
/// and load balancers from closing idle long-lived connections.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(25);

#[derive(Debug, Deserialize)]
pub(crate) struct StreamParams {
    token: Option<String>,
}

/// Unregisters the subscriber when the connection goes away, whichever way it
/// goes away: a client disconnect drops the response stream, a hub-side queue
/// close ends the relay loop, server shutdown drops the task. Unregistration
/// is idempotent, so racing exit paths are harmless.
struct RegistrationGuard {
    hub: Hub,
    id: SubscriberId,
}

impl Drop for RegistrationGuard {
    fn drop(&mut self) {
        debug!("SSE connection closed, unregistering subscriber {}", self.id);
        self.hub.unregister(&self.id);
    }
}

/// SSE handler that establishes a long-lived connection for real-time updates.
///
/// Requires a non-empty `token` query parameter; without one the connection is
/// rejected with 401 before any subscriber is registered.
pub(crate) async fn stream_events(
    State(app_state): State<AppState>,
    Query(params): Query<StreamParams>,
) -> Result<impl IntoResponse, Error> {
    let token = params.token.unwrap_or_default();
    if token.is_empty() {
        info!("Rejecting SSE connection without a token");
        return Err(domain::error::Error::unauthenticated().into());
    }

    let (subscriber, mut queue) = Subscriber::new(&token);
    debug!("Establishing SSE connection for subscriber {}", subscriber.id());

    let guard = RegistrationGuard {
        hub: app_state.hub.clone(),
        id: subscriber.id().clone(),
    };
    app_state.hub.register(subscriber);

    let stream = stream! {
        // Owned by the stream so every exit path drops it.
        let _guard = guard;

        // Emitted before any broadcast so the client can detect successful
        // stream establishment.
        yield Ok::<Event, Infallible>(Event::default().event("connected").data("ok"));

        while let Some(payload) = queue.recv().await {
            yield Ok(Event::default().data(payload));
        }

        // recv() returned None: the hub closed this queue (unregistration,
        // duplicate-id eviction, or shutdown).
    };

    Ok((
        [
            (header::CACHE_CONTROL, "no-cache"),
            (header::CONNECTION, "keep-alive"),
        ],
        Sse::new(stream).keep_alive(
            KeepAlive::new()
                .interval(HEARTBEAT_INTERVAL)
                .text("heartbeat"),
        ),
    ))
}
