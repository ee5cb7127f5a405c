use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use utoipa::IntoParams;

use crate::AppState;
use log::*;

#[derive(Debug, Deserialize, IntoParams)]
pub struct NotifyParams {
    /// Message to broadcast; defaults to "hello"
    pub msg: Option<String>,
}

/// POST broadcast the raw request body to every connected stream client.
/// A manual-testing hook for the push channel; not part of the todo domain.
#[utoipa::path(
    post,
    path = "/notify",
    request_body = String,
    responses(
        (status = 204, description = "Message accepted for best-effort broadcast")
    )
)]
pub async fn notify(State(app_state): State<AppState>, body: String) -> impl IntoResponse {
    debug!("POST broadcast message of {} byte(s)", body.len());

    app_state.hub.broadcast(body);

    StatusCode::NO_CONTENT
}

/// GET broadcast the `msg` query parameter to every connected stream client.
#[utoipa::path(
    get,
    path = "/notify",
    params(NotifyParams),
    responses(
        (status = 204, description = "Message accepted for best-effort broadcast")
    )
)]
pub async fn notify_query(
    State(app_state): State<AppState>,
    Query(params): Query<NotifyParams>,
) -> impl IntoResponse {
    let msg = params.msg.unwrap_or_else(|| "hello".to_owned());
    debug!("GET broadcast message: {msg}");

    app_state.hub.broadcast(msg);

    StatusCode::NO_CONTENT
}
