use crate::controller::{health_check_controller, notify_controller, todo_controller};
use crate::{sse, AppState};
use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;

use utoipa::OpenApi;
use utoipa_rapidoc::RapiDoc;

// This is the global definition of our OpenAPI spec. To be a part
// of the rendered spec, a path and schema must be listed here.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Todo Live API"
    ),
    paths(
        todo_controller::index,
        todo_controller::create,
        todo_controller::read,
        todo_controller::update,
        todo_controller::update_completed,
        todo_controller::delete,
        notify_controller::notify,
        notify_controller::notify_query,
        health_check_controller::health_check,
    ),
    components(
        schemas(
            domain::todos::Model,
            todo_controller::CompleteRequest,
        )
    ),
    tags(
        (name = "todo_live", description = "Todo list API with real-time SSE updates")
    )
)]
struct ApiDoc;

pub fn define_routes(app_state: AppState) -> Router {
    Router::new()
        .merge(todo_routes(app_state.clone()))
        .merge(notify_routes(app_state.clone()))
        .merge(stream_routes(app_state))
        .merge(health_routes())
        .merge(RapiDoc::with_openapi("/api-docs/openapi.json", ApiDoc::openapi()).path("/rapidoc"))
        .fallback_service(static_routes())
        // The stream endpoint is consumed cross-origin by browser EventSource
        // clients; the CRUD API shares the same permissive policy.
        .layer(CorsLayer::permissive())
}

fn todo_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/api/todos", get(todo_controller::index))
        .route("/api/todos", post(todo_controller::create))
        .route("/api/todos/:id", get(todo_controller::read))
        .route("/api/todos/:id", put(todo_controller::update))
        .route(
            "/api/todos/:id/complete",
            patch(todo_controller::update_completed),
        )
        .route("/api/todos/:id", delete(todo_controller::delete))
        .with_state(app_state)
}

fn notify_routes(app_state: AppState) -> Router {
    Router::new()
        .route(
            "/notify",
            post(notify_controller::notify).get(notify_controller::notify_query),
        )
        .with_state(app_state)
}

pub(crate) fn stream_routes(app_state: AppState) -> Router {
    Router::new()
        .route("/sse", get(sse::handler::stream_events))
        .with_state(app_state)
}

fn health_routes() -> Router {
    Router::new().route("/health", get(health_check_controller::health_check))
}

// Serves the bundled browser client and any other static assets.
fn static_routes() -> Router {
    Router::new().nest_service("/", ServeDir::new("./public"))
}
