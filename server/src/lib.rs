//! HTTP CRUD service for todos.
//!
//! # Overview
//! Serves `/api/todos` and `/health` with axum. Every response body is an
//! [`Envelope`](envelope::Envelope): `{status, message, data?}`.
//!
//! # Design
//! - A single [`TodoStore`] is created by the caller and moved into the
//!   router state; handlers reach it through `State<SharedStore>`. There is
//!   no global.
//! - The store is synchronous. Handlers take the tokio `RwLock` for reads
//!   and the write lock for whole mutations.
//! - Persistence is pluggable: in memory, or a JSON file
//!   (see [`store::FileBackend`]).

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod model;
pub mod store;

use std::sync::Arc;

use axum::{
    body::Body,
    http::{HeaderValue, Request},
    routing::get,
    Router,
};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::Span;
use uuid::Uuid;

pub use model::{CreateTodo, Todo, UpdateTodo};
pub use store::TodoStore;

use handlers::SharedStore;

/// Generates a UUID v4 `x-request-id` for requests that arrive without one.
#[derive(Clone, Copy, Debug, Default)]
struct UuidRequestId;

impl MakeRequestId for UuidRequestId {
    fn make_request_id<B>(&mut self, _request: &Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

fn request_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("-");
    tracing::info_span!(
        "request",
        method = %request.method(),
        uri = %request.uri(),
        request_id = %request_id,
    )
}

pub fn app(store: TodoStore) -> Router {
    let store: SharedStore = Arc::new(RwLock::new(store));
    Router::new()
        .route("/health", get(handlers::health))
        .route(
            "/api/todos",
            get(handlers::list_todos).post(handlers::create_todo),
        )
        .route(
            "/api/todos/{id}",
            get(handlers::get_todo)
                .put(handlers::update_todo)
                .delete(handlers::delete_todo),
        )
        .fallback(handlers::route_not_found)
        .method_not_allowed_fallback(handlers::method_not_allowed)
        .with_state(store)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http().make_span_with(request_span))
        .layer(CorsLayer::permissive())
        .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
}

/// Serve `store` on `listener` until Ctrl+C.
pub async fn run(listener: TcpListener, store: TodoStore) -> Result<(), std::io::Error> {
    axum::serve(listener, app(store))
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => tracing::info!("shutdown signal received"),
        Err(err) => {
            tracing::warn!(error = %err, "cannot listen for Ctrl+C; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
