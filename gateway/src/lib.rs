//! HTTP front end of the task gateway.
//!
//! Provides endpoints for:
//! - Task submission (`POST /tasks`)
//! - Task listing, lookup and deletion (`/tasks`, `/tasks/{id}`)
//! - Health check (`/health`)
//!
//! Every request passes through the correlation middleware before reaching a
//! handler.

use axum::{
    middleware,
    routing::get,
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

pub mod config;
pub mod correlation;
mod handlers;
pub mod state;
pub mod transport;

pub use config::Config;
pub use state::AppState;

/// Create the HTTP router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/{id}", get(handlers::get_task).delete(handlers::delete_task))
        .route("/health", get(handlers::health_check))
        .layer(middleware::from_fn(correlation::propagate_correlation_id))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(listener: TcpListener, state: AppState) -> Result<(), std::io::Error> {
    axum::serve(listener, app(state)).await
}
