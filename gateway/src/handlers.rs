//! Route handlers.

use axum::{
    extract::{rejection::JsonRejection, Extension, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use task_gateway_core::{RequestContext, SubmitError, TaskRequest};
use tracing::{debug, info};

use crate::state::AppState;

/// `POST /tasks`: validate and forward a new task.
///
/// 400 with no body for an unreadable payload, 400 with the violation list
/// for an invalid task, otherwise 200 with the upstream task (or the
/// submitted task when the upstream call fell back).
pub async fn create_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    payload: Result<Json<TaskRequest>, JsonRejection>,
) -> Response {
    let Json(task) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            debug!(error = %rejection, "Rejected unreadable task payload");
            return StatusCode::BAD_REQUEST.into_response();
        }
    };

    match state.gateway.submit(&ctx, task).await {
        Ok(created) => {
            let task_id = created.id.as_ref().map(ToString::to_string).unwrap_or_default();
            info!(task_id = %task_id, "Task forwarded");
            Json(created).into_response()
        }
        Err(SubmitError::Invalid(result)) => {
            debug!(violations = result.violations().len(), "Task failed validation");
            (StatusCode::BAD_REQUEST, Json(result.into_violations())).into_response()
        }
        Err(SubmitError::Upstream(e)) => {
            debug!(error = %e, "Surfacing upstream failure");
            StatusCode::BAD_GATEWAY.into_response()
        }
    }
}

/// `GET /tasks`: upstream list, empty when the upstream is unavailable.
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
) -> impl IntoResponse {
    Json(state.gateway.list_tasks(&ctx).await)
}

/// `GET /tasks/{id}`
pub async fn get_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> Response {
    match state.gateway.get_task(&ctx, &id).await {
        Some(task) => Json(task).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// `DELETE /tasks/{id}`
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(ctx): Extension<RequestContext>,
    Path(id): Path<String>,
) -> StatusCode {
    if state.gateway.delete_task(&ctx, &id).await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::BAD_GATEWAY
    }
}

/// Health check endpoint.
pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}
