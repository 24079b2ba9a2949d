use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Path, Request, State},
    http::{HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

pub const CORRELATION_ID_HEADER: &str = "x-correlation-id";

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    pub title: String,
    pub description: String,
    pub status: String,
    pub due_date: DateTime<Utc>,
}

/// Stored tasks plus every correlation id seen on an inbound request, in
/// arrival order.
#[derive(Clone, Default)]
pub struct MockState {
    pub tasks: Arc<RwLock<HashMap<Uuid, Task>>>,
    pub correlation_ids: Arc<RwLock<Vec<String>>>,
}

impl MockState {
    pub async fn seen_correlation_ids(&self) -> Vec<String> {
        self.correlation_ids.read().await.clone()
    }
}

pub fn app() -> Router {
    app_with_state(MockState::default())
}

pub fn app_with_state(state: MockState) -> Router {
    Router::new()
        .route("/tasks", get(list_tasks).post(create_task))
        .route("/tasks/{id}", get(get_task).delete(delete_task))
        .layer(middleware::from_fn_with_state(state.clone(), record_correlation_id))
        .with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, state: MockState) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(state)).await
}

/// Record the caller's correlation id and echo it on the response.
async fn record_correlation_id(State(state): State<MockState>, request: Request, next: Next) -> Response {
    let id = correlation_id(request.headers());
    if let Some(id) = &id {
        state.correlation_ids.write().await.push(id.clone());
    }
    let mut response = next.run(request).await;
    if let Some(value) = id.and_then(|id| HeaderValue::from_str(&id).ok()) {
        response.headers_mut().insert(CORRELATION_ID_HEADER, value);
    }
    response
}

fn correlation_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CORRELATION_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

async fn list_tasks(State(state): State<MockState>) -> Json<Vec<Task>> {
    let tasks = state.tasks.read().await;
    Json(tasks.values().cloned().collect())
}

async fn create_task(
    State(state): State<MockState>,
    Json(input): Json<CreateTask>,
) -> (StatusCode, Json<Task>) {
    let task = Task {
        id: Uuid::new_v4(),
        title: input.title,
        description: input.description,
        status: input.status,
        due_date: input.due_date,
    };
    state.tasks.write().await.insert(task.id, task.clone());
    (StatusCode::CREATED, Json(task))
}

async fn get_task(
    State(state): State<MockState>,
    Path(id): Path<Uuid>,
) -> Result<Json<Task>, StatusCode> {
    let tasks = state.tasks.read().await;
    tasks.get(&id).cloned().map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn delete_task(
    State(state): State<MockState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, StatusCode> {
    let mut tasks = state.tasks.write().await;
    tasks.remove(&id).map(|_| StatusCode::NO_CONTENT).ok_or(StatusCode::NOT_FOUND)
}
