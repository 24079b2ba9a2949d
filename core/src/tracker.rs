//! The upstream task-tracker capability and its HTTP-backed implementation.

use async_trait::async_trait;
use tracing::debug;

use crate::client::TaskTrackerClient;
use crate::correlation::RequestContext;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse, HttpTransport};
use crate::types::{TaskRequest, TaskResponse};

/// Operations the gateway needs from the upstream task service. Each call is
/// a single attempt and reports failure as an `ApiError`.
#[async_trait]
pub trait TaskTracker: Send + Sync {
    async fn create_task(&self, ctx: &RequestContext, task: &TaskRequest) -> Result<TaskResponse, ApiError>;

    async fn get_task(&self, ctx: &RequestContext, id: &str) -> Result<TaskResponse, ApiError>;

    async fn list_tasks(&self, ctx: &RequestContext) -> Result<Vec<TaskResponse>, ApiError>;

    async fn delete_task(&self, ctx: &RequestContext, id: &str) -> Result<(), ApiError>;
}

/// `TaskTracker` over HTTP: requests come from `TaskTrackerClient`, the
/// round-trip goes through `T`.
#[derive(Debug, Clone)]
pub struct HttpTaskTracker<T> {
    client: TaskTrackerClient,
    transport: T,
}

impl<T: HttpTransport> HttpTaskTracker<T> {
    pub fn new(client: TaskTrackerClient, transport: T) -> Self {
        Self { client, transport }
    }

    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(
            method = request.method.as_str(),
            url = %request.path,
            "Calling upstream task tracker"
        );
        let response = self.transport.execute(request).await?;
        debug!(status = response.status, "Upstream responded");
        Ok(response)
    }
}

#[async_trait]
impl<T: HttpTransport> TaskTracker for HttpTaskTracker<T> {
    async fn create_task(&self, ctx: &RequestContext, task: &TaskRequest) -> Result<TaskResponse, ApiError> {
        let request = self.client.build_create_task(ctx, task)?;
        let response = self.send(request).await?;
        self.client.parse_create_task(response)
    }

    async fn get_task(&self, ctx: &RequestContext, id: &str) -> Result<TaskResponse, ApiError> {
        let response = self.send(self.client.build_get_task(ctx, id)).await?;
        self.client.parse_get_task(response)
    }

    async fn list_tasks(&self, ctx: &RequestContext) -> Result<Vec<TaskResponse>, ApiError> {
        let response = self.send(self.client.build_list_tasks(ctx)).await?;
        self.client.parse_list_tasks(response)
    }

    async fn delete_task(&self, ctx: &RequestContext, id: &str) -> Result<(), ApiError> {
        let response = self.send(self.client.build_delete_task(ctx, id)).await?;
        self.client.parse_delete_task(response)
    }
}
