//! Validation plus fallback forwarding in front of a `TaskTracker`.
//!
//! # Design
//! Upstream failures never reach the inbound caller as errors: each
//! operation collapses a failed call to a fallback value (the submitted
//! task, an empty list, "not found", "not deleted") and logs the cause with
//! the request's correlation id. `submit` can instead surface the failure
//! when the gateway is built with `UpstreamPolicy::Surface`.

use std::sync::Arc;

use tracing::warn;

use crate::correlation::RequestContext;
use crate::error::{ApiError, SubmitError};
use crate::tracker::TaskTracker;
use crate::types::{TaskRequest, TaskResponse};
use crate::validation::validate;

/// What `submit` does when the upstream create call fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UpstreamPolicy {
    /// Echo the submitted task back as if the upstream had accepted it.
    #[default]
    Fallback,
    /// Return `SubmitError::Upstream`.
    Surface,
}

#[derive(Clone)]
pub struct TaskGateway {
    tracker: Arc<dyn TaskTracker>,
    policy: UpstreamPolicy,
}

impl TaskGateway {
    pub fn new(tracker: Arc<dyn TaskTracker>) -> Self {
        Self {
            tracker,
            policy: UpstreamPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: UpstreamPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn policy(&self) -> UpstreamPolicy {
        self.policy
    }

    /// Validate `task` and forward it upstream.
    pub async fn submit(&self, ctx: &RequestContext, task: TaskRequest) -> Result<TaskResponse, SubmitError> {
        let result = validate(&task);
        if !result.is_valid() {
            return Err(SubmitError::Invalid(result));
        }
        match self.policy {
            UpstreamPolicy::Fallback => Ok(self.create_task(ctx, task).await),
            UpstreamPolicy::Surface => Ok(self.tracker.create_task(ctx, &task).await?),
        }
    }

    /// Create `task` upstream, or hand it back unchanged if the call fails.
    pub async fn create_task(&self, ctx: &RequestContext, task: TaskRequest) -> TaskResponse {
        match self.tracker.create_task(ctx, &task).await {
            Ok(created) => created,
            Err(e) => {
                log_fallback(ctx, "create", &e);
                TaskResponse::from(task)
            }
        }
    }

    pub async fn list_tasks(&self, ctx: &RequestContext) -> Vec<TaskResponse> {
        self.tracker.list_tasks(ctx).await.unwrap_or_else(|e| {
            log_fallback(ctx, "list", &e);
            Vec::new()
        })
    }

    /// `None` when the task does not exist or the lookup failed.
    pub async fn get_task(&self, ctx: &RequestContext, id: &str) -> Option<TaskResponse> {
        match self.tracker.get_task(ctx, id).await {
            Ok(task) => Some(task),
            Err(ApiError::NotFound) => None,
            Err(e) => {
                log_fallback(ctx, "get", &e);
                None
            }
        }
    }

    /// `true` only if the upstream confirmed the deletion.
    pub async fn delete_task(&self, ctx: &RequestContext, id: &str) -> bool {
        match self.tracker.delete_task(ctx, id).await {
            Ok(()) => true,
            Err(e) => {
                log_fallback(ctx, "delete", &e);
                false
            }
        }
    }
}

fn log_fallback(ctx: &RequestContext, operation: &str, error: &ApiError) {
    let correlation_id = ctx.correlation_id().map(|id| id.to_string()).unwrap_or_default();
    warn!(
        correlation_id = %correlation_id,
        operation,
        error = %error,
        "Upstream call failed, returning fallback"
    );
}
