//! Stateless HTTP request builder and response parser for the upstream
//! task-tracking API.
//!
//! # Design
//! `TaskTrackerClient` holds only a `base_url` and carries no mutable state
//! between calls. Each operation is split into a `build_*` method that
//! produces an `HttpRequest` (correlation header already attached from the
//! `RequestContext`) and a `parse_*` method that consumes an `HttpResponse`.
//! Any 2xx status counts as success; the caller executes the round-trip.

use serde::de::DeserializeOwned;

use crate::correlation::{attach_to_outbound_call, RequestContext};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{TaskRequest, TaskResponse};

#[derive(Debug, Clone)]
pub struct TaskTrackerClient {
    base_url: String,
}

impl TaskTrackerClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn build_list_tasks(&self, ctx: &RequestContext) -> HttpRequest {
        self.request(ctx, HttpMethod::Get, format!("{}/tasks", self.base_url), None)
    }

    pub fn build_get_task(&self, ctx: &RequestContext, id: &str) -> HttpRequest {
        self.request(ctx, HttpMethod::Get, format!("{}/tasks/{id}", self.base_url), None)
    }

    pub fn build_create_task(
        &self,
        ctx: &RequestContext,
        task: &TaskRequest,
    ) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(task).map_err(|e| ApiError::SerializationError(e.to_string()))?;
        let mut req = self.request(ctx, HttpMethod::Post, format!("{}/tasks", self.base_url), Some(body));
        req.headers
            .insert(0, ("content-type".to_string(), "application/json".to_string()));
        Ok(req)
    }

    pub fn build_delete_task(&self, ctx: &RequestContext, id: &str) -> HttpRequest {
        self.request(ctx, HttpMethod::Delete, format!("{}/tasks/{id}", self.base_url), None)
    }

    pub fn parse_list_tasks(&self, response: HttpResponse) -> Result<Vec<TaskResponse>, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_get_task(&self, response: HttpResponse) -> Result<TaskResponse, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_create_task(&self, response: HttpResponse) -> Result<TaskResponse, ApiError> {
        check_status(&response)?;
        parse_body(&response)
    }

    pub fn parse_delete_task(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)?;
        Ok(())
    }

    fn request(
        &self,
        ctx: &RequestContext,
        method: HttpMethod,
        path: String,
        body: Option<String>,
    ) -> HttpRequest {
        let mut req = HttpRequest {
            method,
            path,
            headers: Vec::new(),
            body,
        };
        attach_to_outbound_call(&mut req, ctx);
        req
    }
}

/// Map non-success status codes to the appropriate `ApiError` variant.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

fn parse_body<T: DeserializeOwned>(response: &HttpResponse) -> Result<T, ApiError> {
    if response.body.trim().is_empty() {
        return Err(ApiError::EmptyBody);
    }
    serde_json::from_str(&response.body).map_err(|e| ApiError::DeserializationError(e.to_string()))
}
