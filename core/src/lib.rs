//! Core of the task gateway: correlation-id propagation, task validation and
//! the upstream task-tracker client.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). The host supplies an
//! `HttpTransport`; `HttpTaskTracker` glues the two into a `TaskTracker`,
//! and `TaskGateway` adds validation and fallback handling on top.
//!
//! # Design
//! - `TaskTrackerClient` is stateless; it holds only `base_url`.
//! - Each upstream operation is split into `build_*` (produces request) and
//!   `parse_*` (consumes response), so the I/O boundary is explicit.
//! - The correlation id travels in an explicit `RequestContext`, never in
//!   ambient per-request storage.
//! - DTOs are defined independently from the mock-server crate; integration
//!   tests catch schema drift.

pub mod client;
pub mod correlation;
pub mod error;
pub mod gateway;
pub mod http;
pub mod tracker;
pub mod types;
pub mod validation;

pub use client::TaskTrackerClient;
pub use correlation::{
    attach_to_outbound_call, on_request_start, on_response_start, CorrelationId, RequestContext,
    CORRELATION_ID_HEADER,
};
pub use error::{ApiError, SubmitError};
pub use gateway::{TaskGateway, UpstreamPolicy};
pub use http::{HeaderCarrier, HttpMethod, HttpRequest, HttpResponse, HttpTransport};
pub use tracker::{HttpTaskTracker, TaskTracker};
pub use types::{parse_timestamp, TaskId, TaskRequest, TaskResponse, TaskStatus};
pub use validation::{validate, validate_at, ValidationResult, Violation};
