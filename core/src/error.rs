//! Error types for the upstream task-tracker client and the gateway.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers distinguish "the task
//! does not exist" from "the upstream returned an unexpected status." All
//! other non-2xx responses land in `HttpError` with the raw status code and
//! body for debugging. `Transport` covers everything that happens before a
//! status line is read: refused connections, DNS, timeouts.

use thiserror::Error;

use crate::validation::ValidationResult;

/// Errors returned by `TaskTrackerClient` parse methods, `HttpTransport`
/// implementations and `TaskTracker` operations.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The upstream returned 404; the requested task does not exist.
    #[error("resource not found")]
    NotFound,

    /// The upstream returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// A 2xx response arrived with no body where one was required.
    #[error("empty response body")]
    EmptyBody,

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response.
    #[error("transport failed: {0}")]
    Transport(String),
}

/// Why `TaskGateway::submit` did not produce a task.
#[derive(Debug, Error)]
pub enum SubmitError {
    #[error("task failed validation with {} violation(s)", .0.violations().len())]
    Invalid(ValidationResult),

    /// Only produced under `UpstreamPolicy::Surface`.
    #[error("upstream call failed: {0}")]
    Upstream(#[from] ApiError),
}
