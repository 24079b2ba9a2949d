//! Correlation-id propagation.
//!
//! An id is chosen once per inbound request (the caller's `X-Correlation-ID`
//! if it sent a non-empty one, otherwise the request's trace id), carried in
//! a `RequestContext` that is passed explicitly down to the outbound-call
//! builder, echoed on the response, and attached to every upstream call.

use std::fmt;

use crate::http::HeaderCarrier;

pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Opaque per-request token. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Request-scoped state threaded from the inbound handler to outbound calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    trace_id: String,
    correlation_id: Option<CorrelationId>,
}

impl RequestContext {
    /// Context for an inbound request: runs `on_request_start` and stores the
    /// result.
    pub fn start(inbound: &impl HeaderCarrier, trace_id: impl Into<String>) -> Self {
        let trace_id = trace_id.into();
        let correlation_id = on_request_start(inbound, &trace_id);
        Self {
            trace_id,
            correlation_id,
        }
    }

    /// Context with only a trace id, for calls made outside an inbound
    /// request.
    pub fn detached(trace_id: impl Into<String>) -> Self {
        Self {
            trace_id: trace_id.into(),
            correlation_id: None,
        }
    }

    pub fn trace_id(&self) -> &str {
        &self.trace_id
    }

    /// The stored correlation id, or the trace id when none was stored.
    /// `None` only if both are empty.
    pub fn correlation_id(&self) -> Option<CorrelationId> {
        self.correlation_id
            .clone()
            .or_else(|| non_empty(&self.trace_id).map(|id| CorrelationId(id.to_string())))
    }
}

/// Pick the correlation id for an inbound request.
///
/// Returns `None` only when the header is absent or blank and `trace_id` is
/// empty too; handling continues without an id in that case.
pub fn on_request_start(inbound: &impl HeaderCarrier, trace_id: &str) -> Option<CorrelationId> {
    inbound
        .header(CORRELATION_ID_HEADER)
        .and_then(non_empty)
        .or_else(|| non_empty(trace_id))
        .map(|id| CorrelationId(id.to_string()))
}

/// Set the correlation header on a response unless it is already there.
pub fn on_response_start(outbound: &mut impl HeaderCarrier, correlation_id: &CorrelationId) {
    if outbound.header(CORRELATION_ID_HEADER).is_none() {
        outbound.set_header(CORRELATION_ID_HEADER, correlation_id.as_str());
    }
}

/// Add the context's correlation id to an outbound request.
pub fn attach_to_outbound_call(outbound: &mut impl HeaderCarrier, context: &RequestContext) {
    if let Some(id) = context.correlation_id() {
        outbound.set_header(CORRELATION_ID_HEADER, id.as_str());
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{HttpMethod, HttpRequest, HttpResponse};

    fn inbound(headers: &[(&str, &str)]) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Post,
            path: "/tasks".to_string(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: None,
        }
    }

    fn response() -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: Vec::new(),
            body: String::new(),
        }
    }

    #[test]
    fn inbound_header_wins_over_trace_id() {
        let req = inbound(&[("x-correlation-id", "caller-123")]);
        let id = on_request_start(&req, "trace-1").unwrap();
        assert_eq!(id.as_str(), "caller-123");
    }

    #[test]
    fn missing_header_falls_back_to_trace_id() {
        let id = on_request_start(&inbound(&[]), "trace-1").unwrap();
        assert_eq!(id.as_str(), "trace-1");
    }

    #[test]
    fn empty_header_falls_back_to_trace_id() {
        let req = inbound(&[("X-Correlation-ID", "")]);
        assert_eq!(on_request_start(&req, "trace-1").unwrap().as_str(), "trace-1");

        let req = inbound(&[("X-Correlation-ID", "  ")]);
        assert_eq!(on_request_start(&req, "trace-1").unwrap().as_str(), "trace-1");
    }

    #[test]
    fn nothing_available_yields_none() {
        assert!(on_request_start(&inbound(&[]), "").is_none());
    }

    #[test]
    fn response_header_is_set_once() {
        let ctx = RequestContext::start(&inbound(&[("X-Correlation-ID", "abc")]), "trace-1");
        let id = ctx.correlation_id().unwrap();
        let mut resp = response();
        on_response_start(&mut resp, &id);
        on_response_start(&mut resp, &id);
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.header(CORRELATION_ID_HEADER), Some("abc"));
    }

    #[test]
    fn response_header_is_never_overwritten() {
        let mut resp = response();
        resp.set_header("x-correlation-id", "set-by-handler");
        on_response_start(&mut resp, &CorrelationId("other".to_string()));
        assert_eq!(resp.headers.len(), 1);
        assert_eq!(resp.header(CORRELATION_ID_HEADER), Some("set-by-handler"));
    }

    #[test]
    fn outbound_call_carries_context_id() {
        let ctx = RequestContext::start(&inbound(&[("X-Correlation-ID", "abc")]), "trace-1");
        let mut out = inbound(&[]);
        attach_to_outbound_call(&mut out, &ctx);
        assert_eq!(out.header(CORRELATION_ID_HEADER), Some("abc"));
    }

    #[test]
    fn detached_context_uses_trace_id() {
        let ctx = RequestContext::detached("trace-9");
        let mut out = inbound(&[]);
        attach_to_outbound_call(&mut out, &ctx);
        assert_eq!(out.header(CORRELATION_ID_HEADER), Some("trace-9"));
    }

    #[test]
    fn outbound_header_omitted_without_any_id() {
        let ctx = RequestContext::detached("");
        let mut out = inbound(&[]);
        attach_to_outbound_call(&mut out, &ctx);
        assert!(out.headers.is_empty());
    }
}
