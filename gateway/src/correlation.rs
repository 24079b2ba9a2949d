//! Correlation-id middleware.
//!
//! Builds the `RequestContext` for each inbound request, stores it in the
//! request extensions for handlers to extract, runs the rest of the stack
//! inside a span tagged with the id, and stamps the id on the response.

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use task_gateway_core::{on_response_start, HeaderCarrier, RequestContext};
use tracing::{debug, Instrument};
use uuid::Uuid;

/// Adapts an axum `HeaderMap` to the core's `HeaderCarrier`.
pub struct HeaderMapCarrier<'a>(pub &'a mut HeaderMap);

impl HeaderCarrier for HeaderMapCarrier<'_> {
    fn header(&self, name: &str) -> Option<&str> {
        let value = self.0.get(name)?;
        match value.to_str() {
            Ok(text) => Some(text),
            Err(_) => {
                debug!(header = name, "Discarding header value that is not visible ASCII");
                None
            }
        }
    }

    fn set_header(&mut self, name: &str, value: &str) {
        // Values that are not valid header text are dropped; the response
        // goes out without the header.
        if let (Ok(name), Ok(value)) = (
            HeaderName::try_from(name),
            HeaderValue::from_str(value),
        ) {
            self.0.append(name, value);
        }
    }
}

pub async fn propagate_correlation_id(mut request: Request, next: Next) -> Response {
    let trace_id = Uuid::new_v4().to_string();
    let ctx = RequestContext::start(&HeaderMapCarrier(request.headers_mut()), trace_id);
    let correlation_id = ctx.correlation_id();

    let span = tracing::info_span!(
        "request",
        correlation_id = %correlation_id.as_ref().map(|id| id.as_str()).unwrap_or_default(),
        method = %request.method(),
        path = %request.uri().path(),
    );
    request.extensions_mut().insert(ctx);

    let mut response = next.run(request).instrument(span).await;
    if let Some(id) = &correlation_id {
        on_response_start(&mut HeaderMapCarrier(response.headers_mut()), id);
    }
    response
}

#[cfg(test)]
mod tests {
    use task_gateway_core::CORRELATION_ID_HEADER;

    use super::*;

    #[test]
    fn carrier_reads_case_insensitively() {
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", HeaderValue::from_static("abc"));
        let carrier = HeaderMapCarrier(&mut headers);
        assert_eq!(carrier.header(CORRELATION_ID_HEADER), Some("abc"));
    }

    #[test]
    fn carrier_treats_opaque_value_as_absent() {
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", HeaderValue::from_bytes(b"caf\xe9").unwrap());
        let carrier = HeaderMapCarrier(&mut headers);
        assert_eq!(carrier.header(CORRELATION_ID_HEADER), None);
    }

    #[test]
    fn carrier_skips_invalid_values() {
        let mut headers = HeaderMap::new();
        HeaderMapCarrier(&mut headers).set_header(CORRELATION_ID_HEADER, "bad\nvalue");
        assert!(headers.is_empty());
    }

    #[test]
    fn carrier_respects_existing_response_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-correlation-id", HeaderValue::from_static("first"));
        let ctx = RequestContext::detached("second");
        let id = ctx.correlation_id().unwrap();
        on_response_start(&mut HeaderMapCarrier(&mut headers), &id);
        assert_eq!(headers.get_all("x-correlation-id").iter().count(), 1);
        assert_eq!(headers["x-correlation-id"], "first");
    }
}
