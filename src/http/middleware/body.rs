//! JSON body parsing.

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::{IntoResponse, Response};
use http_body_util::LengthLimitError;
use serde_json::Value;

use crate::http::middleware::content_type_is;
use crate::http::request::ParsedBody;
use crate::http::response::{INVALID_REQUEST, PAYLOAD_TOO_LARGE};
use crate::routing::{middleware, Next, SharedMiddleware};

/// Largest body the parsers will buffer.
pub const BODY_LIMIT: usize = 1024 * 1024;

/// Parse `application/json` bodies into [`ParsedBody`].
///
/// The buffered bytes are put back on the request so later handlers can
/// still read the raw body. An empty body parses as `{}`; one larger than
/// [`BODY_LIMIT`] answers 413.
pub fn parse_body() -> SharedMiddleware {
    middleware(json_body)
}

async fn json_body(req: Request<Body>, next: Next) -> Response {
    if !content_type_is(&req, "application/json", Some("+json")) {
        return next.run(req).await;
    }
    if declared_length(&req).is_some_and(|len| len > BODY_LIMIT) {
        tracing::debug!(limit = BODY_LIMIT, "Rejecting oversized body");
        return PAYLOAD_TOO_LARGE.into_response();
    }

    let (mut parts, body) = req.into_parts();
    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) if over_limit(&e) => {
            tracing::debug!(limit = BODY_LIMIT, "Rejecting oversized body");
            return PAYLOAD_TOO_LARGE.into_response();
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read request body");
            return INVALID_REQUEST.into_response();
        }
    };

    let value = if bytes.is_empty() {
        Value::Object(Default::default())
    } else {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => value,
            Err(e) => {
                tracing::debug!(error = %e, "Rejecting malformed JSON body");
                return INVALID_REQUEST.into_response();
            }
        }
    };

    parts.extensions.insert(ParsedBody(value));
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn declared_length(req: &Request<Body>) -> Option<usize> {
    req.headers()
        .get(header::CONTENT_LENGTH)?
        .to_str()
        .ok()?
        .parse()
        .ok()
}

/// True if reading a body failed because it exceeded the read limit.
pub(crate) fn over_limit(err: &axum::Error) -> bool {
    std::error::Error::source(err).is_some_and(|source| source.is::<LengthLimitError>())
}
