//! URL-encoded query string and form body parsing.

use std::collections::HashMap;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use serde_json::{Map, Value};

use crate::http::middleware::body::over_limit;
use crate::http::middleware::{content_type_is, BODY_LIMIT};
use crate::http::request::{ParsedBody, ParsedQuery};
use crate::http::response::{INVALID_REQUEST, PAYLOAD_TOO_LARGE};
use crate::routing::{middleware, Next, SharedMiddleware};

/// Parse the query string into [`ParsedQuery`] and, for
/// `application/x-www-form-urlencoded` requests, the body into
/// [`ParsedBody`] as an object of strings.
///
/// Repeated keys keep the last value.
pub fn parse_query() -> SharedMiddleware {
    middleware(urlencoded)
}

async fn urlencoded(req: Request<Body>, next: Next) -> Response {
    let query: HashMap<String, String> = req
        .uri()
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect()
        })
        .unwrap_or_default();

    let is_form = content_type_is(&req, "application/x-www-form-urlencoded", None);
    let (mut parts, body) = req.into_parts();
    parts.extensions.insert(ParsedQuery(query));

    if !is_form {
        return next.run(Request::from_parts(parts, body)).await;
    }

    let bytes = match axum::body::to_bytes(body, BODY_LIMIT).await {
        Ok(bytes) => bytes,
        Err(e) if over_limit(&e) => {
            tracing::debug!(limit = BODY_LIMIT, "Rejecting oversized form body");
            return PAYLOAD_TOO_LARGE.into_response();
        }
        Err(e) => {
            tracing::debug!(error = %e, "Failed to read form body");
            return INVALID_REQUEST.into_response();
        }
    };
    let form: Map<String, Value> = url::form_urlencoded::parse(&bytes)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    parts.extensions.insert(ParsedBody(Value::Object(form)));

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}
