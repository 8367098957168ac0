//! Stock middleware for route tables.
//!
//! # Data Flow
//! ```text
//! Declared chain for (path, method):
//!     → log.rs    (log request line, headers, parsed data)
//!     → query.rs  (query string → ParsedQuery, form body → ParsedBody)
//!     → body.rs   (JSON body → ParsedBody)
//!     → resource middleware / auto-responder
//! ```
//!
//! # Design Decisions
//! - Each constructor returns a shared middleware ready for a chain
//! - Parsers skip requests whose content type they do not handle
//! - Malformed input answers 400 with the canned invalid-request payload

pub mod body;
pub mod log;
pub mod query;

pub use body::{parse_body, BODY_LIMIT};
pub use log::log_request;
pub use query::parse_query;

use axum::body::Body;
use axum::http::{header, Request};

/// True if the request's content type is `mime` or a `+suffix` of it.
pub(crate) fn content_type_is(req: &Request<Body>, mime: &str, suffix: Option<&str>) -> bool {
    let Some(value) = req
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
    else {
        return false;
    };
    let essence = value
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase();
    essence == mime || suffix.is_some_and(|s| essence.ends_with(s))
}
