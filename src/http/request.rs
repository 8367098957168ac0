//! Request-side data attached by middleware.
//!
//! # Responsibilities
//! - Carry parsed query strings and bodies between middleware
//! - Expose captured path parameters and the request ID
//!
//! # Design Decisions
//! - Parsed data travels in request extensions, so a handler only sees what
//!   the middleware declared ahead of it produced
//! - Absent data is `None`, never an empty default

use std::collections::HashMap;

use axum::body::Body;
use axum::http::Request;
use serde_json::Value;

use crate::routing::PathParams;

pub const X_REQUEST_ID: &str = "x-request-id";

/// Body parsed by [`crate::http::middleware::parse_body`] or a form body parsed by
/// [`crate::http::middleware::parse_query`].
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedBody(pub Value);

/// Query string parsed by [`crate::http::middleware::parse_query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedQuery(pub HashMap<String, String>);

/// Accessors for data attached to a request while it moves through a chain.
pub trait RequestExt {
    fn parsed_body(&self) -> Option<&Value>;
    fn parsed_query(&self) -> Option<&HashMap<String, String>>;
    fn param(&self, name: &str) -> Option<&str>;
    fn request_id(&self) -> Option<&str>;
}

impl RequestExt for Request<Body> {
    fn parsed_body(&self) -> Option<&Value> {
        self.extensions().get::<ParsedBody>().map(|b| &b.0)
    }

    fn parsed_query(&self) -> Option<&HashMap<String, String>> {
        self.extensions().get::<ParsedQuery>().map(|q| &q.0)
    }

    fn param(&self, name: &str) -> Option<&str> {
        self.extensions().get::<PathParams>().and_then(|p| p.get(name))
    }

    fn request_id(&self) -> Option<&str> {
        self.headers()
            .get(X_REQUEST_ID)
            .and_then(|v| v.to_str().ok())
    }
}
