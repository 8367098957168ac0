//! Request logging middleware.

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;

use crate::http::request::RequestExt;
use crate::routing::{middleware, Next, SharedMiddleware};

/// Log the request line, content negotiation headers and whatever parsers
/// ahead of it produced, then continue.
pub fn log_request() -> SharedMiddleware {
    middleware(log)
}

async fn log(req: Request<Body>, next: Next) -> Response {
    {
        let header_str = |name: header::HeaderName| {
            req.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .unwrap_or("-")
        };
        tracing::info!(
            request_id = req.request_id().unwrap_or("-"),
            method = %req.method(),
            url = %req.uri(),
            accept = header_str(header::ACCEPT),
            content_type = header_str(header::CONTENT_TYPE),
            query = ?req.parsed_query(),
            body = ?req.parsed_body(),
            "Processing request"
        );
    }
    next.run(req).await
}
