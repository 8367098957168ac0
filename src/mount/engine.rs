//! Translating route tables into bindings.
//!
//! # Responsibilities
//! - Stage one binding per declared middleware, in declaration order
//! - Append an auto-responder after the declared middleware of each
//!   (primary path, method) that has a responder
//! - Validate every declared path before anything reaches the router
//!
//! # Design Decisions
//! - Staging is pure; the router only sees a complete, valid set
//! - A declared method without a responder gets no auto-responder
//! - An empty reply continues the chain instead of answering

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value;

use crate::mount::resource::{Reply, Responders, SharedResponder};
use crate::routing::{
    middleware, BindPath, Binding, BindingKind, MountId, Next, RouteError, RouteTable,
    SharedMiddleware,
};

/// Bindings produced from one route table, ready to commit.
#[derive(Debug, Default)]
pub(crate) struct Staged {
    pub bindings: Vec<Binding>,
    pub responders: usize,
}

/// Stage `table` for `owner`, whose primary path is `primary`.
pub(crate) fn stage(
    owner: MountId,
    primary: &BindPath,
    table: &RouteTable,
    responders: &Responders,
) -> Result<Staged, RouteError> {
    let mut staged = Staged::default();

    for (raw, method, chain) in table.iter() {
        let path = BindPath::parse(raw)?;

        for handler in chain.iter() {
            staged.bindings.push(Binding::new(
                path.clone(),
                method,
                BindingKind::Middleware,
                Some(owner),
                handler.clone(),
            ));
        }

        if &path != primary {
            continue;
        }
        match responders.get(method) {
            Some(responder) => {
                staged.bindings.push(Binding::new(
                    path.clone(),
                    method,
                    BindingKind::Responder,
                    Some(owner),
                    auto_responder(responder.clone()),
                ));
                staged.responders += 1;
            }
            None => {
                tracing::debug!(path = %path, method = %method, "No responder declared, skipping");
            }
        }
    }

    Ok(staged)
}

/// Wrap a responder as the terminal middleware for its method.
fn auto_responder(responder: SharedResponder) -> SharedMiddleware {
    middleware(move |req: Request<Body>, next: Next| {
        let responder = responder.clone();
        async move {
            let fallthrough = shadow(&req);
            match responder.respond(req).await {
                Reply::Sent(response) => response,
                Reply::Payload(value) => write_payload(value),
                Reply::Empty => next.run(fallthrough).await,
            }
        }
    })
}

/// Body-less copy of `req` for continuing the chain after an empty reply.
fn shadow(req: &Request<Body>) -> Request<Body> {
    let mut copy = Request::new(Body::empty());
    *copy.method_mut() = req.method().clone();
    *copy.uri_mut() = req.uri().clone();
    *copy.version_mut() = req.version();
    *copy.headers_mut() = req.headers().clone();
    *copy.extensions_mut() = req.extensions().clone();
    copy
}

fn write_payload(value: Value) -> Response {
    match value {
        Value::String(text) => (StatusCode::OK, text).into_response(),
        other => (StatusCode::OK, Json(other)).into_response(),
    }
}
