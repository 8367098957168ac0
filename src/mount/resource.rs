//! The resource contract: a route table plus per-method responders.
//!
//! A resource declares middleware through [`Resource::routes`] and terminal
//! handlers through [`Resource::responders`]. A responder registered for a
//! method is wired on the resource's primary path after whatever middleware
//! the table declares for that same (path, method).

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use serde::Serialize;
use serde_json::Value;

use crate::routing::{MethodSpec, RouteError, RouteTable};

/// A unit of routing owned by one mount.
pub trait Resource: Send + Sync + 'static {
    /// Declare middleware. Called on every attach, so changes made since the
    /// last detach take effect.
    fn routes(&self) -> Result<RouteTable, RouteError> {
        Ok(RouteTable::new())
    }

    /// Terminal handlers keyed by method. Read once, when the mount is created.
    fn responders(&self) -> Responders {
        Responders::new()
    }
}

/// What a responder produced.
pub enum Reply {
    /// Nothing to send; the request continues down the chain.
    Empty,
    /// A payload to write as the response body.
    Payload(Value),
    /// A complete response, returned as is.
    Sent(Response),
}

impl Reply {
    /// Wrap a payload, treating empty values (`null`, `false`, `0`, `""`) as
    /// [`Reply::Empty`].
    pub fn payload(value: Value) -> Self {
        if is_empty_payload(&value) {
            Reply::Empty
        } else {
            Reply::Payload(value)
        }
    }

    pub fn json<T: Serialize>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(v) => Self::payload(v),
            Err(e) => {
                tracing::error!(error = %e, "Responder payload failed to serialize");
                Reply::Sent(
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR.into_response(),
                )
            }
        }
    }

    pub fn sent(response: impl IntoResponse) -> Self {
        Reply::Sent(response.into_response())
    }
}

impl From<Value> for Reply {
    fn from(value: Value) -> Self {
        Reply::payload(value)
    }
}

impl From<Response> for Reply {
    fn from(response: Response) -> Self {
        Reply::Sent(response)
    }
}

impl fmt::Debug for Reply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reply::Empty => f.write_str("Empty"),
            Reply::Payload(v) => f.debug_tuple("Payload").field(v).finish(),
            Reply::Sent(r) => f.debug_tuple("Sent").field(&r.status()).finish(),
        }
    }
}

fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

/// Terminal handler for one method on a resource's primary path.
pub trait Responder: Send + Sync + 'static {
    fn respond(&self, req: Request<Body>) -> BoxFuture<'static, Reply>;
}

impl<F, Fut> Responder for F
where
    F: Fn(Request<Body>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Reply> + Send + 'static,
{
    fn respond(&self, req: Request<Body>) -> BoxFuture<'static, Reply> {
        Box::pin(self(req))
    }
}

pub type SharedResponder = Arc<dyn Responder>;

/// Explicit method → responder table.
#[derive(Clone, Default)]
pub struct Responders {
    entries: Vec<(MethodSpec, SharedResponder)>,
}

impl Responders {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the responder for `method`, replacing any earlier one.
    pub fn on<R: Responder>(mut self, method: MethodSpec, responder: R) -> Self {
        let responder: SharedResponder = Arc::new(responder);
        match self.entries.iter_mut().find(|(m, _)| *m == method) {
            Some((_, existing)) => *existing = responder,
            None => self.entries.push((method, responder)),
        }
        self
    }

    pub fn get(&self, method: MethodSpec) -> Option<&SharedResponder> {
        self.entries
            .iter()
            .find(|(m, _)| *m == method)
            .map(|(_, r)| r)
    }

    pub fn methods(&self) -> impl Iterator<Item = MethodSpec> + '_ {
        self.entries.iter().map(|(m, _)| *m)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Debug for Responders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.methods()).finish()
    }
}
