//! Middleware functions and the continuation that links them.
//!
//! # Design Decisions
//! - A middleware either answers the request or hands it to [`Next::run`]
//! - Async functions `fn(Request<Body>, Next) -> Response` are middleware
//!   through a blanket impl, so route tables can list plain functions
//! - The matched chain is shared behind an `Arc<[..]>`; advancing is an index bump

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use axum::response::Response;
use futures_util::future::BoxFuture;

use crate::http::response::not_found;
use crate::routing::matcher::PathParams;

/// A request handler that can sit anywhere in a chain.
pub trait Middleware: Send + Sync + 'static {
    fn call(&self, req: Request<Body>, next: Next) -> BoxFuture<'static, Response>;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Request<Body>, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Response> + Send + 'static,
{
    fn call(&self, req: Request<Body>, next: Next) -> BoxFuture<'static, Response> {
        Box::pin(self(req, next))
    }
}

pub type SharedMiddleware = Arc<dyn Middleware>;

/// Box a middleware for storage in a chain or binding.
pub fn middleware<M: Middleware>(m: M) -> SharedMiddleware {
    Arc::new(m)
}

/// Ordered middleware for one (path, method) pair.
#[derive(Clone, Default)]
pub struct MiddlewareChain {
    handlers: Vec<SharedMiddleware>,
}

impl MiddlewareChain {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a middleware; declaration order is execution order.
    pub fn with<M: Middleware>(mut self, m: M) -> Self {
        self.handlers.push(middleware(m));
        self
    }

    pub fn with_shared(mut self, m: SharedMiddleware) -> Self {
        self.handlers.push(m);
        self
    }

    pub(crate) fn extend(&mut self, other: MiddlewareChain) {
        self.handlers.extend(other.handlers);
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SharedMiddleware> {
        self.handlers.iter()
    }
}

impl FromIterator<SharedMiddleware> for MiddlewareChain {
    fn from_iter<I: IntoIterator<Item = SharedMiddleware>>(iter: I) -> Self {
        Self {
            handlers: iter.into_iter().collect(),
        }
    }
}

impl fmt::Debug for MiddlewareChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MiddlewareChain")
            .field("len", &self.handlers.len())
            .finish()
    }
}

/// One matched binding, ready to run.
#[derive(Clone)]
pub(crate) struct Step {
    pub handler: SharedMiddleware,
    pub params: PathParams,
}

/// Continuation into the remainder of a matched chain.
///
/// Running past the last step answers 404.
#[derive(Clone)]
pub struct Next {
    steps: Arc<[Step]>,
    position: usize,
}

impl Next {
    pub(crate) fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            position: 0,
        }
    }

    /// Pass the request to the next matched handler.
    pub async fn run(self, mut req: Request<Body>) -> Response {
        let Some(step) = self.steps.get(self.position).cloned() else {
            return not_found();
        };
        req.extensions_mut().insert(step.params);
        let next = Next {
            steps: self.steps,
            position: self.position + 1,
        };
        step.handler.call(req, next).await
    }

    /// Number of handlers still waiting behind this continuation.
    pub fn remaining(&self) -> usize {
        self.steps.len().saturating_sub(self.position)
    }
}
