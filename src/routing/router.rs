//! The shared binding stack and request dispatch.
//!
//! # Responsibilities
//! - Store live bindings in registration order
//! - Append, commit and remove bindings at runtime
//! - Dispatch a request through every binding that matches it, in order
//!
//! # Design Decisions
//! - The stack is published as an immutable snapshot via `ArcSwap`; readers
//!   never lock and an in-flight request keeps the snapshot it started with
//! - Writers serialize on a mutex and publish copy-on-write
//! - Each binding carries an optional owner tag so mounts can find their own
//!   bindings without guessing from content
//! - First registered, first run: stack order is matching precedence

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use arc_swap::ArcSwap;
use axum::body::Body;
use axum::http::{Method, Request};
use axum::response::Response;
use uuid::Uuid;

use crate::observability::metrics;
use crate::routing::chain::{Next, SharedMiddleware, Step};
use crate::routing::error::RouteError;
use crate::routing::matcher::{BindPath, PathParams, PathPattern};
use crate::routing::method::MethodSpec;

/// Identity of a mount, stamped on every binding it commits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MountId(Uuid);

impl MountId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MountId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for MountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What produced a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BindingKind {
    /// Middleware declared in a route table or registered directly.
    Middleware,
    /// Terminal handler synthesized from a resource responder.
    Responder,
}

/// A live (path, method, handler) registration.
pub struct Binding {
    path: BindPath,
    method: MethodSpec,
    kind: BindingKind,
    owner: Option<MountId>,
    handler: SharedMiddleware,
    pattern: PathPattern,
}

impl Binding {
    pub(crate) fn new(
        path: BindPath,
        method: MethodSpec,
        kind: BindingKind,
        owner: Option<MountId>,
        handler: SharedMiddleware,
    ) -> Self {
        let pattern = PathPattern::compile(&path);
        Self {
            path,
            method,
            kind,
            owner,
            handler,
            pattern,
        }
    }

    pub fn path(&self) -> &BindPath {
        &self.path
    }

    pub fn method(&self) -> MethodSpec {
        self.method
    }

    pub fn kind(&self) -> BindingKind {
        self.kind
    }

    pub fn owner(&self) -> Option<MountId> {
        self.owner
    }

    pub fn handler(&self) -> &SharedMiddleware {
        &self.handler
    }

    fn matches(&self, method: &Method, path: &str) -> Option<PathParams> {
        if !self.method.accepts(method) {
            return None;
        }
        self.pattern.matches(path, self.method.is_wildcard())
    }
}

impl fmt::Debug for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("path", &self.path)
            .field("method", &self.method)
            .field("kind", &self.kind)
            .field("owner", &self.owner)
            .finish()
    }
}

pub type Stack = Vec<Arc<Binding>>;

/// Shared, ordered collection of every live binding.
pub struct Router {
    stack: ArcSwap<Stack>,
    writer: Mutex<()>,
}

impl Router {
    pub fn new() -> Self {
        Self {
            stack: ArcSwap::from_pointee(Vec::new()),
            writer: Mutex::new(()),
        }
    }

    /// Append an unowned binding on `path`.
    pub fn register(
        &self,
        method: MethodSpec,
        path: &str,
        handler: SharedMiddleware,
    ) -> Result<(), RouteError> {
        let path = BindPath::parse(path)?;
        self.mutate(|stack| {
            stack.push(Arc::new(Binding::new(
                path,
                method,
                BindingKind::Middleware,
                None,
                handler,
            )));
        });
        Ok(())
    }

    /// Append an unowned binding that applies to every path.
    pub fn register_global(&self, method: MethodSpec, handler: SharedMiddleware) {
        self.mutate(|stack| {
            stack.push(Arc::new(Binding::new(
                BindPath::Global,
                method,
                BindingKind::Middleware,
                None,
                handler,
            )));
        });
    }

    /// Snapshot of the current stack, in matching order.
    pub fn bindings(&self) -> Arc<Stack> {
        self.stack.load_full()
    }

    pub fn len(&self) -> usize {
        self.stack.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.stack.load().is_empty()
    }

    /// Replace every binding owned by `owner` with `staged`, in one swap.
    ///
    /// If `owner` still has bindings on the stack, `staged` goes where the
    /// first of them was, so the owner keeps its precedence relative to
    /// bindings registered after it. Otherwise `staged` is appended.
    ///
    /// Returns the number of stale bindings swept.
    pub(crate) fn commit(&self, owner: MountId, staged: Vec<Binding>) -> usize {
        self.mutate(|stack| {
            let anchor = stack.iter().position(|b| b.owner == Some(owner));
            let before = stack.len();
            stack.retain(|b| b.owner != Some(owner));
            let swept = before - stack.len();
            let at = anchor.unwrap_or(stack.len());
            stack.splice(at..at, staged.into_iter().map(Arc::new));
            swept
        })
    }

    /// Remove every binding matching `predicate`, keeping the rest in order.
    ///
    /// Returns the number removed.
    pub fn remove_where<F>(&self, predicate: F) -> usize
    where
        F: Fn(&Binding) -> bool,
    {
        self.mutate(|stack| {
            let before = stack.len();
            stack.retain(|b| !predicate(b));
            before - stack.len()
        })
    }

    fn mutate<R>(&self, f: impl FnOnce(&mut Stack) -> R) -> R {
        let _guard = self.writer.lock().unwrap_or_else(|e| e.into_inner());
        let current = self.stack.load();
        let mut next: Stack = (**current).clone();
        drop(current);
        let result = f(&mut next);
        metrics::set_binding_count(next.len());
        self.stack.store(Arc::new(next));
        result
    }

    /// Run `req` through every matching binding in stack order.
    pub async fn dispatch(&self, req: Request<Body>) -> Response {
        let start = Instant::now();
        let method = req.method().clone();
        let path = req.uri().path().to_string();

        let snapshot = self.stack.load_full();
        let steps: Vec<Step> = snapshot
            .iter()
            .filter_map(|b| {
                b.matches(&method, &path).map(|params| Step {
                    handler: b.handler.clone(),
                    params,
                })
            })
            .collect();

        tracing::debug!(
            method = %method,
            path = %path,
            matched = steps.len(),
            "Dispatching request"
        );

        let response = Next::new(steps).run(req).await;
        metrics::record_request(method.as_str(), response.status().as_u16(), start);
        response
    }
}

impl Default for Router {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("bindings", &self.stack.load().len())
            .finish()
    }
}
