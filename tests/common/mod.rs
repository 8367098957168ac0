//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use axum::body::{to_bytes, Body};
use axum::http::Request;
use axum::response::Response;
use serde_json::{json, Value};

use route_mount::mount::{Reply, Resource, Responders};
use route_mount::routing::{
    middleware, MethodSpec, MiddlewareChain, Next, RouteError, RouteTable, SharedMiddleware,
};

/// Ordered record of which handlers saw a request.
pub type Trail = Arc<Mutex<Vec<&'static str>>>;

pub fn trail() -> Trail {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn taken(trail: &Trail) -> Vec<&'static str> {
    std::mem::take(&mut *trail.lock().unwrap())
}

/// Middleware that records `tag` and passes the request on.
pub fn recorder(trail: &Trail, tag: &'static str) -> SharedMiddleware {
    let trail = trail.clone();
    middleware(move |req: Request<Body>, next: Next| {
        let trail = trail.clone();
        async move {
            trail.lock().unwrap().push(tag);
            next.run(req).await
        }
    })
}

pub fn get(uri: &str) -> Request<Body> {
    Request::get(uri).body(Body::empty()).unwrap()
}

pub async fn body_json(res: Response) -> Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_text(res: Response) -> String {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A users resource: a global logger, an auth step on `GET /users`, and a
/// GET responder returning `payload`.
pub struct Users {
    pub trail: Trail,
    pub payload: Value,
}

impl Users {
    pub fn new(trail: &Trail) -> Self {
        Self {
            trail: trail.clone(),
            payload: json!([{ "id": 1, "name": "ada" }]),
        }
    }
}

impl Resource for Users {
    fn routes(&self) -> Result<RouteTable, RouteError> {
        Ok(RouteTable::new()
            .global(
                MethodSpec::All,
                MiddlewareChain::new().with_shared(recorder(&self.trail, "log")),
            )
            .route(
                "users",
                MethodSpec::Get,
                MiddlewareChain::new().with_shared(recorder(&self.trail, "auth")),
            ))
    }

    fn responders(&self) -> Responders {
        let trail = self.trail.clone();
        let payload = self.payload.clone();
        Responders::new().on(MethodSpec::Get, move |_req: Request<Body>| {
            let trail = trail.clone();
            let payload = payload.clone();
            async move {
                trail.lock().unwrap().push("respond");
                Reply::payload(payload)
            }
        })
    }
}
