//! A resource that echoes what the parsers extracted.

use axum::body::Body;
use axum::http::Request;
use serde_json::json;

use crate::http::middleware::{log_request, parse_body, parse_query};
use crate::http::request::RequestExt;
use crate::mount::{Reply, Resource, Responders};
use crate::routing::{MethodSpec, MiddlewareChain, RouteError, RouteTable};

#[derive(Debug, Clone)]
pub struct EchoResource {
    path: String,
}

impl EchoResource {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }
}

impl Resource for EchoResource {
    fn routes(&self) -> Result<RouteTable, RouteError> {
        Ok(RouteTable::new()
            .route(
                &self.path,
                MethodSpec::All,
                MiddlewareChain::new().with_shared(log_request()),
            )
            .route(
                &self.path,
                MethodSpec::Get,
                MiddlewareChain::new().with_shared(parse_query()),
            )
            .route(
                &self.path,
                MethodSpec::Post,
                MiddlewareChain::new()
                    .with_shared(parse_query())
                    .with_shared(parse_body()),
            ))
    }

    fn responders(&self) -> Responders {
        Responders::new()
            .on(MethodSpec::Get, |req: Request<Body>| async move {
                Reply::json(&json!({ "query": req.parsed_query() }))
            })
            .on(MethodSpec::Post, |req: Request<Body>| async move {
                Reply::json(&json!({
                    "query": req.parsed_query(),
                    "body": req.parsed_body(),
                }))
            })
    }
}
