//! A resource answering GET on its path with a fixed payload.

use std::sync::Arc;

use axum::body::Body;
use axum::http::Request;
use serde_json::Value;

use crate::config::ResourceConfig;
use crate::http::response::SUCCESS;
use crate::mount::{Reply, Resource, Responders};
use crate::routing::{MethodSpec, RouteError, RouteTable};

#[derive(Debug, Clone)]
pub struct StaticResource {
    path: String,
    payload: Arc<Value>,
}

impl StaticResource {
    pub fn new(path: impl Into<String>, payload: Value) -> Self {
        Self {
            path: path.into(),
            payload: Arc::new(payload),
        }
    }

    /// Uses the configured payload, or the canned success payload if none.
    pub fn from_config(config: &ResourceConfig) -> Self {
        let payload = config
            .payload
            .clone()
            .unwrap_or_else(|| serde_json::to_value(SUCCESS).unwrap_or(Value::Null));
        Self::new(config.primary_path(), payload)
    }
}

impl Resource for StaticResource {
    fn routes(&self) -> Result<RouteTable, RouteError> {
        Ok(RouteTable::new().declare(&self.path, MethodSpec::Get))
    }

    fn responders(&self) -> Responders {
        let payload = self.payload.clone();
        Responders::new().on(MethodSpec::Get, move |_req: Request<Body>| {
            let payload = payload.clone();
            async move { Reply::payload((*payload).clone()) }
        })
    }
}
