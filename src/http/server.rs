//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Expose the shared binding stack as an Axum service
//! - Wire up layers (request ID, tracing, timeout)
//! - Bind server to listener
//! - Shut down gracefully

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    response::Response,
    Router,
};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::AppConfig;
use crate::routing::Router as BindingRouter;

/// HTTP server fronting the shared router.
pub struct HttpServer {
    app: Router,
    config: AppConfig,
}

impl HttpServer {
    /// Create a new HTTP server dispatching into `router`.
    pub fn new(config: AppConfig, router: Arc<BindingRouter>) -> Self {
        let app = Self::build_app(&config, router);
        Self { app, config }
    }

    /// Build the Axum app: every request falls through to the binding stack.
    #[allow(deprecated)]
    fn build_app(config: &AppConfig, router: Arc<BindingRouter>) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(router)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.timeouts.request_secs,
                    )))
                    .layer(PropagateRequestIdLayer::x_request_id()),
            )
    }

    /// The Axum app, for serving elsewhere or in-process testing.
    pub fn app(&self) -> Router {
        self.app.clone()
    }

    /// Run the server until `shutdown` resolves.
    pub async fn run<F>(self, listener: TcpListener, shutdown: F) -> Result<(), std::io::Error>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

async fn dispatch_handler(
    State(router): State<Arc<BindingRouter>>,
    request: Request<Body>,
) -> Response {
    router.dispatch(request).await
}

/// Wait for shutdown signal (Ctrl+C).
pub async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
