//! route-mount server.
//!
//! # Architecture Overview
//!
//! ```text
//!     config.toml ──▶ config::loader ──▶ MountRegistry::apply
//!          │                                   │
//!          ▼                                   ▼
//!     config::watcher ── reload ──▶  detach / attach resources
//!                                              │
//!                                              ▼
//!     Client ──▶ http::server ──▶ routing::Router (binding stack) ──▶ handlers
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use route_mount::config::{load_config, AppConfig, ConfigWatcher};
use route_mount::http::{shutdown_signal, HttpServer};
use route_mount::mount::MountRegistry;
use route_mount::observability::{logging, metrics};
use route_mount::resources::ResourceCatalog;
use route_mount::routing::Router;

#[derive(Parser)]
#[command(name = "route-mount")]
#[command(about = "Serve resources mounted from a TOML route configuration", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. Defaults apply when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Do not reload resources when the configuration file changes.
    #[arg(long)]
    no_watch: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let catalog = ResourceCatalog::builtin();
    let kinds = catalog.kinds();

    let config = match &cli.config {
        Some(path) => {
            let kind_refs: Vec<&str> = kinds.iter().map(String::as_str).collect();
            load_config(path, &kind_refs)?
        }
        None => AppConfig::default(),
    };

    logging::init_logging(&config.observability)?;
    tracing::info!("route-mount v{} starting", env!("CARGO_PKG_VERSION"));

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr)?,
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let router = Arc::new(Router::new());
    let registry = Arc::new(MountRegistry::new(router.clone(), catalog));
    let report = registry.apply(&config.resources);
    tracing::info!(
        bind_address = %config.listener.bind_address,
        resources = report.attached.len(),
        failed = report.failed.len(),
        bindings = router.len(),
        "Configuration loaded"
    );

    // The watcher handle must outlive the server.
    let _watcher = match (&cli.config, cli.no_watch) {
        (Some(path), false) => {
            let (watcher, mut updates) = ConfigWatcher::new(path, kinds);
            let handle = watcher.run()?;
            let registry = registry.clone();
            tokio::spawn(async move {
                while let Some(new_config) = updates.recv().await {
                    registry.apply(&new_config.resources);
                }
            });
            Some(handle)
        }
        _ => None,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    let server = HttpServer::new(config, router);
    server.run(listener, shutdown_signal()).await?;

    let removed = registry.detach_all();
    tracing::info!(removed, "Shutdown complete");
    Ok(())
}
