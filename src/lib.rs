//! Declarative route tables mounted onto a shared, mutable router.
//!
//! Resources declare `path → method → middleware` tables plus per-method
//! responders. A [`mount::Mount`] stages a resource's table into bindings,
//! commits them onto the shared [`routing::Router`] in one swap, and later
//! detaches exactly the bindings it owns on its primary path.

pub mod config;
pub mod http;
pub mod mount;
pub mod observability;
pub mod resources;
pub mod routing;

pub use config::schema::AppConfig;
pub use http::HttpServer;
pub use mount::{Mount, MountContext, MountRegistry, Reply, Resource, Responders};
pub use routing::{MethodSpec, MiddlewareChain, Next, RouteTable, Router};
