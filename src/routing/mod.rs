//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route declaration (per resource):
//!     RouteTable (path → method → MiddlewareChain)
//!     → mount engine stages Bindings
//!     → router.rs commits them onto the shared stack
//!
//! Incoming Request (method, path)
//!     → router.rs (snapshot the stack)
//!     → matcher.rs (evaluate each binding, capture params)
//!     → chain.rs (run matched handlers in order via Next)
//!     → Response, or 404 when the chain runs out
//! ```
//!
//! # Design Decisions
//! - Bindings can be added and removed at runtime
//! - No regex in hot path (segment matching only)
//! - Deterministic: same stack and request always run the same handlers
//! - First registered runs first

pub mod chain;
pub mod error;
pub mod matcher;
pub mod method;
pub mod router;
pub mod table;

pub use chain::{middleware, Middleware, MiddlewareChain, Next, SharedMiddleware};
pub use error::RouteError;
pub use matcher::{BindPath, PathParams};
pub use method::MethodSpec;
pub use router::{Binding, BindingKind, MountId, Router};
pub use table::RouteTable;
