//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, request ID, timeout, tracing)
//!     → routing::Router::dispatch (binding stack)
//!     → middleware/ (parsers, logging) declared by resources
//!     → request.rs (parsed data carried in extensions)
//!     → response.rs (canned payloads, 404 fallback)
//!     → Send to client
//! ```

pub mod middleware;
pub mod request;
pub mod response;
pub mod server;

pub use request::{ParsedBody, ParsedQuery, RequestExt, X_REQUEST_ID};
pub use response::{ErrorReply, StatusReply, FORBIDDEN, INVALID_REQUEST, PAYLOAD_TOO_LARGE, SUCCESS};
pub use server::{shutdown_signal, HttpServer};
