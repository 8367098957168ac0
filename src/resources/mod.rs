//! Resource kinds the server can mount from configuration.
//!
//! # Data Flow
//! ```text
//! ResourceConfig { kind, path/schema, payload }
//!     → catalog.rs (kind → factory)
//!     → Arc<dyn Resource>
//!     → mount::Mount
//! ```

pub mod catalog;
pub mod echo;
pub mod static_payload;

pub use catalog::ResourceCatalog;
pub use echo::EchoResource;
pub use static_payload::StaticResource;
