//! Mounting subsystem: attaching resources to the shared router.
//!
//! # Data Flow
//! ```text
//! Resource (routes + responders)
//!     → lifecycle.rs  Mount::new (validate primary path, capture responders)
//!     → engine.rs     stage (route table → ordered bindings + auto-responders)
//!     → Router::commit (one atomic swap, owner-tagged)
//!
//! Mount::detach
//!     → Router::remove_where (owner tag + primary path)
//!
//! Config reload
//!     → registry.rs (diff by resource name → detach / attach)
//! ```
//!
//! # Design Decisions
//! - Creation and activation are separate steps
//! - A route table is validated in full before any binding goes live
//! - Global bindings outlive detach; the next attach of the same owner
//!   replaces them

pub mod engine;
pub mod error;
pub mod lifecycle;
pub mod registry;
pub mod resource;

pub use error::MountError;
pub use lifecycle::{AttachReport, Mount, MountContext};
pub use registry::{MountRegistry, ReconcileReport};
pub use resource::{Reply, Resource, Responder, Responders};
