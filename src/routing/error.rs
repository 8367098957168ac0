//! Route declaration errors.

use thiserror::Error;

/// Errors raised while declaring or staging a route table.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    #[error("Invalid path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },

    #[error("Unknown method selector: {0}")]
    UnknownMethod(String),

    /// Reported by a resource that cannot produce its route table.
    #[error("Route declaration failed: {0}")]
    Declaration(String),
}
