//! Mount errors.

use thiserror::Error;

use crate::routing::RouteError;

#[derive(Error, Debug)]
pub enum MountError {
    #[error("Resource '{name}' has an invalid primary path: {source}")]
    InvalidPrimaryPath {
        name: String,
        #[source]
        source: RouteError,
    },

    #[error("Resource '{name}' has an empty primary path")]
    EmptyPrimaryPath { name: String },

    #[error("Resource '{name}' failed to declare routes: {source}")]
    Routes {
        name: String,
        #[source]
        source: RouteError,
    },

    #[error("Unknown resource kind: {0}")]
    UnknownKind(String),

    #[error("Resource '{name}' could not be built: {reason}")]
    Build { name: String, reason: String },
}
