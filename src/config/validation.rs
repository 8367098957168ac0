//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Every resource has a unique name, a known kind and a usable primary path
//! - Validate value ranges (timeouts > 0, addresses parse)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::AppConfig;
use crate::routing::BindPath;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    BindAddress(String),

    #[error("observability.metrics_address '{0}' is not a socket address")]
    MetricsAddress(String),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroTimeout,

    #[error("resource #{0} has no name")]
    MissingName(usize),

    #[error("resource '{0}' is declared more than once")]
    DuplicateName(String),

    #[error("resource '{0}' has neither a path nor a schema")]
    MissingPath(String),

    #[error("resource '{name}' has an invalid path: {reason}")]
    InvalidPath { name: String, reason: String },

    #[error("resource '{name}' has unknown kind '{kind}'")]
    UnknownKind { name: String, kind: String },
}

/// Validate `config`. `kinds` lists the resource kinds that can be built.
pub fn validate_config(config: &AppConfig, kinds: &[&str]) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    let mut seen = HashSet::new();
    for (i, resource) in config.resources.iter().enumerate() {
        if resource.name.trim().is_empty() {
            errors.push(ValidationError::MissingName(i));
            continue;
        }
        if !seen.insert(resource.name.as_str()) {
            errors.push(ValidationError::DuplicateName(resource.name.clone()));
        }
        if !kinds.contains(&resource.kind.as_str()) {
            errors.push(ValidationError::UnknownKind {
                name: resource.name.clone(),
                kind: resource.kind.clone(),
            });
        }
        match BindPath::parse(&resource.primary_path()) {
            Ok(BindPath::Global) => {
                errors.push(ValidationError::MissingPath(resource.name.clone()));
            }
            Ok(BindPath::Scoped(_)) => {}
            Err(e) => errors.push(ValidationError::InvalidPath {
                name: resource.name.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
