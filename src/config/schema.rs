//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the server.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Resources to mount, in mount order.
    pub resources: Vec<ResourceConfig>,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// One resource to mount.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ResourceConfig {
    /// Unique resource identifier for logging and reconciliation.
    pub name: String,

    /// Resource kind, resolved through the resource catalog.
    #[serde(default = "default_kind")]
    pub kind: String,

    /// Primary path. Falls back to `schema` when absent or empty.
    #[serde(default)]
    pub path: Option<String>,

    /// Schema identifier of the resource.
    #[serde(default)]
    pub schema: Option<String>,

    /// Kind-specific payload.
    #[serde(default)]
    pub payload: Option<Value>,
}

fn default_kind() -> String {
    "static".to_string()
}

impl ResourceConfig {
    pub fn new(name: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: kind.into(),
            path: None,
            schema: None,
            payload: None,
        }
    }

    /// The path this resource owns: `path`, or `schema` when no path is given.
    pub fn primary_path(&self) -> String {
        self.path
            .as_deref()
            .filter(|p| !p.trim_matches('/').is_empty())
            .or(self.schema.as_deref())
            .unwrap_or_default()
            .to_string()
    }
}
