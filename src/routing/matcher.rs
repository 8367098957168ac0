//! Route matching logic.
//!
//! # Responsibilities
//! - Normalize declared paths (`"users"`, `"/users/"` and `"users"` are the same)
//! - Match a request path exactly or by segment prefix
//! - Capture `:name` segments as path parameters
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - One trailing slash on the request path is ignored
//! - The empty path is global: it matches every request path
//! - `"/"` is the root path, scoped like any other
//! - No regex to guarantee O(n) matching

use std::collections::HashMap;
use std::fmt;

use crate::routing::error::RouteError;

/// Where a binding applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum BindPath {
    /// Bound without a path prefix.
    Global,
    /// Bound to a path, stored without leading or trailing slashes. The root
    /// path is stored empty.
    Scoped(String),
}

impl BindPath {
    /// Parse and validate a declared path.
    pub fn parse(raw: &str) -> Result<Self, RouteError> {
        if raw.is_empty() {
            return Ok(BindPath::Global);
        }
        let trimmed = raw.trim_matches('/');
        if trimmed.is_empty() {
            return Ok(BindPath::Scoped(String::new()));
        }

        let invalid = |reason| RouteError::InvalidPath {
            path: raw.to_string(),
            reason,
        };
        for segment in trimmed.split('/') {
            if segment.is_empty() {
                return Err(invalid("empty segment"));
            }
            if segment.chars().any(|c| c.is_whitespace() || c == '?' || c == '#') {
                return Err(invalid("segments may not contain whitespace, '?' or '#'"));
            }
            if segment == ":" {
                return Err(invalid("parameter segment without a name"));
            }
        }
        Ok(BindPath::Scoped(trimmed.to_string()))
    }

    pub fn is_global(&self) -> bool {
        matches!(self, BindPath::Global)
    }
}

impl fmt::Display for BindPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindPath::Global => f.write_str("*"),
            BindPath::Scoped(path) => write!(f, "/{}", path),
        }
    }
}

/// Parameters captured from `:name` segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PathParams(HashMap<String, String>);

impl PathParams {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone)]
enum Segment {
    Literal(String),
    Param(String),
}

/// Compiled form of a [`BindPath`].
#[derive(Debug, Clone)]
pub(crate) struct PathPattern {
    // None for global bindings.
    segments: Option<Vec<Segment>>,
}

impl PathPattern {
    pub fn compile(path: &BindPath) -> Self {
        let segments = match path {
            BindPath::Global => None,
            BindPath::Scoped(p) if p.is_empty() => Some(Vec::new()),
            BindPath::Scoped(p) => Some(
                p.split('/')
                    .map(|s| match s.strip_prefix(':') {
                        Some(name) => Segment::Param(name.to_string()),
                        None => Segment::Literal(s.to_string()),
                    })
                    .collect(),
            ),
        };
        Self { segments }
    }

    /// Match `request_path` against this pattern.
    ///
    /// With `prefix` set, any sub-path on a segment boundary matches too.
    pub fn matches(&self, request_path: &str, prefix: bool) -> Option<PathParams> {
        let Some(pattern) = &self.segments else {
            return Some(PathParams::default());
        };

        let trimmed = request_path.strip_prefix('/').unwrap_or(request_path);
        let trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
        let parts: Vec<&str> = if trimmed.is_empty() {
            Vec::new()
        } else {
            trimmed.split('/').collect()
        };

        let len_ok = if prefix {
            parts.len() >= pattern.len()
        } else {
            parts.len() == pattern.len()
        };
        if !len_ok {
            return None;
        }

        let mut params = HashMap::new();
        for (segment, part) in pattern.iter().zip(parts.iter()) {
            match segment {
                Segment::Literal(lit) if lit == part => {}
                Segment::Literal(_) => return None,
                Segment::Param(_) if part.is_empty() => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*part).to_string());
                }
            }
        }
        Some(PathParams(params))
    }
}
