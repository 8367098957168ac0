//! Declarative route tables.
//!
//! A table maps path → method → middleware chain. The empty path is global.
//! Paths and methods keep the order they were first declared in, so staging a
//! table is deterministic.

use crate::routing::chain::MiddlewareChain;
use crate::routing::method::MethodSpec;

#[derive(Debug, Clone)]
struct PathEntry {
    path: String,
    methods: Vec<(MethodSpec, MiddlewareChain)>,
}

/// path → method → ordered middleware.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<PathEntry>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare middleware for `(path, method)`.
    ///
    /// Declaring the same pair twice appends to the existing chain.
    pub fn route(mut self, path: &str, method: MethodSpec, chain: MiddlewareChain) -> Self {
        let key = path.trim_matches('/');
        let entry = match self.entries.iter().position(|e| e.path == key) {
            Some(i) => &mut self.entries[i],
            None => {
                self.entries.push(PathEntry {
                    path: key.to_string(),
                    methods: Vec::new(),
                });
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        };
        match entry.methods.iter_mut().find(|(m, _)| *m == method) {
            Some((_, existing)) => existing.extend(chain),
            None => entry.methods.push((method, chain)),
        }
        self
    }

    /// Declare middleware that runs regardless of path.
    pub fn global(self, method: MethodSpec, chain: MiddlewareChain) -> Self {
        self.route("", method, chain)
    }

    /// Declare a method with no middleware of its own, so a responder for it
    /// gets wired on the primary path.
    pub fn declare(self, path: &str, method: MethodSpec) -> Self {
        self.route(path, method, MiddlewareChain::new())
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of declared middleware across every (path, method).
    pub fn middleware_count(&self) -> usize {
        self.iter().map(|(_, _, chain)| chain.len()).sum()
    }

    /// Every (path, method, chain) in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, MethodSpec, &MiddlewareChain)> {
        self.entries.iter().flat_map(|entry| {
            entry
                .methods
                .iter()
                .map(move |(method, chain)| (entry.path.as_str(), *method, chain))
        })
    }
}
