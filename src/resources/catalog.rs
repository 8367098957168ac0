//! Resource factories keyed by kind.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::ResourceConfig;
use crate::mount::{MountError, Resource};
use crate::resources::{EchoResource, StaticResource};

type Factory =
    Arc<dyn Fn(&ResourceConfig) -> Result<Arc<dyn Resource>, MountError> + Send + Sync>;

/// Builds resources from their configuration.
#[derive(Clone)]
pub struct ResourceCatalog {
    factories: HashMap<String, Factory>,
}

impl ResourceCatalog {
    /// A catalog with no kinds.
    pub fn empty() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    /// A catalog with the built-in `static` and `echo` kinds.
    pub fn builtin() -> Self {
        Self::empty()
            .register("static", |config| {
                Ok(Arc::new(StaticResource::from_config(config)) as Arc<dyn Resource>)
            })
            .register("echo", |config| {
                Ok(Arc::new(EchoResource::new(config.primary_path())) as Arc<dyn Resource>)
            })
    }

    /// Add or replace the factory for `kind`.
    pub fn register<F>(mut self, kind: impl Into<String>, factory: F) -> Self
    where
        F: Fn(&ResourceConfig) -> Result<Arc<dyn Resource>, MountError> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Arc::new(factory));
        self
    }

    pub fn build(&self, config: &ResourceConfig) -> Result<Arc<dyn Resource>, MountError> {
        let factory = self
            .factories
            .get(&config.kind)
            .ok_or_else(|| MountError::UnknownKind(config.kind.clone()))?;
        factory(config)
    }

    /// Known kinds, sorted.
    pub fn kinds(&self) -> Vec<String> {
        let mut kinds: Vec<String> = self.factories.keys().cloned().collect();
        kinds.sort();
        kinds
    }
}

impl Default for ResourceCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl fmt::Debug for ResourceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceCatalog")
            .field("kinds", &self.kinds())
            .finish()
    }
}
