//! Live mounts keyed by resource name.
//!
//! # Responsibilities
//! - Reconcile the set of live mounts against a resource configuration list
//! - Detach resources that were removed or changed, attach new ones
//! - Keep a changed resource's owner tag so its leftovers are swept
//!
//! # Design Decisions
//! - One failing resource does not stop the others; failures are reported
//! - Reconciliation is serialized by the caller (config updates arrive on one
//!   channel)

use std::sync::Arc;

use dashmap::DashMap;

use crate::config::ResourceConfig;
use crate::mount::error::MountError;
use crate::mount::lifecycle::{Mount, MountContext};
use crate::resources::ResourceCatalog;
use crate::routing::{MountId, Router};

struct Live {
    config: ResourceConfig,
    mount: Mount,
}

/// What a reconciliation pass did.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ReconcileReport {
    pub attached: Vec<String>,
    pub detached: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl ReconcileReport {
    pub fn is_noop(&self) -> bool {
        self.attached.is_empty() && self.detached.is_empty() && self.failed.is_empty()
    }
}

pub struct MountRegistry {
    router: Arc<Router>,
    catalog: ResourceCatalog,
    mounts: DashMap<String, Live>,
}

impl MountRegistry {
    pub fn new(router: Arc<Router>, catalog: ResourceCatalog) -> Self {
        Self {
            router,
            catalog,
            mounts: DashMap::new(),
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    /// Bring the live mounts in line with `configs`.
    pub fn apply(&self, configs: &[ResourceConfig]) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        // Collect first so no map guard is held while detaching.
        let stale: Vec<(String, bool)> = self
            .mounts
            .iter()
            .filter_map(|entry| {
                match configs.iter().find(|c| &c.name == entry.key()) {
                    None => Some((entry.key().clone(), false)),
                    Some(c) if c != &entry.value().config => Some((entry.key().clone(), true)),
                    Some(_) => None,
                }
            })
            .collect();

        let mut owners: Vec<(String, MountId)> = Vec::new();
        for (name, changed) in stale {
            if let Some((_, live)) = self.mounts.remove(&name) {
                live.mount.detach();
                if changed {
                    owners.push((name.clone(), live.mount.id()));
                }
                report.detached.push(name);
            }
        }

        for config in configs {
            if self.mounts.contains_key(&config.name) {
                continue;
            }
            let previous = owners
                .iter()
                .find(|(n, _)| n == &config.name)
                .map(|(_, id)| *id);

            match self.mount_one(config, previous) {
                Ok(mount) => {
                    report.attached.push(config.name.clone());
                    self.mounts.insert(
                        config.name.clone(),
                        Live {
                            config: config.clone(),
                            mount,
                        },
                    );
                }
                Err(e) => {
                    tracing::error!(resource = %config.name, error = %e, "Failed to mount resource");
                    report.failed.push((config.name.clone(), e.to_string()));
                }
            }
        }

        if !report.is_noop() {
            tracing::info!(
                attached = ?report.attached,
                detached = ?report.detached,
                failed = report.failed.len(),
                bindings = self.router.len(),
                "Mounts reconciled"
            );
        }
        report
    }

    fn mount_one(
        &self,
        config: &ResourceConfig,
        previous: Option<MountId>,
    ) -> Result<Mount, MountError> {
        let resource = self.catalog.build(config)?;
        let mut ctx = MountContext::from_config(self.router.clone(), config);
        if let Some(owner) = previous {
            ctx = ctx.with_owner(owner);
        }
        Mount::mount(ctx, resource)
    }

    /// Detach every mount. Returns the number of bindings removed.
    pub fn detach_all(&self) -> usize {
        let names: Vec<String> = self.mounts.iter().map(|e| e.key().clone()).collect();
        names
            .into_iter()
            .filter_map(|name| self.mounts.remove(&name))
            .map(|(_, live)| live.mount.detach())
            .sum()
    }

    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.mounts.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    pub fn len(&self) -> usize {
        self.mounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }
}
