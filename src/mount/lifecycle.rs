//! Mount lifecycle: create, attach, detach.
//!
//! # State Transitions
//! ```text
//! new()    → Detached (nothing on the router yet)
//! attach() → Attached (bindings committed; repeat calls replace them)
//! detach() → Detached (primary-path bindings removed)
//! ```
//!
//! # Design Decisions
//! - Creating a mount never touches the router; `Mount::mount` is the
//!   create-and-attach shorthand
//! - detach only removes this mount's bindings on its primary path. Global
//!   and other-path bindings stay live and are replaced on the next attach

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::config::ResourceConfig;
use crate::mount::engine::stage;
use crate::mount::error::MountError;
use crate::mount::resource::{Resource, Responders};
use crate::observability::metrics;
use crate::routing::{BindPath, MountId, Router};

/// Everything a resource needs to be mounted.
#[derive(Debug, Clone)]
pub struct MountContext {
    pub router: Arc<Router>,
    pub name: String,
    pub primary_path: String,
    pub owner: MountId,
}

impl MountContext {
    pub fn new(router: Arc<Router>, name: impl Into<String>, primary_path: impl Into<String>) -> Self {
        Self {
            router,
            name: name.into(),
            primary_path: primary_path.into(),
            owner: MountId::new(),
        }
    }

    pub fn from_config(router: Arc<Router>, config: &ResourceConfig) -> Self {
        Self::new(router, config.name.clone(), config.primary_path())
    }

    /// Reuse an owner tag from an earlier mount of the same resource, so its
    /// leftover bindings are swept on attach.
    pub fn with_owner(mut self, owner: MountId) -> Self {
        self.owner = owner;
        self
    }
}

/// Outcome of a successful attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttachReport {
    /// Bindings committed, auto-responders included.
    pub bindings: usize,
    /// Auto-responders among them.
    pub responders: usize,
    /// Leftover bindings from an earlier attach that were replaced.
    pub swept: usize,
}

/// A resource bound (or bindable) to a shared router.
pub struct Mount {
    id: MountId,
    name: String,
    primary: BindPath,
    router: Arc<Router>,
    resource: Arc<dyn Resource>,
    responders: Responders,
    attached: AtomicBool,
}

impl Mount {
    /// Validate the primary path and capture the resource's responders.
    pub fn new(ctx: MountContext, resource: Arc<dyn Resource>) -> Result<Self, MountError> {
        let primary = BindPath::parse(&ctx.primary_path).map_err(|source| {
            MountError::InvalidPrimaryPath {
                name: ctx.name.clone(),
                source,
            }
        })?;
        if primary.is_global() {
            return Err(MountError::EmptyPrimaryPath { name: ctx.name });
        }

        let responders = resource.responders();
        tracing::debug!(
            resource = %ctx.name,
            path = %primary,
            responders = ?responders,
            "Mount created"
        );

        Ok(Self {
            id: ctx.owner,
            name: ctx.name,
            primary,
            router: ctx.router,
            resource,
            responders,
            attached: AtomicBool::new(false),
        })
    }

    /// Create and attach in one step.
    pub fn mount(ctx: MountContext, resource: Arc<dyn Resource>) -> Result<Self, MountError> {
        let mount = Self::new(ctx, resource)?;
        mount.attach()?;
        Ok(mount)
    }

    /// Stage the resource's current route table and commit it.
    ///
    /// Nothing is registered unless the whole table is valid. Attaching an
    /// attached mount replaces its bindings.
    pub fn attach(&self) -> Result<AttachReport, MountError> {
        let table = self.resource.routes().map_err(|source| {
            tracing::warn!(resource = %self.name, error = %source, "Route declaration failed");
            MountError::Routes {
                name: self.name.clone(),
                source,
            }
        })?;

        let staged = stage(self.id, &self.primary, &table, &self.responders).map_err(|source| {
            tracing::warn!(resource = %self.name, error = %source, "Route table rejected");
            MountError::Routes {
                name: self.name.clone(),
                source,
            }
        })?;

        let report = AttachReport {
            bindings: staged.bindings.len(),
            responders: staged.responders,
            swept: self.router.commit(self.id, staged.bindings),
        };
        self.attached.store(true, Ordering::Release);
        metrics::record_attach(&self.name, report.bindings);

        tracing::info!(
            resource = %self.name,
            path = %self.primary,
            bindings = report.bindings,
            responders = report.responders,
            swept = report.swept,
            "Resource attached"
        );
        Ok(report)
    }

    /// Remove this mount's bindings on its primary path.
    ///
    /// Returns the number removed; zero when nothing was attached.
    pub fn detach(&self) -> usize {
        let removed = self
            .router
            .remove_where(|b| b.owner() == Some(self.id) && b.path() == &self.primary);
        self.attached.store(false, Ordering::Release);
        metrics::record_detach(&self.name, removed);

        tracing::info!(
            resource = %self.name,
            path = %self.primary,
            removed,
            "Resource detached"
        );
        removed
    }

    pub fn id(&self) -> MountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn primary_path(&self) -> &BindPath {
        &self.primary
    }

    pub fn is_attached(&self) -> bool {
        self.attached.load(Ordering::Acquire)
    }
}

impl std::fmt::Debug for Mount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mount")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("primary", &self.primary)
            .field("attached", &self.is_attached())
            .finish()
    }
}
