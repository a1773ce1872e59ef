//! End-to-end container to host veth resolution

use shaper_core::{Error, Result, VethRecord};
use shaper_netns::{CommandRunner, NetnsConfig, NetnsLink, NetnsLocator, VethListing};
use shaper_runtime::{ContainerInspector, ContainerRuntime};
use std::sync::Arc;

use crate::catalog::IfindexCatalog;

/// Context for resolving container veths on this host.
///
/// Holds the runtime client, the command runner and the host identity for
/// the lifetime of one operation.
pub struct VethResolver {
    inspector: ContainerInspector,
    locator: NetnsLocator,
    runner: Arc<dyn CommandRunner>,
    host_scope: String,
}

impl VethResolver {
    /// Create a resolver scoped to this machine's hostname
    ///
    /// # Errors
    /// Returns error if the hostname cannot be read
    pub fn new(
        runtime: Arc<dyn ContainerRuntime>,
        runner: Arc<dyn CommandRunner>,
        config: NetnsConfig,
    ) -> Result<Self> {
        let host_scope = nix::unistd::gethostname()?.to_string_lossy().into_owned();
        Ok(Self::with_host_scope(runtime, runner, config, host_scope))
    }

    /// Create a resolver with an explicit host scope identifier
    #[must_use]
    pub fn with_host_scope(
        runtime: Arc<dyn ContainerRuntime>,
        runner: Arc<dyn CommandRunner>,
        config: NetnsConfig,
        host_scope: impl Into<String>,
    ) -> Self {
        Self {
            inspector: ContainerInspector::new(runtime),
            locator: NetnsLocator::new(config),
            runner,
            host_scope: host_scope.into(),
        }
    }

    /// Container inspector sharing this resolver's runtime client
    #[must_use]
    pub const fn inspector(&self) -> &ContainerInspector {
        &self.inspector
    }

    /// Build the veth table for `container`.
    ///
    /// Inspects the container, links its network namespace, lists veths
    /// inside it and on the host, then removes the link. The link is removed
    /// on every path once it has been created, and a failure to remove it
    /// takes precedence over a listing failure.
    ///
    /// # Errors
    /// - [`Error::ContainerNotRunning`] if the container has no live process;
    ///   no namespace work is attempted
    /// - [`Error::PermissionDenied`] for privilege failures on the link
    /// - [`Error::ListingCommand`] if a veth listing exits non-zero
    /// - [`Error::Integrity`] if a record needed for the join was rejected
    pub async fn create_veth_table(&self, container: &str) -> Result<VethTable> {
        let record = self.inspector.inspect(container).await?;

        let Some(pid) = record.pid() else {
            return Err(Error::ContainerNotRunning { name: record.name });
        };

        tracing::debug!(container = %record.name, %pid, "Found container");

        let link = self.locator.acquire(&record.name, pid)?;
        let populated = self.populate(&link).await;
        let released = link.release().inspect_err(|e| {
            tracing::error!(
                container = %record.name,
                error = %e,
                "Failed to release namespace link"
            );
        });

        released?;
        let catalog = populated?;

        tracing::info!(
            container = %record.name,
            records = catalog.len(),
            "Built veth table"
        );

        Ok(VethTable {
            container: record.name,
            catalog,
        })
    }

    /// Host-side veth names for `container`
    ///
    /// # Errors
    /// See [`VethResolver::create_veth_table`]
    pub async fn fetch_names(&self, container: &str) -> Result<Vec<String>> {
        Ok(self.create_veth_table(container).await?.fetch_names())
    }

    async fn populate(&self, link: &NetnsLink) -> Result<IfindexCatalog> {
        link.check().inspect_err(|e| {
            tracing::error!(
                path = %link.path().display(),
                error = %e,
                "Namespace is not accessible"
            );
        })?;

        let ip = &self.locator.config().ip_command;
        let mut catalog = IfindexCatalog::new(self.host_scope.clone());

        let output = VethListing::Namespace(link.name().to_string())
            .run(self.runner.as_ref(), ip)
            .await?;
        catalog.populate(link.name(), &output);

        let output = VethListing::Host.run(self.runner.as_ref(), ip).await?;
        catalog.populate(&self.host_scope, &output);

        catalog.check_join(link.name()).inspect_err(|e| {
            tracing::error!(container = link.name(), error = %e, "Inconsistent veth listing");
        })?;

        Ok(catalog)
    }
}

impl std::fmt::Debug for VethResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VethResolver")
            .field("host_scope", &self.host_scope)
            .field("locator", &self.locator)
            .finish_non_exhaustive()
    }
}

/// Committed veth catalog for one container
#[derive(Debug, Clone)]
pub struct VethTable {
    container: String,
    catalog: IfindexCatalog,
}

impl VethTable {
    /// Name of the container this table was built for
    #[must_use]
    pub fn container(&self) -> &str {
        &self.container
    }

    /// The underlying catalog
    #[must_use]
    pub const fn catalog(&self) -> &IfindexCatalog {
        &self.catalog
    }

    /// Host-side records paired with the container's veths
    pub fn resolve(&self) -> impl Iterator<Item = &VethRecord> {
        self.catalog.resolve(&self.container)
    }

    /// Host-side veth names, in join order
    #[must_use]
    pub fn fetch_names(&self) -> Vec<String> {
        self.catalog.fetch_names(&self.container)
    }
}
