//! Container liveness and identity checks gating all namespace work

use shaper_core::{ContainerRecord, Error, ExecutionMode, Result};
use std::sync::Arc;

use crate::backend::ContainerRuntime;

/// Queries the container runtime on behalf of a single operation
#[derive(Clone)]
pub struct ContainerInspector {
    runtime: Arc<dyn ContainerRuntime>,
}

impl ContainerInspector {
    /// Create an inspector over a runtime backend
    #[must_use]
    pub fn new(runtime: Arc<dyn ContainerRuntime>) -> Self {
        Self { runtime }
    }

    /// Whether the runtime reports the container. Never fails.
    pub async fn exists(&self, container: &str) -> bool {
        match self.check(container).await {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(container, error = %e, "Container does not exist");
                false
            }
        }
    }

    /// Fail with [`Error::ContainerNotFound`] unless the container resolves.
    ///
    /// Verification only matters when shaping commands will actually run, so
    /// it is skipped for every mode other than [`ExecutionMode::Execute`].
    pub async fn verify(&self, container: &str, mode: ExecutionMode) -> Result<()> {
        if !mode.executes() {
            tracing::debug!(container, %mode, "Skipping container verification");
            return Ok(());
        }

        self.check(container).await.inspect_err(|e| {
            tracing::error!(container, error = %e, "Container verification failed");
        })
    }

    /// Inspect a container.
    ///
    /// A container that is not running yields a record with only the name
    /// populated; callers must skip namespace work for it.
    pub async fn inspect(&self, container: &str) -> Result<ContainerRecord> {
        let record = self.runtime.inspect(container).await?;

        if record.is_running() {
            tracing::debug!(
                container = %record.name,
                pid = ?record.pid(),
                image = ?record.image(),
                "Found running container"
            );
        } else {
            tracing::error!(container = %record.name, "Container not running");
        }

        Ok(record)
    }

    /// Names of all containers currently in the `running` state
    pub async fn running_container_names(&self) -> Result<Vec<String>> {
        Ok(self
            .runtime
            .list_containers()
            .await?
            .into_iter()
            .filter(|summary| summary.is_running())
            .map(|summary| summary.name)
            .collect())
    }

    async fn check(&self, container: &str) -> Result<()> {
        if self.runtime.list_containers().await?.is_empty() {
            return Err(Error::ContainerNotFound { target: None });
        }

        self.runtime.inspect(container).await.map(|_| ())
    }
}

impl std::fmt::Debug for ContainerInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerInspector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MockRuntime;
    use shaper_core::ProcessId;

    fn inspector(runtime: &MockRuntime) -> ContainerInspector {
        ContainerInspector::new(Arc::new(runtime.clone()))
    }

    #[tokio::test]
    async fn test_verify_empty_runtime() {
        let runtime = MockRuntime::new();
        let err = inspector(&runtime)
            .verify("anything", ExecutionMode::Execute)
            .await
            .unwrap_err();

        assert!(matches!(err, Error::ContainerNotFound { target: None }));
        // Never got as far as inspecting
        assert!(runtime.inspected().await.is_empty());
    }

    #[tokio::test]
    async fn test_verify_skipped_when_not_executing() {
        let runtime = MockRuntime::new();
        let inspector = inspector(&runtime);

        inspector.verify("ghost", ExecutionMode::Stdout).await.unwrap();
        inspector.verify("ghost", ExecutionMode::Script).await.unwrap();
        assert_eq!(runtime.call_count().await, 0);
    }

    #[tokio::test]
    async fn test_inspect_running() {
        let runtime = MockRuntime::with_containers(vec![ContainerRecord::running(
            "web",
            "abc",
            ProcessId::from_raw(7),
            "nginx",
        )]);

        let record = inspector(&runtime).inspect("web").await.unwrap();
        assert_eq!(record.pid(), Some(ProcessId::from_raw(7)));
    }
}
