//! Container runtime trait for pluggable implementations

use async_trait::async_trait;
use shaper_core::{ContainerRecord, ContainerSummary, Error, Result};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Trait for container runtime backends
///
/// This allows for different implementations:
/// - [`DockerRuntime`](crate::DockerRuntime) - Docker Engine API over the local socket
/// - [`MockRuntime`] - Testing without a daemon
///
/// # Thread Safety
/// All implementations must be `Send + Sync` so a single client can be shared
/// by every component of an operation.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// List every container the runtime knows about
    ///
    /// # Errors
    /// Returns error if the runtime cannot be queried
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Inspect a single container by ID or name
    ///
    /// # Errors
    /// Returns [`Error::ContainerNotFound`] if the identifier does not resolve,
    /// or another error if the runtime cannot be queried
    async fn inspect(&self, container: &str) -> Result<ContainerRecord>;
}

/// Mock runtime for testing (doesn't talk to a daemon)
///
/// Containers are matched by name or, for running containers, by ID.
#[derive(Clone)]
pub struct MockRuntime {
    state: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    containers: Vec<ContainerRecord>,
    inspected: Vec<String>,
    call_count: usize,
}

impl MockRuntime {
    /// Create an empty mock runtime
    #[must_use]
    pub fn new() -> Self {
        Self::with_containers(Vec::new())
    }

    /// Create a mock runtime pre-populated with containers
    #[must_use]
    pub fn with_containers(containers: Vec<ContainerRecord>) -> Self {
        Self {
            state: Arc::new(Mutex::new(MockState {
                containers,
                ..MockState::default()
            })),
        }
    }

    /// Register another container
    pub async fn add_container(&self, record: ContainerRecord) {
        self.state.lock().await.containers.push(record);
    }

    /// Get the number of runtime calls made (for testing)
    pub async fn call_count(&self) -> usize {
        self.state.lock().await.call_count
    }

    /// Identifiers passed to [`ContainerRuntime::inspect`], in call order
    pub async fn inspected(&self) -> Vec<String> {
        self.state.lock().await.inspected.clone()
    }
}

impl Default for MockRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MockRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockRuntime").finish_non_exhaustive()
    }
}

#[async_trait]
impl ContainerRuntime for MockRuntime {
    async fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        let mut state = self.state.lock().await;
        state.call_count += 1;

        let summaries = state
            .containers
            .iter()
            .map(|record| ContainerSummary {
                name: record.name.clone(),
                state: if record.is_running() {
                    "running".to_string()
                } else {
                    "exited".to_string()
                },
            })
            .collect::<Vec<_>>();

        tracing::debug!(count = summaries.len(), "Mock: Listed containers");

        Ok(summaries)
    }

    async fn inspect(&self, container: &str) -> Result<ContainerRecord> {
        let mut state = self.state.lock().await;
        state.call_count += 1;
        state.inspected.push(container.to_string());

        let found = state
            .containers
            .iter()
            .find(|record| record.name == container || record.id() == Some(container))
            .cloned();

        tracing::debug!(container, found = found.is_some(), "Mock: Inspected container");

        found.ok_or_else(|| Error::ContainerNotFound {
            target: Some(container.to_string()),
        })
    }
}
